use p256k1::{Context, PublicKey, Scalar, SecretKey, hex};
use p256k1_ecdsa::{Ecdsa, Signature};
use sha2::{Digest, Sha256};

lazy_static::lazy_static! {
    static ref CTX: Context = Context::new();
}

struct Vector {
    secret_key: &'static str,
    message: &'static str,
    signature: &'static str,
    der: &'static str,
}

const VECTORS: [Vector; 5] = [
    Vector {
        secret_key: "0000000000000000000000000000000000000000000000000000000000000001",
        message: "Satoshi Nakamoto",
        signature: "934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d82442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
        der: "3045022100934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d802202442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
    },
    Vector {
        secret_key: "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
        message: "Satoshi Nakamoto",
        signature: "fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d06b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5",
        der: "3045022100fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d002206b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5",
    },
    Vector {
        secret_key: "f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181",
        message: "Alan Turing",
        signature: "7063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c58dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea",
        der: "304402207063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c022058dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea",
    },
    Vector {
        secret_key: "0000000000000000000000000000000000000000000000000000000000000001",
        message: "All those moments will be lost in time, like tears in rain. Time to die...",
        signature: "8600dbd41e348fe5c9465ab92d23e3db8b98b873beecd930736488696438cb6b547fe64427496db33bf66019dacbf0039c04199abb0122918601db38a72cfc21",
        der: "30450221008600dbd41e348fe5c9465ab92d23e3db8b98b873beecd930736488696438cb6b0220547fe64427496db33bf66019dacbf0039c04199abb0122918601db38a72cfc21",
    },
    Vector {
        secret_key: "e91671c46231f833a6406ccbea0e3e392c76c167bac1cb013f6f1013980455c2",
        message: "There is a computer disease that anybody who works with computers knows about. It's a very serious disease and it interferes completely with the work. The trouble with computers is that you 'play' with them!",
        signature: "b552edd27580141f3b2a5463048cb7cd3e047b97c9f98076c32dbdf85a68718b279fa72dd19bfae05577e06c7c0c1900c371fcd5893f7e1d56a37d30174671f6",
        der: "3045022100b552edd27580141f3b2a5463048cb7cd3e047b97c9f98076c32dbdf85a68718b0220279fa72dd19bfae05577e06c7c0c1900c371fcd5893f7e1d56a37d30174671f6",
    },
];

fn secret_key(hex_key: &str) -> SecretKey {
    SecretKey::from_bytes(hex::decode_array(hex_key).unwrap()).unwrap()
}

#[test]
fn rfc6979_known_answers() {
    let ecdsa = Ecdsa::rfc6979();
    for vector in VECTORS.iter() {
        let sk = secret_key(vector.secret_key);
        let pk = PublicKey::from_secret_key(&CTX, &sk);
        let message: [u8; 32] = Sha256::digest(vector.message.as_bytes()).into();

        let signature = ecdsa.sign(&CTX, &message, &sk).unwrap();
        assert_eq!(signature.to_string(), vector.signature, "{}", vector.message);
        assert_eq!(hex::encode(&signature.to_der()), vector.der);
        assert_eq!(
            Signature::from_der(&hex::decode(vector.der).unwrap()).unwrap(),
            signature
        );
        assert!(ecdsa.verify(&CTX, &message, &signature, &pk));
        assert!(ecdsa.clone().enforce_low_s().verify(&CTX, &message, &signature, &pk));
    }
}

#[test]
fn extra_data_known_answer() {
    let ecdsa = Ecdsa::rfc6979();
    let sk = secret_key(VECTORS[0].secret_key);
    let message: [u8; 32] = Sha256::digest(b"Satoshi Nakamoto").into();
    let signature = ecdsa
        .sign_with_extra_data(&CTX, &message, &sk, &[1u8; 32])
        .unwrap();
    assert_eq!(
        signature.to_string(),
        "bb6cf569458d507451271380d2863dad30355387836d5c3287a4efbd5ed1ad8e4bb4b7899e803f760fe89027e55f5d93768983d6e28af4b5722f6226b345380e"
    );
}

#[test]
fn high_s_verifies_unless_enforced() {
    let ecdsa = Ecdsa::rfc6979();
    let vector = &VECTORS[2];
    let sk = secret_key(vector.secret_key);
    let pk = PublicKey::from_secret_key(&CTX, &sk);
    let message: [u8; 32] = Sha256::digest(vector.message.as_bytes()).into();
    let mut signature: Signature = vector.signature.parse().unwrap();
    signature.s = -signature.s;
    assert!(!signature.is_low_s());
    assert!(ecdsa.verify(&CTX, &message, &signature, &pk));
    assert!(!ecdsa.clone().enforce_low_s().verify(&CTX, &message, &signature, &pk));
    assert!(signature.normalize_s());
    assert_eq!(signature.to_string(), vector.signature);
}

#[test]
fn out_of_range_s_fails_to_parse() {
    let vector = &VECTORS[0];
    let n: [u8; 32] =
        hex::decode_array("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
            .unwrap();
    let mut bytes: [u8; 64] = hex::decode_array(vector.signature).unwrap();
    bytes[32..].copy_from_slice(&n);
    assert!(Signature::from_bytes(bytes).is_err());

    let mut der = vec![0x30, 0x46, 0x02, 0x21, 0x00];
    der.extend_from_slice(&bytes[..32]);
    der.extend_from_slice(&[0x02, 0x21, 0x00]);
    der.extend_from_slice(&n);
    assert!(Signature::from_der(&der).is_err());
    let lax = Signature::from_der_lax(&der).unwrap();
    assert_eq!(lax.s, Scalar::ZERO);
    let pk = PublicKey::from_secret_key(&CTX, &secret_key(vector.secret_key));
    let message: [u8; 32] = Sha256::digest(vector.message.as_bytes()).into();
    assert!(!Ecdsa::rfc6979().verify(&CTX, &message, &lax, &pk));
}
