use criterion::{Criterion, criterion_group, criterion_main};
use p256k1::{Context, KeyPair, XOnlyPublicKey};
use p256k1_schnorr::{Schnorr, Signature};

const MESSAGE: &[u8; 32] = b"hello world you are beautiful!!!";

lazy_static::lazy_static! {
    static ref CTX: Context = Context::new();
    static ref KEYPAIR: KeyPair = KeyPair::from_bytes(&CTX, *b"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx").unwrap();
    static ref SCHNORR: Schnorr = Schnorr::new();
}

fn sign_schnorr(c: &mut Criterion) {
    let mut group = c.benchmark_group("schnorr_sign");
    group.bench_function("schnorr_sign", |b| {
        b.iter(|| SCHNORR.sign(&CTX, &KEYPAIR, MESSAGE, &[0u8; 32]))
    });
}

fn verify_schnorr(c: &mut Criterion) {
    let mut group = c.benchmark_group("schnorr_verify");
    let signature = SCHNORR.sign(&CTX, &KEYPAIR, MESSAGE, &[0u8; 32]).unwrap();
    let (public_key, _) = KEYPAIR.x_only_public_key();

    group.bench_function("schnorr_verify", |b| {
        b.iter(|| SCHNORR.verify(&CTX, &public_key, MESSAGE, &signature))
    });

    let bytes = signature.to_bytes();
    let key_bytes = public_key.to_bytes();
    group.bench_function("schnorr_parse_and_verify", |b| {
        b.iter(|| {
            match (
                XOnlyPublicKey::from_bytes(key_bytes),
                Signature::from_bytes(bytes),
            ) {
                (Ok(public_key), Ok(signature)) => {
                    SCHNORR.verify(&CTX, &public_key, MESSAGE, &signature)
                }
                _ => false,
            }
        })
    });
}

criterion_group!(benches, sign_schnorr, verify_schnorr);
criterion_main!(benches);
