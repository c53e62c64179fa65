use criterion::{Criterion, criterion_group, criterion_main};
use p256k1::{Context, PublicKey, SecretKey};
use p256k1_ecdsa::{Ecdsa, Signature};

const MESSAGE: &[u8; 32] = b"hello world you are beautiful!!!";

lazy_static::lazy_static! {
    static ref CTX: Context = Context::new();
    static ref SK: SecretKey = SecretKey::from_bytes(*b"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx").unwrap();
    static ref ECDSA: Ecdsa = Ecdsa::rfc6979();
}

fn sign_ecdsa(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecdsa_sign");
    group.bench_function("ecdsa_sign", |b| b.iter(|| ECDSA.sign(&CTX, MESSAGE, &SK)));
}

fn verify_ecdsa(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecdsa_verify");

    let signature = ECDSA.sign(&CTX, MESSAGE, &SK).unwrap();
    let pk = PublicKey::from_secret_key(&CTX, &SK);

    group.bench_function("ecdsa_verify", |b| {
        b.iter(|| ECDSA.verify(&CTX, MESSAGE, &signature, &pk))
    });

    let der = signature.to_der();
    group.bench_function("ecdsa_parse_der_and_verify", |b| {
        b.iter(|| {
            Signature::from_der(&der)
                .map(|sig| ECDSA.verify(&CTX, MESSAGE, &sig, &pk))
                .unwrap_or(false)
        })
    });
}

criterion_group!(benches, sign_ecdsa, verify_ecdsa);
criterion_main!(benches);
