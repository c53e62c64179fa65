//! Deterministic nonce generation.
//!
//! Signing nonces must be uniformly random and never reused with different
//! messages. [`Rfc6979`] derives them from the secret key and message with the
//! HMAC-SHA256 based generator from [RFC6979] section 3.2, the same construction
//! used to draw the blinding values for fixed-base multiplication.
//!
//! [RFC6979]: https://www.rfc-editor.org/rfc/rfc6979#section-3.2
use crate::Scalar;
use hmac::{
    Hmac, Mac,
    digest::{Key, KeyInit},
};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn hmac(key: &[u8; 32]) -> HmacSha256 {
    // HMAC zero pads keys shorter than the block size
    let mut block = Key::<HmacSha256>::default();
    block[..32].copy_from_slice(key);
    <HmacSha256 as KeyInit>::new(&block)
}

/// The RFC6979 HMAC-SHA256 deterministic random bit generator.
///
/// # Example
/// ```
/// use p256k1::nonce::HmacDrbg;
/// let mut rng = HmacDrbg::new(b"seed material");
/// let mut out = [0u8; 32];
/// rng.generate(&mut out);
/// let mut again = HmacDrbg::new(b"seed material");
/// let mut out_again = [0u8; 32];
/// again.generate(&mut out_again);
/// assert_eq!(out, out_again);
/// ```
#[derive(Clone)]
pub struct HmacDrbg {
    v: [u8; 32],
    k: [u8; 32],
    retry: bool,
}

impl HmacDrbg {
    /// Initializes the generator with `key` as the seed material.
    pub fn new(key: &[u8]) -> Self {
        let mut drbg = Self {
            v: [0x01; 32],
            k: [0x00; 32],
            retry: false,
        };
        drbg.update(Some(key), 0x00);
        drbg.update(Some(key), 0x01);
        drbg
    }

    /// K = HMAC_K(V ‖ sep ‖ data), V = HMAC_K(V)
    fn update(&mut self, data: Option<&[u8]>, sep: u8) {
        let mut mac = hmac(&self.k);
        mac.update(&self.v);
        mac.update(&[sep]);
        if let Some(data) = data {
            mac.update(data);
        }
        self.k = mac.finalize().into_bytes().into();
        self.next_v();
    }

    fn next_v(&mut self) {
        let mut mac = hmac(&self.k);
        mac.update(&self.v);
        self.v = mac.finalize().into_bytes().into();
    }

    /// Fills `out` with the next output bytes.
    pub fn generate(&mut self, out: &mut [u8]) {
        if self.retry {
            self.update(None, 0x00);
        }

        for chunk in out.chunks_mut(32) {
            self.next_v();
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }

        self.retry = true;
    }

    /// Clears the generator state.
    pub fn finalize(&mut self) {
        self.v = [0u8; 32];
        self.k = [0u8; 32];
        self.retry = false;
    }
}

impl Drop for HmacDrbg {
    fn drop(&mut self) {
        self.finalize()
    }
}

/// A function that produces 32-byte signing nonce candidates.
///
/// `attempt` starts at zero and is incremented each time the signer rejects
/// the previous candidate. Returning `None` makes the signer give up with
/// [`Error::NonceExhausted`].
///
/// [`Error::NonceExhausted`]: crate::Error::NonceExhausted
pub trait NonceFn {
    /// Returns the candidate for `attempt`.
    fn nonce(
        &self,
        msg32: &[u8; 32],
        key32: &[u8; 32],
        algo16: Option<&[u8; 16]>,
        data: Option<&[u8; 32]>,
        attempt: u32,
    ) -> Option<[u8; 32]>;
}

/// RFC6979 nonces: the generator is seeded with `key ‖ (msg mod n) ‖ data ‖ algo16`
/// and the `attempt`-th output is returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rfc6979;

impl NonceFn for Rfc6979 {
    fn nonce(
        &self,
        msg32: &[u8; 32],
        key32: &[u8; 32],
        algo16: Option<&[u8; 16]>,
        data: Option<&[u8; 32]>,
        attempt: u32,
    ) -> Option<[u8; 32]> {
        let mut keydata = [0u8; 112];
        let mut len = 64;
        keydata[..32].copy_from_slice(key32);
        // the message is reduced so that hashes >= n give the same nonce as their reduction
        let msg = Scalar::from_bytes_mod_order(*msg32);
        keydata[32..64].copy_from_slice(&msg.to_bytes());
        if let Some(data) = data {
            keydata[len..len + 32].copy_from_slice(data);
            len += 32;
        }
        if let Some(algo16) = algo16 {
            keydata[len..len + 16].copy_from_slice(algo16);
            len += 16;
        }

        let mut rng = HmacDrbg::new(&keydata[..len]);
        let mut nonce = [0u8; 32];
        for _ in 0..=attempt {
            rng.generate(&mut nonce);
        }
        Some(nonce)
    }
}
