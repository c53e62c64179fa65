//! Generally useful utilities related to hashing.
//!
//! In general, things in here are defined against the [`Digest`] trait from the [`RustCrypto`] project.
//!
//! [`Digest`]: digest::Digest
//! [`RustCrypto`]: https://github.com/RustCrypto/hashes
use crate::{field::Fe, Scalar};
use digest::{Digest, Update};
use sha2::Sha256;

/// Generates a BIP-340 tagged hash from a tag.
///
/// Returns the _tagged_ (domain separated) SHA256 instance as introduced in
/// [BIP-340](https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki):
/// the state after absorbing `SHA256(tag) ‖ SHA256(tag)`. Clone it to reuse
/// the midstate.
///
/// # Example
/// ```
/// use digest::Digest;
/// use p256k1::hash::tagged_hash;
/// let mut hash = tagged_hash(b"my-domain/my-purpose");
/// hash.update(b"hello world");
/// println!("{:?}", hash.finalize());
/// ```
pub fn tagged_hash(tag: &[u8]) -> Sha256 {
    let hashed_tag = Sha256::digest(tag);
    let mut tagged_hash = Sha256::default();
    Digest::update(&mut tagged_hash, hashed_tag);
    Digest::update(&mut tagged_hash, hashed_tag);
    tagged_hash
}

/// Computes `SHA256(SHA256(tag) ‖ SHA256(tag) ‖ msg)` in one go.
pub fn tagged_hash_bytes(tag: &[u8], msg: &[u8]) -> [u8; 32] {
    tagged_hash(tag).add(msg).finalize().into()
}

/// Extension trait for hashes that can be domain separated with a tag.
pub trait Tagged: Default + Clone {
    /// Returns the hash state after absorbing the tag.
    fn tagged(tag: &[u8]) -> Self;
}

impl Tagged for Sha256 {
    fn tagged(tag: &[u8]) -> Self {
        tagged_hash(tag)
    }
}

/// Anything that can be hashed.
///
/// The implementations of this trait decide how the type will be converted into
/// bytes so that it can be included in the hash.
///
/// # Example
///
/// ```
/// use digest::Digest;
/// use p256k1::hash::{HashAdd, HashInto};
/// struct CryptoData([u8; 42]);
///
/// impl HashInto for CryptoData {
///     fn hash_into(&self, hash: &mut impl digest::Update) {
///         hash.update(&self.0[..])
///     }
/// }
///
/// let cryptodata = CryptoData([42u8; 42]);
/// let hash = sha2::Sha256::default().add(&cryptodata).finalize();
/// ```
pub trait HashInto {
    /// Asks the item to convert itself to bytes and add itself to `hash`.
    fn hash_into(&self, hash: &mut impl Update);
}

impl HashInto for [u8] {
    fn hash_into(&self, hash: &mut impl Update) {
        hash.update(self)
    }
}

impl<const N: usize> HashInto for [u8; N] {
    fn hash_into(&self, hash: &mut impl Update) {
        hash.update(&self[..])
    }
}

impl HashInto for Scalar {
    fn hash_into(&self, hash: &mut impl Update) {
        hash.update(&self.to_bytes())
    }
}

impl HashInto for Fe {
    fn hash_into(&self, hash: &mut impl Update) {
        hash.update(&self.to_bytes())
    }
}

/// Extension trait for [`digest::Update`] to make adding things to the hash convenient.
pub trait HashAdd {
    /// Converts something that implements [`HashInto`] to bytes and then incorporates the result into the digest (`self`).
    fn add<HI: HashInto + ?Sized>(self, data: &HI) -> Self;
}

impl<D: Update> HashAdd for D {
    fn add<HI: HashInto + ?Sized>(mut self, data: &HI) -> Self {
        data.hash_into(&mut self);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex;

    #[test]
    fn bip340_challenge_midstate() {
        // SHA256("BIP0340/challenge")
        let hashed_tag = Sha256::digest(b"BIP0340/challenge");
        assert_eq!(
            hex::encode(&hashed_tag),
            "7bb52d7a9fef58323eb1bf7a407db382d2f3f2d81bb1224f49fe518f6d48d37c"
        );
        let manual: [u8; 32] = Sha256::default()
            .add(&hashed_tag[..])
            .add(&hashed_tag[..])
            .add(b"hello")
            .finalize()
            .into();
        assert_eq!(tagged_hash_bytes(b"BIP0340/challenge", b"hello"), manual);
        assert_eq!(
            <Sha256 as Tagged>::tagged(b"BIP0340/challenge")
                .add(b"hello")
                .finalize()
                .as_slice(),
            &manual[..]
        );
    }
}
