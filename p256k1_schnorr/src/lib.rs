//! [BIP-340] Schnorr signatures over secp256k1 built on [`p256k1`].
//!
//! ```
//! use p256k1::{Context, KeyPair, SecretKey};
//! use p256k1_schnorr::{Schnorr, Signature};
//!
//! let ctx = Context::new();
//! let schnorr = Schnorr::new();
//! let keypair = KeyPair::new(&ctx, SecretKey::random(&mut rand::thread_rng()));
//! let message = [42u8; 32];
//! let signature = schnorr
//!     .sign_with_rng(&ctx, &keypair, &message, &mut rand::thread_rng())
//!     .unwrap();
//! let (public_key, _) = keypair.x_only_public_key();
//! assert!(schnorr.verify(&ctx, &public_key, &message, &signature));
//! assert_eq!(Signature::from_bytes(signature.to_bytes()).unwrap(), signature);
//! ```
//!
//! [BIP-340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki
#![no_std]
#![allow(non_snake_case)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use p256k1;
pub use p256k1::{KeyPair, Parity, XOnlyPublicKey};

mod signature;
pub use signature::Signature;
mod schnorr;
pub use schnorr::Schnorr;
