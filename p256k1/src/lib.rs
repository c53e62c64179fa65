//! Pure Rust secp256k1.
//!
//! Field and scalar arithmetic, the group law, and the precomputed
//! multiplication contexts that signing and verification are built on.
//!
//! ```
//! use p256k1::{Context, Point, keys::{KeyPair, SecretKey}};
//! let ctx = Context::new();
//! let keypair = KeyPair::new(&ctx, SecretKey::random(&mut rand::thread_rng()));
//! let pk = keypair.public_key();
//! assert_eq!(
//!     pk.to_point(),
//!     Point::generator() * *keypair.secret_key().as_scalar()
//! );
//! ```
#![no_std]
#![allow(non_snake_case)]
#![warn(missing_docs)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod context;
pub mod ecmult;
pub mod error;
pub mod field;
pub mod group;
pub mod hash;
pub mod hex;
pub mod keys;
pub mod nonce;
pub mod point;
pub mod scalar;

#[cfg(any(test, feature = "proptest"))]
mod proptest_impls;

pub use context::{Context, ContextConfig};
pub use error::Error;
pub use field::Fe;
pub use keys::{KeyPair, Parity, PublicKey, SecretKey, XOnlyPublicKey};
pub use point::Point;
pub use scalar::Scalar;

pub use digest;
pub use rand_core;
pub use subtle;

#[cfg(feature = "serde")]
pub extern crate serde;

#[cfg(feature = "proptest")]
pub extern crate proptest;
