//! The error type shared by every crate in the workspace.
use core::fmt;

/// Errors returned when parsing, signing, tweaking or verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The input had the wrong length or an invalid encoding.
    InvalidInput,
    /// The encoded coordinates do not lie on the curve.
    PointNotOnCurve,
    /// An encoded field element or scalar was not less than its modulus.
    OutOfRange,
    /// A secret key (or a secret derived by tweaking) was zero or not less than the group order.
    InvalidSecretKey,
    /// A signature or tweak did not verify.
    VerificationFailed,
    /// The nonce function failed to produce a usable nonce.
    NonceExhausted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;
        match self {
            InvalidInput => write!(f, "invalid input encoding"),
            PointNotOnCurve => write!(f, "point is not on the secp256k1 curve"),
            OutOfRange => write!(f, "value is not less than the modulus"),
            InvalidSecretKey => write!(f, "secret key is zero or not less than the curve order"),
            VerificationFailed => write!(f, "verification failed"),
            NonceExhausted => write!(f, "nonce function could not produce a valid nonce"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
