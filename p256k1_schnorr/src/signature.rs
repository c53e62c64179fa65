use p256k1::{Error, Fe, Scalar, rand_core::RngCore};

/// A BIP-340 Schnorr signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    /// The x-coordinate of the signature's public nonce. Its y-coordinate is
    /// implicitly even.
    pub R_x: Fe,
    /// The challenge _response_ part of the signature.
    pub s: Scalar,
}

impl Signature {
    /// Serializes the signature as 64 bytes -- First the 32-byte nonce
    /// x-coordinate and then the 32-byte challenge response scalar.
    /// # Examples
    /// ```
    /// # let signature = p256k1_schnorr::Signature::random(&mut rand::thread_rng());
    /// let bytes = signature.to_bytes();
    /// assert_eq!(signature.R_x.to_bytes(), bytes[..32]);
    /// assert_eq!(signature.s.to_bytes(), bytes[32..]);
    /// ```
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[0..32].copy_from_slice(&self.R_x.to_bytes());
        bytes[32..64].copy_from_slice(&self.s.to_bytes());
        bytes
    }

    /// Gets a reference to the signature components as a tuple.
    pub fn as_tuple(&self) -> (&Fe, &Scalar) {
        (&self.R_x, &self.s)
    }

    /// Deserializes a signature from the byte representation produced by [`to_bytes`].
    ///
    /// Fails with [`Error::OutOfRange`] if the first 32 bytes are not less
    /// than the field prime or the last 32 are not less than the curve order.
    /// Whether `R_x` is on the curve is left to verification.
    ///
    /// # Examples
    /// ```
    /// # use p256k1_schnorr::Signature;
    /// # let bytes = [0u8;64];
    /// match Signature::from_bytes(bytes) {
    ///     Ok(signature) => println!("the bytes were a valid encoding of a signature!"),
    ///     Err(e) => eprintln!("the bytes did *not* encode a valid signature: {}", e),
    /// }
    /// ```
    ///
    /// [`to_bytes`]: crate::Signature::to_bytes
    pub fn from_bytes(bytes: [u8; 64]) -> Result<Self, Error> {
        let mut R_x = [0u8; 32];
        R_x.copy_from_slice(&bytes[0..32]);
        let R_x = Fe::from_bytes(R_x).ok_or(Error::OutOfRange)?;
        let s = Scalar::from_slice(&bytes[32..64]).ok_or(Error::OutOfRange)?;
        Ok(Signature { R_x, s })
    }

    /// Convenience method for calling [`from_bytes`](Signature::from_bytes)
    /// on a slice. Fails with [`Error::InvalidInput`] if it is not 64 bytes long.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 64] = slice.try_into().map_err(|_| Error::InvalidInput)?;
        Self::from_bytes(bytes)
    }

    /// Generates a uniformly distributed signature. It will be valid for an
    /// infinite number of messages on every key but computationally you will
    /// never be able to find one! Useful for testing.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let R = p256k1::Point::random(rng);
        Signature {
            R_x: R.x(),
            s: Scalar::random(rng),
        }
    }
}

p256k1::impl_fromstr_deserialize! {
    name => "secp256k1 Schnorr signature",
    fn from_bytes(bytes: [u8;64]) -> Option<Signature> {
        Signature::from_bytes(bytes).ok()
    }
}

p256k1::impl_display_debug_serialize! {
    fn to_bytes(signature: &Signature) -> [u8;64] {
        signature.to_bytes()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;
    use p256k1::hex;

    #[test]
    fn range_checks() {
        let p: [u8; 32] =
            hex::decode_array("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f")
                .unwrap();
        let n: [u8; 32] =
            hex::decode_array("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&p);
        assert_eq!(Signature::from_bytes(bytes), Err(Error::OutOfRange));
        let mut bytes = [0u8; 64];
        bytes[32..].copy_from_slice(&n);
        assert_eq!(Signature::from_bytes(bytes), Err(Error::OutOfRange));
        assert_eq!(Signature::from_slice(&[0u8; 63]), Err(Error::InvalidInput));
    }

    #[test]
    fn hex_roundtrip() {
        let signature = Signature::random(&mut rand::thread_rng());
        let hex = alloc::string::ToString::to_string(&signature);
        assert_eq!(Signature::from_str(&hex).unwrap(), signature);
        assert_eq!(Signature::from_bytes(signature.to_bytes()).unwrap(), signature);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let signature = Signature::random(&mut rand::thread_rng());
        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(serde_json::from_str::<Signature>(&json).unwrap(), signature);
        let bytes = bincode::serde::encode_to_vec(signature, bincode::config::standard()).unwrap();
        assert_eq!(bytes.len(), 64);
    }
}
