//! Hex encoding and decoding used by the `Display`, `FromStr` and serde implementations.
use alloc::{string::String, vec::Vec};
use core::fmt;

/// Error representing a failed conversion from hex into the bytes for the target type.
#[derive(Debug, Clone, PartialEq)]
pub enum HexError {
    /// The string was not a valid hex string.
    InvalidHex,
    /// The string was not the right length for the target type.
    InvalidLength,
    /// The bytes did not encode a valid value for the target type.
    InvalidEncoding,
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use HexError::*;
        match self {
            InvalidHex => write!(f, "invalid hex string"),
            InvalidLength => write!(f, "hex string had an invalid length"),
            InvalidEncoding => write!(f, "hex value did not encode the expected type"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HexError {}

#[doc(hidden)]
pub fn hex_val(c: u8) -> Result<u8, HexError> {
    match c {
        b'A'..=b'F' => Ok(c - b'A' + 10),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'0'..=b'9' => Ok(c - b'0'),
        _ => Err(HexError::InvalidHex),
    }
}

/// Encode some bytes as a lowercase hex String.
///
/// # Examples
/// ```
/// use p256k1::{hex, Point};
/// let g_hex = hex::encode(&Point::generator().to_bytes());
/// assert_eq!(g_hex, "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    const CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push(CHARS[(byte >> 4) as usize] as char);
        hex.push(CHARS[(byte & 0x0f) as usize] as char);
    }
    hex
}

/// Decode some hex into a `Vec<u8>`.
///
/// # Examples
/// ```
/// use p256k1::{hex, Point};
/// let g_bytes = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
/// assert_eq!(&g_bytes[..], &Point::generator().to_bytes()[..]);
/// ```
pub fn decode(hex: &str) -> Result<Vec<u8>, HexError> {
    if (hex.len() % 2) != 0 {
        return Err(HexError::InvalidHex);
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);

    for hex_byte in hex.as_bytes().chunks(2) {
        bytes.push((hex_val(hex_byte[0])? << 4) | hex_val(hex_byte[1])?)
    }

    Ok(bytes)
}

/// Decode some hex into a fixed length array.
///
/// # Examples
/// ```
/// use p256k1::{hex, Point};
/// let g_bytes: [u8; 33] = hex::decode_array("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
/// assert_eq!(g_bytes, Point::generator().to_bytes());
/// ```
pub fn decode_array<const N: usize>(hex: &str) -> Result<[u8; N], HexError> {
    let mut bytes = [0u8; N];
    if hex.len() % 2 != 0 {
        return Err(HexError::InvalidHex);
    }
    if hex.len() != N * 2 {
        return Err(HexError::InvalidLength);
    }
    for (hex_byte, byte) in hex.as_bytes().chunks(2).zip(bytes.iter_mut()) {
        *byte = (hex_val(hex_byte[0])? << 4) | hex_val(hex_byte[1])?
    }
    Ok(bytes)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(decode("abc"), Err(HexError::InvalidHex));
        assert_eq!(decode("zz"), Err(HexError::InvalidHex));
        assert_eq!(decode_array::<2>("aabbcc"), Err(HexError::InvalidLength));
        assert_eq!(decode_array::<2>("AaBb"), Ok([0xaa, 0xbb]));
    }

    #[test]
    fn encode_decode() {
        let bytes = [0x00, 0x01, 0xfe, 0xff];
        assert_eq!(encode(&bytes), "0001feff");
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes.to_vec());
    }
}
