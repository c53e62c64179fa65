use core::ops::Deref;
use p256k1::{Error, Scalar};

/// The longest DER encoding of a signature: two 33-byte integers plus headers.
pub const MAX_DER_LEN: usize = 72;

/// An ECDSA signature.
///
/// Both components are reduced scalars but either can be zero: the lax DER
/// parser maps unrepresentable values to zero so that they fail to verify.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    /// The x-coordinate of the nonce point reduced modulo the curve order.
    pub R_x: Scalar,
    /// The signature proper.
    pub s: Scalar,
}

impl Signature {
    /// The 64-byte `r ‖ s` encoding.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[0..32].copy_from_slice(&self.R_x.to_bytes()[..]);
        bytes[32..64].copy_from_slice(&self.s.to_bytes()[..]);
        bytes
    }

    /// Parses the 64-byte `r ‖ s` encoding.
    ///
    /// Fails with [`Error::OutOfRange`] if either half is not less than the
    /// curve order. Zero values are accepted here and rejected by verification.
    pub fn from_bytes(bytes: [u8; 64]) -> Result<Self, Error> {
        let R_x = Scalar::from_slice(&bytes[0..32]).ok_or(Error::OutOfRange)?;
        let s = Scalar::from_slice(&bytes[32..64]).ok_or(Error::OutOfRange)?;
        Ok(Self { R_x, s })
    }

    /// Gets a reference to the signature components as a tuple.
    pub fn as_tuple(&self) -> (&Scalar, &Scalar) {
        (&self.R_x, &self.s)
    }

    /// Whether `s` is in the lower half of the scalar range.
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }

    /// Replaces `s` with `n - s` if it is high. Returns whether it changed.
    ///
    /// ```
    /// use p256k1_ecdsa::Signature;
    /// use p256k1::Scalar;
    /// let mut sig = Signature { R_x: Scalar::ONE, s: Scalar::minus_one() };
    /// assert!(sig.normalize_s());
    /// assert_eq!(sig.s, Scalar::ONE);
    /// assert!(!sig.normalize_s());
    /// ```
    pub fn normalize_s(&mut self) -> bool {
        let high = self.s.is_high();
        self.s.conditional_negate(high);
        high.into()
    }

    /// Parses a strictly encoded DER signature.
    ///
    /// Anything other than a minimal encoding of a `SEQUENCE` holding exactly
    /// two `INTEGER`s fails with [`Error::InvalidInput`]. Negative integers
    /// and integers not less than the curve order fail with
    /// [`Error::OutOfRange`].
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let mut reader = DerReader::new(der);
        reader.expect_tag(0x30)?;
        let len = reader.read_len()?;
        if len != reader.remaining() {
            return Err(Error::InvalidInput);
        }
        let R_x = reader.read_integer()?;
        let s = reader.read_integer()?;
        if reader.remaining() != 0 {
            return Err(Error::InvalidInput);
        }
        Ok(Self { R_x, s })
    }

    /// Parses a DER signature the way old Bitcoin nodes did.
    ///
    /// Accepts arbitrary length-of-length bytes, excess zero padding and
    /// ignores anything after the second integer. Integers that do not fit
    /// below the curve order make the whole signature zero, which never
    /// verifies. Structural errors still fail with [`Error::InvalidInput`].
    pub fn from_der_lax(der: &[u8]) -> Result<Self, Error> {
        let mut pos = 0;
        if next_byte(der, &mut pos)? != 0x30 {
            return Err(Error::InvalidInput);
        }
        let lenbyte = next_byte(der, &mut pos)?;
        if lenbyte & 0x80 != 0 {
            let skip = (lenbyte - 0x80) as usize;
            if skip > der.len() - pos {
                return Err(Error::InvalidInput);
            }
            pos += skip;
        }

        let r = lax_integer(der, &mut pos)?;
        let s = lax_integer(der, &mut pos)?;

        match (lax_scalar(r), lax_scalar(s)) {
            (Some(R_x), Some(s)) => Ok(Self { R_x, s }),
            _ => Ok(Self {
                R_x: Scalar::ZERO,
                s: Scalar::ZERO,
            }),
        }
    }

    /// The minimal DER encoding.
    ///
    /// ```
    /// use p256k1_ecdsa::Signature;
    /// use p256k1::Scalar;
    /// let sig = Signature { R_x: Scalar::ONE, s: Scalar::from(0x80) };
    /// assert_eq!(&sig.to_der()[..], &[0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80]);
    /// ```
    pub fn to_der(&self) -> SerializedDer {
        let mut out = SerializedDer {
            buf: [0u8; MAX_DER_LEN],
            len: 0,
        };
        let mut r = [0u8; 33];
        let mut s = [0u8; 33];
        r[1..].copy_from_slice(&self.R_x.to_bytes());
        s[1..].copy_from_slice(&self.s.to_bytes());
        let r = minimal_integer(&r);
        let s = minimal_integer(&s);

        out.buf[0] = 0x30;
        out.buf[1] = (4 + r.len() + s.len()) as u8;
        out.buf[2] = 0x02;
        out.buf[3] = r.len() as u8;
        out.buf[4..4 + r.len()].copy_from_slice(r);
        let s_start = 4 + r.len();
        out.buf[s_start] = 0x02;
        out.buf[s_start + 1] = s.len() as u8;
        out.buf[s_start + 2..s_start + 2 + s.len()].copy_from_slice(s);
        out.len = s_start + 2 + s.len();
        out
    }
}

/// Strips leading zeros while keeping the integer non-negative.
fn minimal_integer(bytes: &[u8; 33]) -> &[u8] {
    let mut start = 0;
    while start < 32 && bytes[start] == 0 && bytes[start + 1] < 0x80 {
        start += 1;
    }
    &bytes[start..]
}

fn next_byte(der: &[u8], pos: &mut usize) -> Result<u8, Error> {
    let b = *der.get(*pos).ok_or(Error::InvalidInput)?;
    *pos += 1;
    Ok(b)
}

fn lax_integer<'a>(der: &'a [u8], pos: &mut usize) -> Result<&'a [u8], Error> {
    if next_byte(der, pos)? != 0x02 {
        return Err(Error::InvalidInput);
    }
    let lenbyte = next_byte(der, pos)?;
    let len = if lenbyte & 0x80 != 0 {
        let mut lenlen = (lenbyte - 0x80) as usize;
        if lenlen > der.len() - *pos {
            return Err(Error::InvalidInput);
        }
        while lenlen > 0 && der[*pos] == 0 {
            *pos += 1;
            lenlen -= 1;
        }
        if lenlen >= core::mem::size_of::<usize>() {
            return Err(Error::InvalidInput);
        }
        let mut len = 0usize;
        for _ in 0..lenlen {
            len = (len << 8) + der[*pos] as usize;
            *pos += 1;
        }
        len
    } else {
        lenbyte as usize
    };
    if len > der.len() - *pos {
        return Err(Error::InvalidInput);
    }
    let value = &der[*pos..*pos + len];
    *pos += len;
    Ok(value)
}

fn lax_scalar(mut bytes: &[u8]) -> Option<Scalar> {
    while let [0, rest @ ..] = bytes {
        bytes = rest;
    }
    if bytes.len() > 32 {
        return None;
    }
    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(bytes);
    Scalar::from_bytes(padded)
}

struct DerReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn next(&mut self) -> Result<u8, Error> {
        let b = *self.bytes.get(self.pos).ok_or(Error::InvalidInput)?;
        self.pos += 1;
        Ok(b)
    }

    fn expect_tag(&mut self, tag: u8) -> Result<(), Error> {
        if self.next()? != tag {
            return Err(Error::InvalidInput);
        }
        Ok(())
    }

    fn read_len(&mut self) -> Result<usize, Error> {
        let b1 = self.next()?;
        if b1 & 0x80 == 0 {
            return Ok(b1 as usize);
        }
        // 0x80 is indefinite length and 0xff is reserved
        if b1 == 0x80 || b1 == 0xff {
            return Err(Error::InvalidInput);
        }
        let lenlen = (b1 & 0x7f) as usize;
        if lenlen > self.remaining() || lenlen > core::mem::size_of::<usize>() {
            return Err(Error::InvalidInput);
        }
        if self.bytes[self.pos] == 0 {
            return Err(Error::InvalidInput);
        }
        let mut len = 0usize;
        for _ in 0..lenlen {
            len = (len << 8) | self.next()? as usize;
        }
        if len > self.remaining() || len < 0x80 {
            return Err(Error::InvalidInput);
        }
        Ok(len)
    }

    fn read_integer(&mut self) -> Result<Scalar, Error> {
        self.expect_tag(0x02)?;
        let len = self.read_len()?;
        if len == 0 || len > self.remaining() {
            return Err(Error::InvalidInput);
        }
        let value = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        match value {
            [0x00, next, ..] if next & 0x80 == 0 => return Err(Error::InvalidInput),
            [0xff, next, ..] if next & 0x80 != 0 => return Err(Error::InvalidInput),
            [first, ..] if first & 0x80 != 0 => return Err(Error::OutOfRange),
            _ => {}
        }
        let value = match value {
            [0x00, rest @ ..] => rest,
            _ => value,
        };
        if value.len() > 32 {
            return Err(Error::OutOfRange);
        }
        let mut padded = [0u8; 32];
        padded[32 - value.len()..].copy_from_slice(value);
        Scalar::from_bytes(padded).ok_or(Error::OutOfRange)
    }
}

/// A DER encoded signature held on the stack.
#[derive(Clone, Copy)]
pub struct SerializedDer {
    buf: [u8; MAX_DER_LEN],
    len: usize,
}

impl Deref for SerializedDer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl AsRef<[u8]> for SerializedDer {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl PartialEq for SerializedDer {
    fn eq(&self, other: &Self) -> bool {
        self[..] == other[..]
    }
}

impl Eq for SerializedDer {}

impl core::fmt::Debug for SerializedDer {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "SerializedDer(")?;
        for byte in self.iter() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

p256k1::impl_fromstr_deserialize! {
    name => "secp256k1 ECDSA signature",
    fn from_bytes(bytes: [u8;64]) -> Option<Signature> {
        Signature::from_bytes(bytes).ok()
    }
}

p256k1::impl_display_debug_serialize! {
    fn to_bytes(sig: &Signature) -> [u8;64] {
        sig.to_bytes()
    }
}
