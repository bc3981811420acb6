//! Shared codec helpers for bounded byte-string fields.

use bytes::Buf;
use commonware_codec::{Error, ReadRangeExt};

/// Read a length-prefixed byte string that must be either empty or within
/// `min..=max` bytes. Used for fields that are unset until a phase is reached
/// (commits, reveals, seeds, ciphertexts).
pub fn read_optional_bytes(
    reader: &mut impl Buf,
    min: usize,
    max: usize,
    ty: &'static str,
) -> Result<Vec<u8>, Error> {
    let bytes = Vec::<u8>::read_range(reader, 0..=max)?;
    if !bytes.is_empty() && bytes.len() < min {
        return Err(Error::Invalid(ty, "length out of range"));
    }
    Ok(bytes)
}
