//! Primitive encoding for on-disk node records
//!
//! All multi-byte values are big-endian so that node files stay readable by
//! TLC's `BufferedRandomAccessFile`, which writes through Java's `DataOutput`.
//!
//! # Nat encoding
//!
//! Non-negative lengths use a variable-width "nat" encoding:
//!
//! ```text
//! 0 ..= 0x7FFF          one i16, the value itself (sign bit clear)
//! 0x8000 ..= i32::MAX   one i32 holding -value (sign bit set on the first i16)
//! ```
//!
//! The reader looks at the sign of the first `i16` to decide whether a second
//! one follows.

use std::io::{self, Read, Write};

/// Largest value stored in the short (2-byte) nat form
pub const MAX_SHORT_NAT: usize = 0x7FFF;

/// Largest value the nat encoding can represent
pub const MAX_NAT: usize = i32::MAX as usize;

#[inline]
pub fn write_i16<W: Write>(w: &mut W, v: i16) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

#[inline]
pub fn write_i32<W: Write>(w: &mut W, v: i32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

#[inline]
pub fn write_i64<W: Write>(w: &mut W, v: i64) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

#[inline]
pub fn read_i16<R: Read>(r: &mut R) -> io::Result<i16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(i16::from_be_bytes(buf))
}

#[inline]
pub fn read_i32<R: Read>(r: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

#[inline]
pub fn read_i64<R: Read>(r: &mut R) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_be_bytes(buf))
}

/// Write a non-negative length in the nat encoding.
///
/// Fails with `InvalidInput` if `x` exceeds [`MAX_NAT`].
pub fn write_nat<W: Write>(w: &mut W, x: usize) -> io::Result<()> {
    if x <= MAX_SHORT_NAT {
        return write_i16(w, x as i16);
    }
    let x = i32::try_from(x).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("nat {} exceeds {}", x, MAX_NAT),
        )
    })?;
    write_i32(w, -x)
}

/// Read a length written by [`write_nat`].
pub fn read_nat<R: Read>(r: &mut R) -> io::Result<usize> {
    let first = read_i16(r)?;
    if first >= 0 {
        return Ok(first as usize);
    }
    let second = read_i16(r)? as u16;
    let packed = ((first as i32) << 16) | second as i32;
    packed
        .checked_neg()
        .map(|x| x as usize)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "nat out of range"))
}

/// Size in bytes of `x` in the nat encoding
pub fn nat_len(x: usize) -> usize {
    if x <= MAX_SHORT_NAT {
        2
    } else {
        4
    }
}
