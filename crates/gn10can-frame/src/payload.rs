//! Fixed-width values in the 8-byte data field.
//!
//! Multi-byte values are little-endian. Only fixed-layout types implement
//! [`Scalar`]; there is no variable-length encoding.

use bytes::{Buf, BufMut};

use crate::error::{PayloadError, Result};
use crate::frame::{Frame, MAX_DLC};

/// A fixed-size value that can be copied into and out of the data field.
pub trait Scalar: Copy + Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Encode into `dst`, which is exactly `SIZE` bytes long.
    fn put(self, dst: &mut [u8]);

    /// Decode from `src`, which is exactly `SIZE` bytes long.
    fn get(src: &[u8]) -> Self;
}

macro_rules! scalar_le {
    ($($ty:ty => $put:ident, $get:ident;)+) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn put(self, mut dst: &mut [u8]) {
                    dst.$put(self);
                }

                fn get(mut src: &[u8]) -> Self {
                    src.$get()
                }
            }
        )+
    };
}

scalar_le! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16_le, get_u16_le;
    i16 => put_i16_le, get_i16_le;
    u32 => put_u32_le, get_u32_le;
    i32 => put_i32_le, get_i32_le;
    u64 => put_u64_le, get_u64_le;
    i64 => put_i64_le, get_i64_le;
    f32 => put_f32_le, get_f32_le;
    f64 => put_f64_le, get_f64_le;
}

impl Scalar for bool {
    const SIZE: usize = 1;

    fn put(self, mut dst: &mut [u8]) {
        dst.put_u8(u8::from(self));
    }

    fn get(mut src: &[u8]) -> Self {
        src.get_u8() != 0
    }
}

impl<const N: usize> Scalar for [u8; N] {
    const SIZE: usize = N;

    fn put(self, mut dst: &mut [u8]) {
        dst.put_slice(&self);
    }

    fn get(mut src: &[u8]) -> Self {
        let mut out = [0u8; N];
        src.copy_to_slice(&mut out);
        out
    }
}

fn end_of<T: Scalar>(offset: usize, max: usize) -> Result<usize> {
    match offset.checked_add(T::SIZE) {
        Some(end) if end <= max => Ok(end),
        _ => Err(PayloadError::OutOfBounds {
            offset,
            size: T::SIZE,
            max,
        }),
    }
}

/// Encode `value` into `buf` at `offset`.
///
/// Fails without touching `buf` if the value does not fit.
pub fn pack<T: Scalar>(buf: &mut [u8], offset: usize, value: T) -> Result<()> {
    let end = end_of::<T>(offset, buf.len())?;
    value.put(&mut buf[offset..end]);
    Ok(())
}

/// Decode a value from `buf` at `offset`.
pub fn unpack<T: Scalar>(buf: &[u8], offset: usize) -> Result<T> {
    let end = end_of::<T>(offset, buf.len())?;
    Ok(T::get(&buf[offset..end]))
}

/// Write `value` into the frame at `offset`.
///
/// Fails without mutating the frame if `offset + size > 8`. On success the
/// declared length grows to cover the value; it never shrinks.
pub fn write<T: Scalar>(frame: &mut Frame, offset: usize, value: T) -> Result<()> {
    let end = end_of::<T>(offset, MAX_DLC)?;
    value.put(&mut frame.data[offset..end]);
    if usize::from(frame.dlc) < end {
        frame.dlc = end as u8;
    }
    Ok(())
}

/// Read a value from the frame at `offset`.
///
/// Bytes past the declared length are never read, even though they exist in
/// the buffer.
pub fn read<T: Scalar>(frame: &Frame, offset: usize) -> Result<T> {
    let end = end_of::<T>(offset, MAX_DLC)?;
    if end > usize::from(frame.dlc) {
        return Err(PayloadError::BeyondDlc {
            offset,
            size: T::SIZE,
            dlc: frame.dlc,
        });
    }
    Ok(T::get(&frame.data[offset..end]))
}

/// Read a value, falling back to `T::default()` when it is not present.
pub fn get<T: Scalar + Default>(frame: &Frame, offset: usize) -> T {
    read(frame, offset).unwrap_or_default()
}
