use core::ffi::CStr;
use core::fmt;
use core::fmt::Write;
use core::str::Utf8Error;

use super::two_pass::format_into;
use super::two_pass::formatted_len;
use crate::types::AltAllocator;
use crate::types::ErrorReason;
use crate::types::Global;
use crate::types::LengthType;
use crate::types::VxErr;
use crate::types::VxResult;
use crate::vx::Vx;

/// A byte string built on [`Vx`] that is always null terminated.
///
/// The underlying vector's count includes exactly one trailing `0` byte, so
/// the text is `len()` bytes long and `as_bytes_with_nul()` can be handed to
/// anything expecting a C string.
///
/// Text is usually UTF-8, but `push_byte` and `emplace_fmt` work on raw byte
/// positions and can break that; `to_str` reports it.
pub struct VxStr<A: AltAllocator = Global, L: LengthType = usize>
where
    usize: TryFrom<L>,
{
    buf: Vx<u8, A, L>,
}

impl VxStr {
    /// An empty string on the global allocator.
    pub fn new() -> VxResult<Self> {
        return Self::new_in(Global);
    }

    /// A string holding exactly the formatted text. See [`vx_str!`](crate::vx_str).
    pub fn from_fmt(args: fmt::Arguments<'_>) -> VxResult<Self> {
        return Self::from_fmt_in(Global, args);
    }
}

impl<A: AltAllocator, L: LengthType> VxStr<A, L>
where
    usize: TryFrom<L>,
{
    pub fn new_in(alloc: A) -> VxResult<Self> {
        let buf = Vx::create_in(alloc, L::ONE_VALUE, None)?;
        return Ok(Self { buf: buf });
    }

    pub fn from_fmt_in(alloc: A, args: fmt::Arguments<'_>) -> VxResult<Self> {
        let len = formatted_len(args)?;
        let Some(count) = len.checked_add(1).and_then(L::from_usize) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        let mut buf = Vx::create_in(alloc, count, None)?;
        format_into(buf.units_mut(0..len), args)?;
        return Ok(Self { buf: buf });
    }

    /// Takes the string out of `handle` and destroys it, leaving `None`.
    pub fn free(handle: &mut Option<Self>) {
        drop(handle.take());
    }

    /// Length of the text, without the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        return self.buf.len().as_usize() - 1;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Capacity of the underlying vector, terminator slot included.
    #[inline]
    pub const fn capacity(&self) -> L {
        return self.buf.capacity();
    }

    /// The underlying vector, terminator included.
    #[inline]
    pub const fn as_vx(&self) -> &Vx<u8, A, L> {
        return &self.buf;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        return &self.buf.as_slice()[..self.len()];
    }

    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        return self.buf.as_slice();
    }

    /// The text as a C string. Stops early at an interior `0` byte.
    pub fn as_c_str(&self) -> &CStr {
        return CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default();
    }

    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        return core::str::from_utf8(self.as_bytes());
    }

    /// Reallocates the underlying vector to exactly `new_capacity` units,
    /// terminator slot included.
    pub fn reserve(&mut self, new_capacity: L) -> VxResult<()> {
        return self.buf.reserve(new_capacity);
    }

    pub fn shrink(&mut self) -> VxResult<()> {
        return self.buf.shrink();
    }

    /// Writes `byte` where the terminator was and terminates after it.
    pub fn push_byte(&mut self, byte: u8) -> VxResult<()> {
        self.buf.grow(L::ONE_VALUE)?;
        let count = self.buf.len().as_usize();
        let text = self.buf.units_mut(count - 2..count);
        text[0] = byte;
        text[1] = 0;
        return Ok(());
    }

    /// Appends the UTF-8 encoding of `c`.
    pub fn push(&mut self, c: char) -> VxResult<()> {
        let mut utf8 = [0u8; 4];
        return self.push_str(c.encode_utf8(&mut utf8));
    }

    pub fn push_str(&mut self, s: &str) -> VxResult<()> {
        let start = self.len();
        let end = start + s.len();
        let Some(by) = L::from_usize(s.len()) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        self.buf.grow(by)?;
        let text = self.buf.units_mut(start..end + 1);
        text[..s.len()].copy_from_slice(s.as_bytes());
        text[s.len()] = 0;
        return Ok(());
    }

    /// Appends formatted text, growing by exactly its length.
    /// See [`vx_str_append!`](crate::vx_str_append).
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> VxResult<()> {
        let len = formatted_len(args)?;
        let Some(by) = L::from_usize(len) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        let start = self.len();
        self.buf.grow(by)?;
        self.buf.units_mut(start + len..start + len + 1)[0] = 0;
        return self.fill(start, len, args);
    }

    /// Inserts formatted text so it starts at byte `index`; whatever was at
    /// `index` follows right after it. See [`vx_str_emplace!`](crate::vx_str_emplace).
    pub fn emplace_fmt(&mut self, index: usize, args: fmt::Arguments<'_>) -> VxResult<()> {
        if index > self.len() {
            return Err(VxErr::new(ErrorReason::OutOfBounds));
        }
        let len = formatted_len(args)?;
        let (Some(at), Ok(delta)) = (L::from_usize(index), isize::try_from(len)) else {
            return Err(VxErr::new(ErrorReason::CapacityOverflow));
        };
        self.buf.shift(at, delta)?;
        return self.fill(index, len, args);
    }

    /// Formats into the `len` byte gap at `at`. If the text comes out a
    /// different length than measured, the gap is closed again.
    fn fill(&mut self, at: usize, len: usize, args: fmt::Arguments<'_>) -> VxResult<()> {
        let err = match format_into(self.buf.units_mut(at..at + len), args) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        // The gap was already made, so both conversions fit.
        if let (Some(end), Ok(delta)) = (L::from_usize(at + len), isize::try_from(len)) {
            self.buf.shift(end, -delta)?;
        }
        return Err(err);
    }
}

impl<A: AltAllocator, L: LengthType> Write for VxStr<A, L>
where
    usize: TryFrom<L>,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        return self.push_str(s).map_err(|_| fmt::Error);
    }
}

impl<A: AltAllocator, L: LengthType> fmt::Display for VxStr<A, L>
where
    usize: TryFrom<L>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        return Ok(());
    }
}

impl<A: AltAllocator, L: LengthType> fmt::Debug for VxStr<A, L>
where
    usize: TryFrom<L>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "\"{}\"", self.as_bytes().escape_ascii());
    }
}

impl<A: AltAllocator, L: LengthType> PartialEq<str> for VxStr<A, L>
where
    usize: TryFrom<L>,
{
    fn eq(&self, other: &str) -> bool {
        return self.as_bytes() == other.as_bytes();
    }
}

impl<A: AltAllocator, L: LengthType> PartialEq<&str> for VxStr<A, L>
where
    usize: TryFrom<L>,
{
    fn eq(&self, other: &&str) -> bool {
        return self.as_bytes() == other.as_bytes();
    }
}
