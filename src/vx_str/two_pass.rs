//! Formatting without a scratch buffer: one pass measures, the second writes
//! straight into the vector.

use core::fmt;
use core::fmt::Write;

use crate::types::ErrorReason;
use crate::types::VxErr;
use crate::types::VxResult;

struct Measure(usize);

impl Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.checked_add(s.len()).ok_or(fmt::Error)?;
        return Ok(());
    }
}

struct Fill<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Write for Fill<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos.checked_add(s.len()).ok_or(fmt::Error)?;
        let Some(dst) = self.buf.get_mut(self.pos..end) else {
            return Err(fmt::Error);
        };
        dst.copy_from_slice(s.as_bytes());
        self.pos = end;
        return Ok(());
    }
}

/// Number of bytes `args` formats to.
pub(crate) fn formatted_len(args: fmt::Arguments<'_>) -> VxResult<usize> {
    if let Some(s) = args.as_str() {
        return Ok(s.len());
    }
    let mut measure = Measure(0);
    if fmt::write(&mut measure, args).is_err() {
        return Err(VxErr::new(ErrorReason::FormatFailure));
    }
    return Ok(measure.0);
}

/// Formats `args` into `buf`, which must end up exactly full.
pub(crate) fn format_into(buf: &mut [u8], args: fmt::Arguments<'_>) -> VxResult<()> {
    let mut fill = Fill { buf: buf, pos: 0 };
    if fmt::write(&mut fill, args).is_err() || fill.pos != fill.buf.len() {
        return Err(VxErr::new(ErrorReason::FormatFailure));
    }
    return Ok(());
}
