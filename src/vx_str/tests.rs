use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::fmt::Write;
use core::ptr::NonNull;
use std::string::String;
use std::string::ToString;

use proptest::prelude::*;

use super::VxStr;
use crate::types::AllocError;
use crate::types::AltAllocator;
use crate::types::ErrorReason;
use crate::types::Global;

/// Hands out `limit` allocations from `Global`, then refuses.
struct AllocCount(u8, Cell<u8>);

impl AllocCount {
    const fn new(limit: u8) -> Self {
        return Self(limit, Cell::new(0));
    }
}

unsafe impl AltAllocator for AllocCount {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let cur = self.1.get();
        if cur >= self.0 {
            return Err(AllocError);
        };
        self.1.set(cur + 1);
        return Global.allocate(layout);
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { Global.deallocate(ptr, layout) };
    }
}

/// Writes a different amount of text every time it is formatted.
struct Unsteady(Cell<usize>);

impl fmt::Display for Unsteady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0.get();
        self.0.set(n + 1);
        for _ in 0..n {
            f.write_char('x')?;
        }
        return Ok(());
    }
}

fn assert_terminated<A: AltAllocator>(s: &VxStr<A>) {
    let bytes = s.as_bytes_with_nul();
    assert_eq!(bytes.len(), s.len() + 1);
    assert_eq!(bytes.last(), Some(&0));
}

#[test]
fn create_formatted() {
    let s = crate::vx_str!("{}-{}", 1, 2).unwrap();
    assert_eq!(s.len(), 3);
    assert_eq!(s, "1-2");
    assert_eq!(s.as_vx().len(), 4);
    assert_eq!(s.capacity(), 4);
    assert_eq!(s.as_bytes_with_nul(), b"1-2\0");
    assert_eq!(s.as_c_str(), c"1-2");
    assert_eq!(s.to_str(), Ok("1-2"));
}

#[test]
fn create_empty() {
    let s = VxStr::new().unwrap();
    assert!(s.is_empty());
    assert_eq!(s.as_bytes_with_nul(), b"\0");

    let s = crate::vx_str!("").unwrap();
    assert!(s.is_empty());
    assert_terminated(&s);
}

#[test]
fn create_fail() {
    let ret = VxStr::<AllocCount>::from_fmt_in(AllocCount::new(0), format_args!("{}", 10));
    assert_eq!(ret.err().map(|e| e.reason()), Some(ErrorReason::AllocFailure));

    let ret = VxStr::from_fmt(format_args!("{}", Unsteady(Cell::new(2))));
    assert_eq!(ret.err().map(|e| e.reason()), Some(ErrorReason::FormatFailure));
}

#[test]
fn narrow_length_type() {
    let long = "y".repeat(300);
    let ret = VxStr::<Global, u8>::from_fmt_in(Global, format_args!("{long}"));
    assert_eq!(ret.err().map(|e| e.reason()), Some(ErrorReason::CapacityOverflow));

    let mut s = VxStr::<Global, u8>::from_fmt_in(Global, format_args!("{}", &long[..254])).unwrap();
    assert_eq!(s.as_vx().len(), 255);
    let ret = s.push_byte(b'z');
    assert_eq!(ret.map_err(|e| e.reason()), Err(ErrorReason::CapacityOverflow));
    assert_eq!(s.len(), 254);
}

#[test]
fn push_bytes_and_chars() {
    let mut s = VxStr::new().unwrap();
    s.push_byte(b'a').unwrap();
    s.push_byte(b'b').unwrap();
    assert_eq!(s, "ab");
    assert_eq!(s.as_vx().len(), 3);
    assert_eq!(s.capacity(), 3);
    assert_terminated(&s);

    s.push('é').unwrap();
    s.push_str("!?").unwrap();
    assert_eq!(s, "abé!?");
    assert_eq!(s.len(), 6);
    assert_terminated(&s);
}

#[test]
fn append_formatted() {
    let mut s = crate::vx_str!("x={}", 4).unwrap();
    crate::vx_str_append!(s, ", y={:>3}", 5).unwrap();
    assert_eq!(s, "x=4, y=  5");
    assert_eq!(s.capacity(), 11);
    assert_terminated(&s);

    crate::vx_str_append!(s, "").unwrap();
    assert_eq!(s.len(), 10);
    assert_terminated(&s);
}

#[test]
fn append_fail_keeps_text() {
    let mut s = VxStr::<AllocCount>::from_fmt_in(AllocCount::new(1), format_args!("abc")).unwrap();
    let ret = s.append_fmt(format_args!("{}", 123));
    assert_eq!(ret.map_err(|e| e.reason()), Err(ErrorReason::AllocFailure));
    assert_eq!(s, "abc");
    assert_terminated(&s);

    let mut s = crate::vx_str!("abc").unwrap();
    let ret = crate::vx_str_append!(s, "{}", Unsteady(Cell::new(3)));
    assert_eq!(ret.map_err(|e| e.reason()), Err(ErrorReason::FormatFailure));
    assert_eq!(s, "abc");
    assert_terminated(&s);
}

#[test]
fn emplace_formatted() {
    let mut s = crate::vx_str!("hello world").unwrap();
    crate::vx_str_emplace!(s, 5, ",{}", " big").unwrap();
    assert_eq!(s, "hello, big world");
    assert_terminated(&s);

    crate::vx_str_emplace!(s, 0, ">").unwrap();
    let end = s.len();
    crate::vx_str_emplace!(s, end, "{}", '<').unwrap();
    assert_eq!(s, ">hello, big world<");
    assert_eq!(s.as_vx().len(), 19);
    assert_terminated(&s);
}

#[test]
fn writes_mark_only_touched_bytes() {
    let mut s = VxStr::new().unwrap();
    assert!(!s.as_vx().is_occupied(0));

    crate::vx_str_emplace!(s, 0, "ab").unwrap();
    assert_eq!(s, "ab");
    assert!(s.as_vx().is_occupied(0));
    assert!(s.as_vx().is_occupied(1));
    assert!(!s.as_vx().is_occupied(2));

    s.reserve(16).unwrap();
    s.push_byte(b'c').unwrap();
    assert!(s.as_vx().is_occupied(2));
    assert!(s.as_vx().is_occupied(3));
    assert_eq!(s.capacity(), 16);
    assert_terminated(&s);
}

#[test]
fn emplace_bounds_and_failures() {
    let mut s = crate::vx_str!("abc").unwrap();
    let ret = crate::vx_str_emplace!(s, 4, "x");
    assert_eq!(ret.map_err(|e| e.reason()), Err(ErrorReason::OutOfBounds));
    assert_eq!(s, "abc");

    let ret = crate::vx_str_emplace!(s, 1, "{}", Unsteady(Cell::new(2)));
    assert_eq!(ret.map_err(|e| e.reason()), Err(ErrorReason::FormatFailure));
    assert_eq!(s, "abc");
    assert_eq!(s.as_vx().len(), 4);
    assert_terminated(&s);
}

#[test]
fn write_macro_and_display() {
    let mut s = VxStr::new().unwrap();
    write!(s, "{}+{}={}", 2, 2, 4).unwrap();
    assert_eq!(s, "2+2=4");
    assert_eq!(s.to_string(), "2+2=4");
    assert_eq!(std::format!("{:?}", s), "\"2+2=4\"");

    s.push_byte(0xff).unwrap();
    assert!(s.to_str().is_err());
    assert_eq!(s.to_string(), "2+2=4\u{fffd}");
}

#[test]
fn interior_nul_truncates_c_str() {
    let mut s = crate::vx_str!("ab").unwrap();
    s.push_byte(0).unwrap();
    s.push_byte(b'c').unwrap();
    assert_eq!(s.len(), 4);
    assert_eq!(s.as_c_str(), c"ab");
}

#[test]
fn reserve_and_shrink() {
    let mut s = crate::vx_str!("abc").unwrap();
    s.reserve(32).unwrap();
    assert_eq!(s.capacity(), 32);
    s.push_str("def").unwrap();
    assert_eq!(s.capacity(), 32);

    let ret = s.reserve(3);
    assert_eq!(ret.map_err(|e| e.reason()), Err(ErrorReason::ShrinkBelowCount));

    s.shrink().unwrap();
    assert_eq!(s.capacity(), 7);
    assert_eq!(s, "abcdef");
}

#[test]
fn free_nulls_handle() {
    let mut handle = Some(crate::vx_str!("gone").unwrap());
    VxStr::free(&mut handle);
    assert!(handle.is_none());
    VxStr::free(&mut handle);
    assert!(handle.is_none());
}

proptest! {
    #[test]
    fn appends_stay_terminated(parts in proptest::collection::vec(".{0,12}", 0..8)) {
        let mut s = VxStr::new().unwrap();
        let mut expected = String::new();
        for part in &parts {
            let before = s.len();
            crate::vx_str_append!(s, "{}", part).unwrap();
            expected.push_str(part);
            prop_assert_eq!(s.len(), before + part.len());
            prop_assert_eq!(s.as_bytes_with_nul().last(), Some(&0));
        }
        prop_assert_eq!(s.to_str(), Ok(expected.as_str()));
    }

    #[test]
    fn emplace_matches_string_insert(
        base in "[a-z]{0,16}",
        text in "[A-Z]{0,8}",
        index in any::<proptest::sample::Index>(),
    ) {
        let at = index.index(base.len() + 1);
        let mut s = crate::vx_str!("{}", base).unwrap();
        crate::vx_str_emplace!(s, at, "{}", text).unwrap();

        let mut expected = base.clone();
        expected.insert_str(at, &text);
        prop_assert_eq!(s.to_str(), Ok(expected.as_str()));
        prop_assert_eq!(s.as_vx().len(), expected.len() + 1);
        prop_assert_eq!(s.as_bytes_with_nul().last(), Some(&0));
    }
}
