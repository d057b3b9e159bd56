//! Structure-skipping primitives over raw JSON bytes.
//!
//! Shared by the path compiler and the evaluator. Every primitive takes
//! the buffer plus an offset, advances past one syntactic element and
//! returns the new offset. None of them allocate.

use crate::error::{SliceError, SliceErrorKind};
use memchr::{memchr2, memchr3};

fn err<T>(kind: SliceErrorKind, pos: usize) -> Result<T, SliceError> {
    Err(SliceError::new(kind, pos))
}

/// Advance past whitespace and commas. Commas only ever separate members
/// and elements, so the walkers treat them as whitespace. Exhausting the
/// buffer here means a structure was left unclosed.
pub(crate) fn skip_spaces(buf: &[u8], mut pos: usize) -> Result<usize, SliceError> {
    while pos < buf.len() {
        match buf[pos] {
            b' ' | b'\t' | b'\r' | b'\n' | b',' => pos += 1,
            _ => return Ok(pos),
        }
    }
    err(SliceErrorKind::UnexpectedEnd, pos)
}

/// Advance past the quoted string starting at `pos` (either quote kind).
/// A backslash neutralizes the byte after it. Returns the offset just
/// past the closing quote.
pub(crate) fn skip_string(buf: &[u8], pos: usize) -> Result<usize, SliceError> {
    let quote = buf[pos];
    let mut i = pos + 1;
    while i < buf.len() {
        match memchr2(quote, b'\\', &buf[i..]) {
            Some(off) if buf[i + off] == b'\\' => i += off + 2,
            Some(off) => return Ok(i + off + 1),
            None => break,
        }
    }
    err(SliceErrorKind::UnterminatedString, buf.len())
}

/// Consume a number-shaped run. The scanner does not validate the
/// grammar; it only needs to find where the token ends.
pub(crate) fn skip_number(buf: &[u8], mut pos: usize) -> usize {
    while pos < buf.len() {
        match buf[pos] {
            b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E' => pos += 1,
            _ => break,
        }
    }
    pos
}

/// Match one of `true`, `false`, `null`.
pub(crate) fn skip_literal(buf: &[u8], pos: usize) -> Result<usize, SliceError> {
    for lit in [&b"true"[..], b"false", b"null"] {
        if buf[pos..].starts_with(lit) {
            return Ok(pos + lit.len());
        }
    }
    err(SliceErrorKind::UnrecognizedLiteral, pos)
}

/// Advance past the object or array starting at `pos`, nesting-aware and
/// string-aware. Jumps between structural bytes with memchr rather than
/// stepping byte-by-byte.
pub(crate) fn skip_balanced(buf: &[u8], pos: usize) -> Result<usize, SliceError> {
    let open = buf[pos];
    let close = if open == b'{' { b'}' } else { b']' };
    let mut depth = 0usize;
    let mut i = pos;
    while i < buf.len() {
        match memchr3(open, close, b'"', &buf[i..]) {
            Some(off) => {
                let at = i + off;
                if buf[at] == b'"' {
                    i = skip_string(buf, at)?;
                } else if buf[at] == open {
                    depth += 1;
                    i = at + 1;
                } else {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(at + 1);
                    }
                    i = at + 1;
                }
            }
            None => break,
        }
    }
    err(SliceErrorKind::UnexpectedEnd, buf.len())
}

/// Advance past whatever value starts at `pos`, dispatching on its first
/// byte. `pos` must already sit on a non-space byte.
pub(crate) fn skip_value(buf: &[u8], pos: usize) -> Result<usize, SliceError> {
    if pos >= buf.len() {
        return err(SliceErrorKind::UnexpectedEnd, pos);
    }
    match buf[pos] {
        b'"' | b'\'' => skip_string(buf, pos),
        b'{' | b'[' => skip_balanced(buf, pos),
        b'0'..=b'9' | b'-' | b'.' => Ok(skip_number(buf, pos)),
        b't' | b'f' | b'n' => skip_literal(buf, pos),
        _ => err(SliceErrorKind::UnrecognizedLiteral, pos),
    }
}

/// From just past a key's closing quote, advance over the `:` separator
/// to the first byte of the member's value.
pub(crate) fn seek_to_value(buf: &[u8], mut pos: usize) -> Result<usize, SliceError> {
    while pos < buf.len() && matches!(buf[pos], b' ' | b'\t' | b'\r' | b'\n') {
        pos += 1;
    }
    if pos >= buf.len() {
        return err(SliceErrorKind::UnexpectedEnd, pos);
    }
    if buf[pos] != b':' {
        return err(SliceErrorKind::ColonExpected, pos);
    }
    skip_spaces(buf, pos + 1)
}

/// Whitespace-trimmed view of a buffer. Used to classify a value by its
/// first byte without caring how it was framed.
pub(crate) fn trim(buf: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\t' | b'\r' | b'\n');
    let start = buf.iter().position(|b| !is_ws(b)).unwrap_or(buf.len());
    let end = buf.iter().rposition(|b| !is_ws(b)).map(|p| p + 1).unwrap_or(0);
    if start < end { &buf[start..end] } else { &[] }
}
