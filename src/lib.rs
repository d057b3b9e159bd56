pub mod cli;
pub mod error;
mod eval;
mod path;
mod scan;

pub use error::{SliceError, SliceErrorKind};

use std::borrow::Cow;
use std::io::Write;

// ============================================================================
// Core API - slice out matching bytes
// ============================================================================

/// Evaluate a JSONPath expression against raw JSON bytes and return the
/// matching fragment(s).
///
/// The document is scanned, never parsed into a tree. A contiguous
/// result is returned as a borrowed subslice of `doc`; a set of
/// non-contiguous fragments is assembled into a synthetic JSON array. A
/// path that matches nothing yields empty bytes, not an error.
///
/// # Examples
///
/// ```
/// use jsonslice::get;
///
/// let doc = br#"{"expensive":10}"#;
/// let out = get(doc, "$.expensive")?;
/// assert_eq!(out.as_ref(), b"10");
/// # Ok::<(), jsonslice::SliceError>(())
/// ```
///
/// Aggregating steps produce an array:
///
/// ```
/// use jsonslice::get;
///
/// let doc = br#"[{"a":1},{"a":2}]"#;
/// let out = get(doc, "$[*].a")?;
/// assert_eq!(out.as_ref(), b"[1,2]");
/// # Ok::<(), jsonslice::SliceError>(())
/// ```
pub fn get<'a>(doc: &'a [u8], path: &str) -> Result<Cow<'a, [u8]>, SliceError> {
    match path::compile(path)? {
        // `$` alone returns the document untouched
        None => Ok(Cow::Borrowed(doc)),
        Some(mut head) => {
            eval::resolve_root_refs(&mut head, doc)?;
            eval::evaluate(doc, &head)
        }
    }
}

// ============================================================================
// Convenience wrappers
// ============================================================================

/// String-in, String-out wrapper around [`get`].
///
/// # Examples
///
/// ```
/// use jsonslice::get_string;
///
/// let doc = r#"{"a":{"b":"c"}}"#;
/// assert_eq!(get_string(doc, "$.a.b")?, r#""c""#);
/// # Ok::<(), jsonslice::SliceError>(())
/// ```
pub fn get_string(doc: &str, path: &str) -> Result<String, SliceError> {
    let out = get(doc.as_bytes(), path)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Evaluate and write the result into an `io::Write` sink. This avoids
/// an extra copy when the caller intends to stream to a file or socket.
///
/// # Examples
///
/// ```
/// use jsonslice::get_to_writer;
///
/// let mut out = Vec::new();
/// get_to_writer(br#"{"a":[1,2]}"#, "$.a", &mut out)?;
/// assert_eq!(out, b"[1,2]");
/// # Ok::<(), jsonslice::SliceError>(())
/// ```
pub fn get_to_writer<W: Write>(doc: &[u8], path: &str, writer: &mut W) -> Result<(), SliceError> {
    let out = get(doc, path)?;
    writer
        .write_all(&out)
        .map_err(|e| SliceError::new(SliceErrorKind::Io(e.to_string()), 0))
}

#[cfg(test)]
mod tests;
