//! Selector evaluation: walks the unparsed document guided by the step
//! chain, splicing matched fragments into the output.
//!
//! The recursion carries an explicit `inside` flag: true means the call
//! is already producing content for an enclosing aggregation, so the
//! handler emits raw comma-joined fragments and leaves the single
//! surrounding `[` `]` to the top aggregation layer. This is also what
//! flattens nested aggregations like `$[:]['a','b']`.

pub(crate) mod filter;

use crate::error::{SliceError, SliceErrorKind};
use crate::path::node::{PathFn, Select, Slice, Step, Token};
use crate::scan;
use std::borrow::Cow;

fn empty<'a>() -> Cow<'a, [u8]> {
    Cow::Borrowed(&[])
}

/// Evaluate a compiled chain against the document. The bare-root path
/// is handled by the caller; `step` is the first real selector.
pub(crate) fn evaluate<'a>(doc: &'a [u8], step: &Step) -> Result<Cow<'a, [u8]>, SliceError> {
    let start = scan::skip_spaces(doc, 0)?;
    if !matches!(step.sel, Select::Function(_)) && doc[start] != b'{' && doc[start] != b'[' {
        return Err(SliceError::new(SliceErrorKind::ObjectOrArrayExpected, start));
    }
    eval_step(&doc[start..], step, false)
}

/// Pre-resolve `$`-rooted operands in filter programs against the
/// document, so the per-element walk never re-scans from the root.
pub(crate) fn resolve_root_refs(step: &mut Step, doc: &[u8]) -> Result<(), SliceError> {
    if let Select::Filter(tokens) = &mut step.sel {
        for t in tokens.iter_mut() {
            resolve_token(t, doc)?;
        }
    }
    if let Some(next) = step.next.as_deref_mut() {
        resolve_root_refs(next, doc)?;
    }
    Ok(())
}

fn resolve_token(t: &mut Token, doc: &[u8]) -> Result<(), SliceError> {
    match t {
        Token::Root(chain) => {
            let bytes: Cow<'_, [u8]> = match chain.as_deref_mut() {
                None => Cow::Borrowed(doc),
                Some(sub) => {
                    resolve_root_refs(sub, doc)?;
                    eval_step(doc, sub, false)?
                }
            };
            *t = match filter::operand_from_bytes(&bytes) {
                filter::Value::Num(n) => Token::Num(n),
                filter::Value::Str(s) => Token::Str(s),
                filter::Value::Bool(b) => Token::Bool(b),
                filter::Value::Null | filter::Value::Re(_) => Token::Null,
            };
        }
        Token::Current(Some(chain)) => resolve_root_refs(chain, doc)?,
        _ => {}
    }
    Ok(())
}

/// One step of the walk. Dispatches on the first non-space byte of the
/// current value; a step applied to a scalar is a soft miss, which is
/// what lets deep scans bottom out at leaves quietly.
pub(crate) fn eval_step<'a>(
    doc: &'a [u8],
    step: &Step,
    inside: bool,
) -> Result<Cow<'a, [u8]>, SliceError> {
    if let Select::Function(f) = &step.sel {
        return apply_function(doc, *f);
    }
    let Ok(start) = scan::skip_spaces(doc, 0) else {
        return Ok(empty());
    };
    match doc[start] {
        b'{' => eval_object(&doc[start..], step, inside),
        b'[' => eval_array(&doc[start..], step, inside),
        _ => Ok(empty()),
    }
}

fn eval_next<'a>(val: &'a [u8], step: &Step, inside: bool) -> Result<Cow<'a, [u8]>, SliceError> {
    match step.next() {
        Some(next) => eval_step(val, next, inside),
        None => Ok(Cow::Borrowed(val)),
    }
}

/// Append a fragment, comma-separating when something precedes it.
fn plus(acc: &mut Vec<u8>, frag: &[u8]) {
    if frag.is_empty() {
        return;
    }
    if !acc.is_empty() {
        acc.push(b',');
    }
    acc.extend_from_slice(frag);
}

/// Close out an aggregation: raw joined fragments when feeding an
/// enclosing aggregation, one bracket pair at the top layer.
fn finish_agg<'a>(acc: Vec<u8>, inside: bool) -> Cow<'a, [u8]> {
    if inside {
        return Cow::Owned(acc);
    }
    let mut out = Vec::with_capacity(acc.len() + 2);
    out.push(b'[');
    out.extend_from_slice(&acc);
    out.push(b']');
    Cow::Owned(out)
}

fn eval_object<'a>(
    doc: &'a [u8],
    step: &Step,
    inside: bool,
) -> Result<Cow<'a, [u8]>, SliceError> {
    let agg = step.is_agg();
    let mut acc: Vec<u8> = Vec::new();
    // decimal spellings of explicit elements, which double as member names
    let elem_names: Vec<String> = match &step.sel {
        Select::Member { elems, .. } => elems.iter().map(|e| e.to_string()).collect(),
        _ => Vec::new(),
    };
    let mut pos = 1usize;
    loop {
        pos = scan::skip_spaces(doc, pos)?;
        if doc[pos] == b'}' {
            break;
        }
        if doc[pos] != b'"' && doc[pos] != b'\'' {
            return Err(SliceError::new(SliceErrorKind::UnrecognizedLiteral, pos));
        }
        let key_start = pos + 1;
        let after_key = scan::skip_string(doc, pos)?;
        let key = &doc[key_start..after_key - 1];
        let val_start = scan::seek_to_value(doc, after_key)?;
        let val_end = scan::skip_value(doc, val_start)?;
        let val = &doc[val_start..val_end];
        pos = val_end;

        let hit = match &step.sel {
            Select::Wildcard => true,
            Select::Member { keys, .. } => {
                keys.iter().any(|k| k.as_slice() == key)
                    || elem_names.iter().any(|n| n.as_bytes() == key)
            }
            _ => false,
        };
        if hit {
            if agg {
                let frag = eval_next(val, step, true)?;
                plus(&mut acc, &frag);
            } else {
                let frag = eval_next(val, step, inside)?;
                if !frag.is_empty() {
                    return Ok(frag);
                }
            }
        }
        if step.deep && matches!(val.first(), Some(&(b'{' | b'['))) {
            let frag = eval_step(val, step, true)?;
            plus(&mut acc, &frag);
        }
    }
    if !agg {
        return Ok(empty());
    }
    Ok(finish_agg(acc, inside))
}

fn eval_array<'a>(doc: &'a [u8], step: &Step, inside: bool) -> Result<Cow<'a, [u8]>, SliceError> {
    // single non-negative index: stop scanning at the target element
    if let Select::Member { keys, elems } = &step.sel {
        if !step.deep && keys.is_empty() && elems.len() == 1 && elems[0] >= 0 {
            return eval_array_index(doc, step, elems[0] as usize, inside);
        }
    }
    eval_array_scan(doc, step, inside)
}

fn eval_array_index<'a>(
    doc: &'a [u8],
    step: &Step,
    target: usize,
    inside: bool,
) -> Result<Cow<'a, [u8]>, SliceError> {
    let mut pos = 1usize;
    let mut idx = 0usize;
    loop {
        pos = scan::skip_spaces(doc, pos)?;
        if doc[pos] == b']' {
            return Ok(empty());
        }
        let end = scan::skip_value(doc, pos)?;
        if idx == target {
            return eval_next(&doc[pos..end], step, inside);
        }
        idx += 1;
        pos = end;
    }
}

/// The general array walk: collects every element's bounds, then emits
/// matches in the order the selector calls for.
fn eval_array_scan<'a>(
    doc: &'a [u8],
    step: &Step,
    inside: bool,
) -> Result<Cow<'a, [u8]>, SliceError> {
    let mut bounds: Vec<(usize, usize)> = Vec::new();
    let mut pos = 1usize;
    loop {
        pos = scan::skip_spaces(doc, pos)?;
        if doc[pos] == b']' {
            break;
        }
        let end = scan::skip_value(doc, pos)?;
        bounds.push((pos, end));
        pos = end;
    }
    let n = bounds.len() as i64;
    let agg = step.is_agg();
    let mut acc: Vec<u8> = Vec::new();

    if step.deep {
        // pre-order per element: the match at this level first, then the
        // descent into the same element
        let level = matched_at_level(step, n);
        for (i, &(s, e)) in bounds.iter().enumerate() {
            let val = &doc[s..e];
            let hit = match &step.sel {
                Select::Filter(tokens) => filter::eval(val, tokens)?,
                _ => level[i],
            };
            if hit {
                let frag = eval_next(val, step, true)?;
                plus(&mut acc, &frag);
            }
            if matches!(val.first(), Some(&(b'{' | b'['))) {
                let frag = eval_step(val, step, true)?;
                plus(&mut acc, &frag);
            }
        }
        return Ok(finish_agg(acc, inside));
    }

    match &step.sel {
        Select::Member { elems, .. } => {
            if elems.is_empty() {
                // keys never index an array
                return Ok(if agg { finish_agg(acc, inside) } else { empty() });
            }
            if elems.len() == 1 {
                return match resolve_idx(elems[0], n) {
                    Some(i) => {
                        let (s, e) = bounds[i];
                        eval_next(&doc[s..e], step, inside)
                    }
                    None => Ok(empty()),
                };
            }
            for &e in elems {
                if let Some(i) = resolve_idx(e, n) {
                    let (s, en) = bounds[i];
                    let frag = eval_next(&doc[s..en], step, true)?;
                    plus(&mut acc, &frag);
                }
            }
            Ok(finish_agg(acc, inside))
        }
        Select::Wildcard => {
            for &(s, e) in &bounds {
                let frag = eval_next(&doc[s..e], step, true)?;
                plus(&mut acc, &frag);
            }
            Ok(finish_agg(acc, inside))
        }
        Select::Slice(sl) => eval_slice(doc, step, *sl, &bounds, inside),
        Select::Filter(tokens) => {
            for &(s, e) in &bounds {
                let val = &doc[s..e];
                if filter::eval(val, tokens)? {
                    let frag = eval_next(val, step, true)?;
                    plus(&mut acc, &frag);
                }
            }
            Ok(finish_agg(acc, inside))
        }
        Select::Function(_) => Ok(empty()),
    }
}

/// Which positions a deep step also matches directly at this level.
fn matched_at_level(step: &Step, n: i64) -> Vec<bool> {
    let mut m = vec![false; n as usize];
    match &step.sel {
        Select::Member { elems, .. } => {
            for &e in elems {
                if let Some(i) = resolve_idx(e, n) {
                    m[i] = true;
                }
            }
        }
        Select::Wildcard => m.iter_mut().for_each(|x| *x = true),
        Select::Slice(sl) => {
            let (start, end, stp) = normalize_slice(*sl, n);
            let mut i = start;
            while (stp > 0 && i < end) || (stp < 0 && i > end) {
                m[i as usize] = true;
                i += stp;
            }
        }
        _ => {}
    }
    m
}

fn resolve_idx(e: i64, n: i64) -> Option<usize> {
    let i = if e < 0 { n + e } else { e };
    (0..n).contains(&i).then_some(i as usize)
}

fn eval_slice<'a>(
    doc: &'a [u8],
    step: &Step,
    sl: Slice,
    bounds: &[(usize, usize)],
    inside: bool,
) -> Result<Cow<'a, [u8]>, SliceError> {
    let n = bounds.len() as i64;
    let (start, end, stp) = normalize_slice(sl, n);

    // contiguous forward slice with no successor: a single concatenation
    // of the untouched region
    let plain_bounds = sl.start.unwrap_or(0) >= 0 && sl.end.unwrap_or(0) >= 0;
    if stp == 1 && plain_bounds && step.next().is_none() {
        if start >= end {
            return Ok(finish_agg(Vec::new(), inside));
        }
        let region = &doc[bounds[start as usize].0..bounds[(end - 1) as usize].1];
        if inside {
            return Ok(Cow::Borrowed(region));
        }
        let mut out = Vec::with_capacity(region.len() + 2);
        out.push(b'[');
        out.extend_from_slice(region);
        out.push(b']');
        return Ok(Cow::Owned(out));
    }

    let mut acc: Vec<u8> = Vec::new();
    let mut i = start;
    while (stp > 0 && i < end) || (stp < 0 && i > end) {
        let (s, e) = bounds[i as usize];
        let frag = eval_next(&doc[s..e], step, true)?;
        plus(&mut acc, &frag);
        i += stp;
    }
    Ok(finish_agg(acc, inside))
}

/// Bound normalization against the element count `n`: omitted bounds
/// fall to the ends for the step direction, negative bounds count from
/// the end, and everything is clamped into range. The omitted end of a
/// negative-step slice is the exclusive sentinel -1.
fn normalize_slice(sl: Slice, n: i64) -> (i64, i64, i64) {
    let stp = match sl.step {
        None | Some(0) => 1,
        Some(s) => s,
    };
    let mut start = match sl.start {
        Some(s) if s < 0 => s + n,
        Some(s) => s,
        None if stp > 0 => 0,
        None => n - 1,
    };
    let mut end = match sl.end {
        Some(e) if e < 0 => e + n,
        Some(e) => e,
        None if stp > 0 => n,
        None => -1,
    };
    if stp > 0 {
        start = start.clamp(0, n);
        end = end.clamp(0, n);
    } else {
        start = start.clamp(-1, n - 1);
        end = end.clamp(-1, n - 1);
    }
    (start, end, stp)
}

/// `size()` is the raw byte length of the value. `length()`/`count()`
/// are the element count of an array or the character count of a string
/// (byte length without the quotes; escapes stay undecoded).
fn apply_function<'a>(doc: &'a [u8], f: PathFn) -> Result<Cow<'a, [u8]>, SliceError> {
    let t = scan::trim(doc);
    if t.is_empty() {
        return Err(SliceError::new(SliceErrorKind::UnexpectedEnd, 0));
    }
    let out = match (f, t[0]) {
        (PathFn::Size, _) => t.len(),
        (_, b'[') => count_elements(t)?,
        (_, b'"' | b'\'') => t.len().saturating_sub(2),
        _ => return Err(SliceError::new(SliceErrorKind::InvalidLength, 0)),
    };
    Ok(Cow::Owned(out.to_string().into_bytes()))
}

fn count_elements(arr: &[u8]) -> Result<usize, SliceError> {
    let mut pos = 1usize;
    let mut n = 0usize;
    loop {
        pos = scan::skip_spaces(arr, pos)?;
        if arr[pos] == b']' {
            return Ok(n);
        }
        pos = scan::skip_value(arr, pos)?;
        n += 1;
    }
}
