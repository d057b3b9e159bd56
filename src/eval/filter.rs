//! Postfix filter evaluation: one stack walk per candidate element.

use crate::error::{SliceError, SliceErrorKind};
use crate::path::node::{Op, Step, Token};
use crate::scan;
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;

fn err<T>(kind: SliceErrorKind) -> Result<T, SliceError> {
    Err(SliceError::new(kind, 0))
}

/// A runtime operand on the filter stack.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    Num(f64),
    Str(Vec<u8>),
    Bool(bool),
    Null,
    Re(Regex),
}

/// Run a postfix program against one candidate element. The element's
/// bytes are the `@` context. The result is the truthiness of whatever
/// remains on top of the stack.
pub(crate) fn eval(elem: &[u8], tokens: &[Token]) -> Result<bool, SliceError> {
    let mut stack: Vec<Value> = Vec::with_capacity(4);
    for t in tokens {
        match t {
            Token::Num(n) => stack.push(Value::Num(*n)),
            Token::Str(s) => stack.push(Value::Str(s.clone())),
            Token::Bool(b) => stack.push(Value::Bool(*b)),
            Token::Null => stack.push(Value::Null),
            Token::Re(re) => stack.push(Value::Re(re.clone())),
            Token::Current(chain) => stack.push(resolve_chain(elem, chain.as_deref())?),
            // `$` operands are inlined before the walk starts; one that
            // survives resolution has nothing to refer to
            Token::Root(_) => stack.push(Value::Null),
            Token::Op(op) => {
                let r = match stack.pop() {
                    Some(v) => v,
                    None => return err(SliceErrorKind::NotEnoughArgs),
                };
                let l = match stack.pop() {
                    Some(v) => v,
                    None => return err(SliceErrorKind::NotEnoughArgs),
                };
                stack.push(apply(*op, l, r)?);
            }
        }
    }
    match stack.pop() {
        Some(v) => Ok(truthy(&v)),
        None => err(SliceErrorKind::NotEnoughArgs),
    }
}

/// Evaluate a sub-chain against the candidate and convert the matched
/// bytes to an operand. No match converts to null, which keeps the
/// field-presence idiom (`[?(@.isbn)]`) working.
fn resolve_chain(elem: &[u8], chain: Option<&Step>) -> Result<Value, SliceError> {
    let bytes: Cow<'_, [u8]> = match chain {
        None => Cow::Borrowed(elem),
        Some(step) => super::eval_step(elem, step, false)?,
    };
    Ok(operand_from_bytes(&bytes))
}

/// Conversion rule for matched bytes: strings drop their quotes with no
/// escape decoding, numbers parse as doubles, booleans and null map
/// over, and an object/array result becomes a string over its raw bytes.
pub(crate) fn operand_from_bytes(bytes: &[u8]) -> Value {
    let t = scan::trim(bytes);
    if t.is_empty() {
        return Value::Null;
    }
    match t[0] {
        b'"' | b'\'' if t.len() >= 2 && t[t.len() - 1] == t[0] => {
            Value::Str(t[1..t.len() - 1].to_vec())
        }
        b'{' | b'[' => Value::Str(t.to_vec()),
        b't' if t == b"true" => Value::Bool(true),
        b'f' if t == b"false" => Value::Bool(false),
        b'n' if t == b"null" => Value::Null,
        _ => match std::str::from_utf8(t).ok().and_then(|s| s.parse::<f64>().ok()) {
            Some(n) => Value::Num(n),
            None => Value::Str(t.to_vec()),
        },
    }
}

/// Non-null, non-false, non-zero, non-empty-string.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Num(n) => *n != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::Re(_) => true,
    }
}

fn apply(op: Op, l: Value, r: Value) -> Result<Value, SliceError> {
    match op {
        Op::And => Ok(Value::Bool(truthy(&l) && truthy(&r))),
        Op::Or => Ok(Value::Bool(truthy(&l) || truthy(&r))),
        Op::Add | Op::Sub | Op::Mul | Op::Div => match (l, r) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(match op {
                Op::Add => a + b,
                Op::Sub => a - b,
                Op::Mul => a * b,
                _ => a / b,
            })),
            _ => err(SliceErrorKind::InvalidArithmetic),
        },
        Op::Match | Op::NotMatch => match (l, r) {
            (Value::Str(s), Value::Re(re)) => {
                let hit = re.is_match(&String::from_utf8_lossy(&s));
                Ok(Value::Bool(if op == Op::Match { hit } else { !hit }))
            }
            _ => err(SliceErrorKind::OperandTypes),
        },
        Op::Eq | Op::Ne | Op::Gt | Op::Lt | Op::Ge | Op::Le => compare(op, l, r),
    }
}

fn compare(op: Op, l: Value, r: Value) -> Result<Value, SliceError> {
    // null takes part only in equality, and always compares unequal
    // without raising an error
    if matches!(l, Value::Null) || matches!(r, Value::Null) {
        return match op {
            Op::Eq | Op::Ne => Ok(Value::Bool(false)),
            _ => err(SliceErrorKind::OperandTypes),
        };
    }
    match (l, r) {
        (Value::Num(a), Value::Num(b)) => Ok(Value::Bool(ord_matches(op, a.partial_cmp(&b)))),
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(ord_matches(op, Some(a.cmp(&b))))),
        (Value::Str(a), Value::Str(b)) => match op {
            Op::Eq => Ok(Value::Bool(a == b)),
            Op::Ne => Ok(Value::Bool(a != b)),
            _ => err(SliceErrorKind::InvalidStringComparison),
        },
        _ => err(SliceErrorKind::OperandTypes),
    }
}

/// IEEE-754 style: an unordered pair satisfies only `!=`.
fn ord_matches(op: Op, ord: Option<Ordering>) -> bool {
    match (op, ord) {
        (Op::Eq, Some(Ordering::Equal)) => true,
        (Op::Ne, Some(o)) => o != Ordering::Equal,
        (Op::Ne, None) => true,
        (Op::Gt, Some(Ordering::Greater)) => true,
        (Op::Lt, Some(Ordering::Less)) => true,
        (Op::Ge, Some(Ordering::Greater | Ordering::Equal)) => true,
        (Op::Le, Some(Ordering::Less | Ordering::Equal)) => true,
        _ => false,
    }
}
