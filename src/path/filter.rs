//! Filter expression lexer and shunting-yard conversion to postfix.
//!
//! The token stream comes out in reverse-Polish order so the evaluator
//! is a single stack walk. Regex literals are only recognized directly
//! after `=~` or `!~`; a `/` anywhere else is division.

use super::node::{Op, Token};
use super::{parse_quoted, parse_steps, skip_ws};
use crate::error::{SliceError, SliceErrorKind};
use regex::Regex;

fn err<T>(kind: SliceErrorKind, pos: usize) -> Result<T, SliceError> {
    Err(SliceError::new(kind, pos))
}

enum StackOp {
    Paren,
    Op(Op),
}

/// Lex the body of `?( ... )` starting just inside the opening paren and
/// convert it to postfix. Consumes up to and including the matching `)`.
pub(crate) fn compile(buf: &[u8], pos: &mut usize) -> Result<Vec<Token>, SliceError> {
    let mut out: Vec<Token> = Vec::new();
    let mut ops: Vec<StackOp> = Vec::new();
    let mut depth = 1usize;
    // whether the previous token completed an operand, which decides
    // between binary minus and a negative literal, and between division
    // and a regex literal
    let mut prev_operand = false;
    let mut last_op: Option<Op> = None;
    let mut p = *pos;

    loop {
        p = skip_ws(buf, p);
        if p >= buf.len() {
            return err(SliceErrorKind::UnexpectedEnd, p);
        }
        let b = buf[p];
        match b {
            b')' => {
                depth -= 1;
                if depth == 0 {
                    p += 1;
                    break;
                }
                loop {
                    match ops.pop() {
                        Some(StackOp::Op(op)) => out.push(Token::Op(op)),
                        Some(StackOp::Paren) => break,
                        None => return err(SliceErrorKind::BadChar(')'), p),
                    }
                }
                prev_operand = true;
                p += 1;
            }
            b'(' => {
                depth += 1;
                ops.push(StackOp::Paren);
                prev_operand = false;
                p += 1;
            }
            b'@' | b'$' => {
                p += 1;
                let chain = parse_steps(buf, &mut p, true)?;
                out.push(if b == b'@' { Token::Current(chain) } else { Token::Root(chain) });
                prev_operand = true;
                last_op = None;
            }
            b'\'' | b'"' => {
                out.push(Token::Str(parse_quoted(buf, &mut p)?));
                prev_operand = true;
                last_op = None;
            }
            b'/' if !prev_operand && matches!(last_op, Some(Op::Match | Op::NotMatch)) => {
                out.push(lex_regex(buf, &mut p)?);
                prev_operand = true;
                last_op = None;
            }
            b'0'..=b'9' | b'.' => {
                out.push(lex_number(buf, &mut p)?);
                prev_operand = true;
                last_op = None;
            }
            b'-' if !prev_operand => {
                out.push(lex_number(buf, &mut p)?);
                prev_operand = true;
                last_op = None;
            }
            b'a'..=b'z' | b'A'..=b'Z' => {
                out.push(lex_word(buf, &mut p)?);
                prev_operand = true;
                last_op = None;
            }
            _ => {
                let op = lex_operator(buf, &mut p)?;
                while let Some(StackOp::Op(top)) = ops.last() {
                    if top.precedence() >= op.precedence() {
                        out.push(Token::Op(*top));
                        ops.pop();
                    } else {
                        break;
                    }
                }
                ops.push(StackOp::Op(op));
                prev_operand = false;
                last_op = Some(op);
            }
        }
    }

    while let Some(top) = ops.pop() {
        match top {
            StackOp::Op(op) => out.push(Token::Op(op)),
            StackOp::Paren => return err(SliceErrorKind::BadChar('('), p),
        }
    }
    if out.is_empty() {
        return err(SliceErrorKind::EmptyFilter, p);
    }
    *pos = p;
    Ok(out)
}

fn lex_operator(buf: &[u8], pos: &mut usize) -> Result<Op, SliceError> {
    let p = *pos;
    let next = buf.get(p + 1).copied();
    let (op, len) = match buf[p] {
        b'&' => match next {
            Some(b'&') => (Op::And, 2),
            _ => return err(SliceErrorKind::UnknownOperator, p),
        },
        b'|' => match next {
            Some(b'|') => (Op::Or, 2),
            _ => return err(SliceErrorKind::UnknownOperator, p),
        },
        b'=' => match next {
            Some(b'=') => (Op::Eq, 2),
            Some(b'~') => (Op::Match, 2),
            _ => return err(SliceErrorKind::UnknownOperator, p),
        },
        b'!' => match next {
            Some(b'=') => (Op::Ne, 2),
            Some(b'~') => (Op::NotMatch, 2),
            _ => return err(SliceErrorKind::UnknownOperator, p),
        },
        b'>' => match next {
            Some(b'=') => (Op::Ge, 2),
            _ => (Op::Gt, 1),
        },
        b'<' => match next {
            Some(b'=') => (Op::Le, 2),
            _ => (Op::Lt, 1),
        },
        b'+' => (Op::Add, 1),
        b'-' => (Op::Sub, 1),
        b'*' => (Op::Mul, 1),
        b'/' => (Op::Div, 1),
        _ => return err(SliceErrorKind::UnknownToken, p),
    };
    *pos = p + len;
    Ok(op)
}

fn lex_number(buf: &[u8], pos: &mut usize) -> Result<Token, SliceError> {
    let start = *pos;
    let mut p = start;
    if buf[p] == b'-' {
        p += 1;
    }
    while p < buf.len() {
        match buf[p] {
            b'0'..=b'9' | b'.' | b'e' | b'E' => p += 1,
            b'+' | b'-' if matches!(buf[p - 1], b'e' | b'E') => p += 1,
            _ => break,
        }
    }
    let text = std::str::from_utf8(&buf[start..p])
        .map_err(|_| SliceError::new(SliceErrorKind::UnknownToken, start))?;
    let n: f64 = text
        .parse()
        .map_err(|_| SliceError::new(SliceErrorKind::UnknownToken, start))?;
    *pos = p;
    Ok(Token::Num(n))
}

fn lex_word(buf: &[u8], pos: &mut usize) -> Result<Token, SliceError> {
    let start = *pos;
    let mut p = start;
    while p < buf.len() && buf[p].is_ascii_alphabetic() {
        p += 1;
    }
    let tok = match &buf[start..p] {
        b"true" => Token::Bool(true),
        b"false" => Token::Bool(false),
        b"null" => Token::Null,
        w if w.starts_with(b"t") || w.starts_with(b"f") => {
            return err(SliceErrorKind::BadBool, start);
        }
        _ => return err(SliceErrorKind::UnknownToken, start),
    };
    *pos = p;
    Ok(tok)
}

/// `/body/flags` with flags drawn from `i m s U`, mapped onto the
/// engine's inline flag group.
fn lex_regex(buf: &[u8], pos: &mut usize) -> Result<Token, SliceError> {
    let start = *pos;
    let mut p = start + 1;
    let body_start = p;
    while p < buf.len() && buf[p] != b'/' {
        if buf[p] == b'\\' { p += 2 } else { p += 1 }
    }
    if p >= buf.len() {
        return err(SliceErrorKind::InvalidRegex, start);
    }
    let body = &buf[body_start..p];
    p += 1;
    let mut flags = String::new();
    while p < buf.len() && buf[p].is_ascii_alphabetic() {
        match buf[p] {
            b'i' | b'm' | b's' | b'U' => flags.push(buf[p] as char),
            _ => return err(SliceErrorKind::InvalidRegex, p),
        }
        p += 1;
    }
    let body = std::str::from_utf8(body)
        .map_err(|_| SliceError::new(SliceErrorKind::InvalidRegex, start))?;
    let pattern = if flags.is_empty() {
        body.to_string()
    } else {
        format!("(?{}){}", flags, body)
    };
    let re = Regex::new(&pattern).map_err(|_| SliceError::new(SliceErrorKind::InvalidRegex, start))?;
    *pos = p;
    Ok(Token::Re(re))
}
