use crate::error::SliceErrorKind;
use crate::scan;

#[test]
fn spaces_and_commas_are_separators() {
    let buf = b" \t\r\n, ,x";
    assert_eq!(scan::skip_spaces(buf, 0).unwrap(), 7);
}

#[test]
fn spaces_error_at_end_of_buffer() {
    let e = scan::skip_spaces(b"   ", 0).unwrap_err();
    assert_eq!(e.kind, SliceErrorKind::UnexpectedEnd);
}

#[test]
fn string_skip_honors_escapes() {
    let buf = br#""a\"b" tail"#;
    assert_eq!(scan::skip_string(buf, 0).unwrap(), 6);
    // a backslash neutralizes the next byte even when that byte is a backslash
    let buf = br#""a\\" tail"#;
    assert_eq!(scan::skip_string(buf, 0).unwrap(), 5);
}

#[test]
fn string_skip_single_quotes() {
    let buf = b"'ab' rest";
    assert_eq!(scan::skip_string(buf, 0).unwrap(), 4);
}

#[test]
fn unterminated_string_is_an_error() {
    let e = scan::skip_string(br#""abc"#, 0).unwrap_err();
    assert_eq!(e.kind, SliceErrorKind::UnterminatedString);
}

#[test]
fn number_run() {
    assert_eq!(scan::skip_number(b"-1.5e+10,", 0), 8);
    assert_eq!(scan::skip_number(b"42]", 0), 2);
}

#[test]
fn literal_matching() {
    assert_eq!(scan::skip_literal(b"true,", 0).unwrap(), 4);
    assert_eq!(scan::skip_literal(b"false]", 0).unwrap(), 5);
    assert_eq!(scan::skip_literal(b"null}", 0).unwrap(), 4);
    let e = scan::skip_literal(b"nul}", 0).unwrap_err();
    assert_eq!(e.kind, SliceErrorKind::UnrecognizedLiteral);
}

#[test]
fn balanced_skip_is_nesting_aware() {
    let buf = br#"{"a":{"b":[1,2]}} tail"#;
    assert_eq!(scan::skip_balanced(buf, 0).unwrap(), 17);
}

#[test]
fn balanced_skip_ignores_brackets_inside_strings() {
    let buf = br#"[{"foo":"[]"}]"#;
    assert_eq!(scan::skip_balanced(buf, 0).unwrap(), buf.len());
    let buf = br#"{"a":"}"}"#;
    assert_eq!(scan::skip_balanced(buf, 0).unwrap(), buf.len());
}

#[test]
fn value_dispatch() {
    assert_eq!(scan::skip_value(b"\"x\",", 0).unwrap(), 3);
    assert_eq!(scan::skip_value(b"[1,2],", 0).unwrap(), 5);
    assert_eq!(scan::skip_value(b"12.5}", 0).unwrap(), 4);
    assert_eq!(scan::skip_value(b"null]", 0).unwrap(), 4);
    let e = scan::skip_value(b"#", 0).unwrap_err();
    assert_eq!(e.kind, SliceErrorKind::UnrecognizedLiteral);
}

#[test]
fn seek_to_value_requires_colon() {
    let buf = br#""key" : 42"#;
    assert_eq!(scan::seek_to_value(buf, 5).unwrap(), 8);
    let e = scan::seek_to_value(br#""key" 42"#, 5).unwrap_err();
    assert_eq!(e.kind, SliceErrorKind::ColonExpected);
}

#[test]
fn trim_strips_only_whitespace() {
    assert_eq!(scan::trim(b"  42 \n"), b"42");
    assert_eq!(scan::trim(b"   "), b"");
    assert_eq!(scan::trim(b",1,"), b",1,");
}
