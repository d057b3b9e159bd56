use super::*;
use std::borrow::Cow;

#[test]
fn root_identity_is_byte_for_byte() {
    for doc in ["{}", "  [1, 2]\n", r#"{"a": "b"}  "#, "42", ""] {
        let out = crate::get(doc.as_bytes(), "$").unwrap();
        assert_eq!(out.as_ref(), doc.as_bytes());
        assert!(matches!(out, Cow::Borrowed(_)));
    }
}

#[test]
fn contiguous_results_borrow_from_the_input() {
    let doc = br#"{"a": [1, 2, 3]}"#;
    let out = crate::get(doc, "$.a").unwrap();
    assert!(matches!(out, Cow::Borrowed(_)));
    assert_eq!(out.as_ref(), b"[1, 2, 3]");
}

#[test]
fn fragments_carry_no_surrounding_whitespace() {
    let doc = br#"{  "a"  :  42  }"#;
    assert_eq!(crate::get(doc, "$.a").unwrap().as_ref(), b"42");
}

#[test]
fn aggregates_have_exactly_k_minus_one_top_level_commas() {
    let out = q("[1,2,3,4,5]", "$[*]");
    assert!(out.starts_with('[') && out.ends_with(']'));
    let commas = out.as_bytes().iter().filter(|&&b| b == b',').count();
    assert_eq!(commas, 4);
}

#[test]
fn tautological_filter_preserves_every_element() {
    let doc = r#"[{"a":1}, 2, "three", [4], null]"#;
    assert_eq!(json(&q(doc, "$[?(1==1)]")), json(doc));
}

#[test]
fn full_slice_wildcard_and_dot_star_agree_on_arrays() {
    let doc = "[1,2,3]";
    assert_eq!(q(doc, "$[:]"), "[1,2,3]");
    assert_eq!(q(doc, "$[*]"), "[1,2,3]");
    assert_eq!(q(doc, "$.*"), "[1,2,3]");

    let spaced = r#"[ {"a":1} , 2 ]"#;
    assert_eq!(json(&q(spaced, "$[:]")), json(&q(spaced, "$[*]")));
    assert_eq!(json(&q(spaced, "$[*]")), json(&q(spaced, "$.*")));
}

#[test]
fn negative_index_law() {
    let doc = "[10,20,30,40]";
    assert_eq!(q(doc, "$[-1]"), q(doc, "$[3]"));
    assert_eq!(q(doc, "$[-4]"), q(doc, "$[0]"));
}

#[test]
fn nested_aggregations_flatten() {
    let doc = r#"[{"a":1,"b":2},{"a":3,"b":4}]"#;
    assert_eq!(q(doc, "$[:]['a','b']"), "[1,2,3,4]");
    assert_eq!(q(doc, "$[*]['a','b']"), "[1,2,3,4]");
}

#[test]
fn malformed_inputs_error_instead_of_panicking() {
    let docs: &[&str] = &["", "{", "[", "{\"a\"", "[}", "{]", "nonsense", "\"", "[1,", "{:1}"];
    let paths: &[&str] = &[
        "$", "$.a", "$[0]", "$[*]", "$..a", "$[-1]", "$[0:2]", "$[?(@.a==1)]", "$.a.length()",
    ];
    for d in docs {
        for p in paths {
            // any outcome is fine as long as it is a clean Ok or Err
            let _ = crate::get(d.as_bytes(), p);
        }
    }
}

#[test]
fn garbage_paths_error_instead_of_panicking() {
    let paths: &[&str] = &[
        "", "$", "$$", "$[", "$]", "$..", "$...a", "$['", "$[?", "$[?(", "$[?()]", "$[1:2:3:4]",
        "$[--1]", "$[?(@=~/)]", "$[?(&&)]", "$.a(", "$.😀", "$[\u{7f}]",
    ];
    for p in paths {
        let _ = crate::get(br#"{"a":1}"#, p);
    }
}

#[test]
fn writer_output_matches_get() {
    let doc = BOOKSTORE.as_bytes();
    let path = "$.store.book[0].title";
    let mut sink = Vec::new();
    crate::get_to_writer(doc, path, &mut sink).unwrap();
    assert_eq!(sink, crate::get(doc, path).unwrap().as_ref());
}

#[test]
fn bookstore_corpus_round_trip() {
    // the classic queries, checked structurally
    assert_eq!(
        json(&q(BOOKSTORE, "$.store.book[*].author")),
        json(r#"["Nigel Rees","Evelyn Waugh","Herman Melville","J. R. R. Tolkien"]"#)
    );
    assert_eq!(
        json(&q(BOOKSTORE, "$..author")),
        json(r#"["Nigel Rees","Evelyn Waugh","Herman Melville","J. R. R. Tolkien"]"#)
    );
    assert_eq!(json(&q(BOOKSTORE, "$.store.bicycle.color")), json(r#""red""#));
}
