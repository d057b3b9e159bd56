use super::*;

// Shared fixtures and helpers

/// The bookstore document used throughout the JSONPath test corpus.
pub(crate) const BOOKSTORE: &str = r#"{
  "store": {
    "book": [
      {
        "category": "reference",
        "author": "Nigel Rees",
        "title": "Sayings of the Century",
        "price": 8.95
      },
      {
        "category": "fiction",
        "author": "Evelyn Waugh",
        "title": "Sword of Honour",
        "price": 12.99
      },
      {
        "category": "fiction",
        "author": "Herman Melville",
        "title": "Moby Dick",
        "isbn": "0-553-21311-3",
        "price": 8.99
      },
      {
        "category": "fiction",
        "author": "J. R. R. Tolkien",
        "title": "The Lord of the Rings",
        "isbn": "0-395-19395-8",
        "price": 22.99
      }
    ],
    "bicycle": {
      "color": "red",
      "price": 19.95
    }
  },
  "expensive": 10
}"#;

fn q(doc: &str, path: &str) -> String {
    crate::get_string(doc, path).unwrap()
}

fn kind(doc: &str, path: &str) -> SliceErrorKind {
    crate::get(doc.as_bytes(), path).unwrap_err().kind
}

fn json(s: &str) -> serde_json::Value {
    serde_json::from_str(s).unwrap()
}

mod properties;
mod scanner;
