//! Case transforms.
//!
//! A case transform turns free text into one identifier-casing convention (kebab-case, camelCase, …). Each transform
//! is paired with the separator its convention puts between words; the separator is what makes word boundaries
//! convention-aware in [`crate::regex_query`].
//!
//! Words are found the same way for every transform:
//!
//! - a lower-case letter or a digit followed by an upper-case letter starts a new word (`oneTwo`);
//! - an upper-case letter followed by an upper-case letter and a lower-case one starts a new word (`HTTPServer`);
//! - any run of characters that are not ASCII letters or digits separates words and is dropped.
//!
//! Conversions are ASCII-only; anything else is treated as a separator.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

/// Marker inserted between words before splitting.
const SPLIT: char = '\0';

static LOWER_UPPER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("lower/upper split regex"));
static UPPER_UPPER_LOWER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new("([A-Z])([A-Z][a-z])").expect("acronym split regex"));
static NON_ALNUM: LazyLock<Regex> =
  LazyLock::new(|| Regex::new("[^A-Za-z0-9]+").expect("separator regex"));

/// Case transform identifiers, in declaration order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CaseKind {
  Kebab,
  Camel,
  Pascal,
  Snake,
  Constant,
  Capital,
  Path,
}

impl CaseKind {
  pub const ALL: [CaseKind; 7] = [
    CaseKind::Kebab,
    CaseKind::Camel,
    CaseKind::Pascal,
    CaseKind::Snake,
    CaseKind::Constant,
    CaseKind::Capital,
    CaseKind::Path,
  ];

  pub fn transform(self) -> &'static CaseTransform {
    &CASE_TRANSFORMS[self as usize]
  }

  /// Stable key, used in messages and in the persisted state.
  pub fn id(self) -> &'static str {
    self.transform().id
  }

  pub fn from_id(id: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.id() == id)
  }
}

/// A case transform: a conversion function and the separator of its convention.
#[derive(Debug)]
pub struct CaseTransform {
  pub kind: CaseKind,
  pub id: &'static str,
  pub label: &'static str,

  /// Character put between words; empty for conventions relying on capitalization only.
  pub separator: &'static str,

  join: fn(&[&str]) -> String,
}

impl CaseTransform {
  /// Convert `text` to this convention.
  ///
  /// Returns an empty string if `text` has no ASCII letter nor digit.
  pub fn convert(&self, text: &str) -> String {
    let words = split_words(text);
    let words = words.split(SPLIT).filter(|w| !w.is_empty()).collect_vec();
    (self.join)(&words)
  }
}

/// Fixed table of case transforms, indexed by [`CaseKind`].
pub static CASE_TRANSFORMS: [CaseTransform; 7] = [
  CaseTransform {
    kind: CaseKind::Kebab,
    id: "kebabCase",
    label: "kebab-case",
    separator: "-",
    join: |words| words.iter().map(|w| w.to_ascii_lowercase()).join("-"),
  },
  CaseTransform {
    kind: CaseKind::Camel,
    id: "camelCase",
    label: "camelCase",
    separator: "",
    join: |words| {
      words
        .iter()
        .enumerate()
        .map(|(i, w)| {
          if i == 0 {
            w.to_ascii_lowercase()
          } else {
            pascal_word(w, i)
          }
        })
        .join("")
    },
  },
  CaseTransform {
    kind: CaseKind::Pascal,
    id: "pascalCase",
    label: "PascalCase",
    separator: "",
    join: |words| {
      words
        .iter()
        .enumerate()
        .map(|(i, w)| pascal_word(w, i))
        .join("")
    },
  },
  CaseTransform {
    kind: CaseKind::Snake,
    id: "snakeCase",
    label: "snake_case",
    separator: "_",
    join: |words| words.iter().map(|w| w.to_ascii_lowercase()).join("_"),
  },
  CaseTransform {
    kind: CaseKind::Constant,
    id: "upperSnakeCase",
    label: "UPPER_SNAKE_CASE",
    separator: "_",
    join: |words| words.iter().map(|w| w.to_ascii_uppercase()).join("_"),
  },
  CaseTransform {
    kind: CaseKind::Capital,
    id: "capitalCase",
    label: "Capital Case",
    separator: " ",
    join: |words| words.iter().map(|w| capitalize(w)).join(" "),
  },
  CaseTransform {
    kind: CaseKind::Path,
    id: "pathCase",
    label: "path/case",
    separator: "/",
    join: |words| words.iter().map(|w| w.to_ascii_lowercase()).join("/"),
  },
];

/// Insert [`SPLIT`] at every word boundary of `text`.
fn split_words(text: &str) -> String {
  let split = format!("${{1}}{SPLIT}${{2}}");
  let text = LOWER_UPPER.replace_all(text, split.as_str());
  let text = UPPER_UPPER_LOWER.replace_all(&text, split.as_str());
  NON_ALNUM
    .replace_all(&text, SPLIT.to_string().as_str())
    .into_owned()
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => format!(
      "{}{}",
      first.to_ascii_uppercase(),
      chars.as_str().to_ascii_lowercase()
    ),
    None => String::new(),
  }
}

/// A digit-leading word that is not the first one is prefixed with `_`.
fn pascal_word(word: &str, index: usize) -> String {
  match word.chars().next() {
    Some(first) if index > 0 && first.is_ascii_digit() => {
      format!("_{first}{}", word[1..].to_ascii_lowercase())
    }
    _ => capitalize(word),
  }
}

#[cfg(test)]
mod tests {
  use super::CaseKind;

  fn convert(kind: CaseKind, text: &str) -> String {
    kind.transform().convert(text)
  }

  #[test]
  fn table_order() {
    for (i, kind) in CaseKind::ALL.into_iter().enumerate() {
      assert_eq!(kind as usize, i);
      assert_eq!(kind.transform().kind, kind);
      assert_eq!(CaseKind::from_id(kind.id()), Some(kind));
    }

    assert_eq!(CaseKind::from_id("screamingCase"), None);
  }

  #[test]
  fn every_case_from_mixed_separators() {
    let text = "one two_three-Four";

    assert_eq!(convert(CaseKind::Kebab, text), "one-two-three-four");
    assert_eq!(convert(CaseKind::Camel, text), "oneTwoThreeFour");
    assert_eq!(convert(CaseKind::Pascal, text), "OneTwoThreeFour");
    assert_eq!(convert(CaseKind::Snake, text), "one_two_three_four");
    assert_eq!(convert(CaseKind::Constant, text), "ONE_TWO_THREE_FOUR");
    assert_eq!(convert(CaseKind::Capital, text), "One Two Three Four");
    assert_eq!(convert(CaseKind::Path, text), "one/two/three/four");
  }

  #[test]
  fn every_case_from_camel() {
    let text = "oneTwoThreeFour";

    assert_eq!(convert(CaseKind::Kebab, text), "one-two-three-four");
    assert_eq!(convert(CaseKind::Camel, text), "oneTwoThreeFour");
    assert_eq!(convert(CaseKind::Pascal, text), "OneTwoThreeFour");
    assert_eq!(convert(CaseKind::Snake, text), "one_two_three_four");
    assert_eq!(convert(CaseKind::Constant, text), "ONE_TWO_THREE_FOUR");
    assert_eq!(convert(CaseKind::Capital, text), "One Two Three Four");
    assert_eq!(convert(CaseKind::Path, text), "one/two/three/four");
  }

  #[test]
  fn acronyms_and_digits() {
    assert_eq!(convert(CaseKind::Snake, "HTTPServer"), "http_server");
    assert_eq!(convert(CaseKind::Kebab, "version2Name"), "version2-name");
    assert_eq!(convert(CaseKind::Pascal, "a 1"), "A_1");
    assert_eq!(convert(CaseKind::Camel, "a 1b"), "a_1b");
  }

  #[test]
  fn punctuation_only() {
    for kind in CaseKind::ALL {
      assert_eq!(convert(kind, "*.,"), "");
      assert_eq!(convert(kind, ""), "");
    }
  }

  #[test]
  fn non_ascii_is_a_separator() {
    assert_eq!(convert(CaseKind::Kebab, "héllo wörld"), "h-llo-w-rld");
  }
}
