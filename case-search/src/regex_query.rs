//! Query compiler.
//!
//! Turn the free text, the selected case transforms and the word-boundary options into a single regular expression
//! handed to the search collaborator.
//!
//! Once a case transform is selected, word boundaries are expressed with lookarounds excluding the separator of that
//! transform, so that the end of a `kebab-case` word is not mistaken with the end of a `snake_case` one. Without any
//! transform, boundaries fall back to `\b`, or to the collaborator’s own whole-word matching when both edges are
//! requested.

use itertools::Itertools;

use crate::cases::CaseKind;

/// Word boundaries requested by the user.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WordBoundaries {
  pub begin: bool,
  pub end: bool,
}

impl WordBoundaries {
  pub fn new(begin: bool, end: bool) -> Self {
    Self { begin, end }
  }
}

/// Output of [`compile`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompiledQuery {
  pub pattern: String,

  /// Whether the search collaborator must apply its own whole-word matching.
  pub host_whole_word: bool,
}

/// Compile `query` into a pattern.
///
/// Alternatives are emitted in the order of `selected`, each distinct alternative only once.
pub fn compile(query: &str, selected: &[CaseKind], bounds: WordBoundaries) -> CompiledQuery {
  if selected.is_empty() {
    return compile_literal(query, bounds);
  }

  let pattern = selected
    .iter()
    .map(|kind| {
      let transform = kind.transform();
      let converted = transform.convert(query);
      let variant = if converted.is_empty() {
        query
      } else {
        converted.as_str()
      };

      decorate(variant, transform.separator, bounds)
    })
    .unique()
    .join("|");

  CompiledQuery {
    pattern,
    host_whole_word: false,
  }
}

fn compile_literal(query: &str, bounds: WordBoundaries) -> CompiledQuery {
  let (pattern, host_whole_word) = match (bounds.begin, bounds.end) {
    (true, true) => (query.to_owned(), true),
    (true, false) => (format!("\\b{query}"), false),
    (false, true) => (format!("{query}\\b"), false),
    (false, false) => (query.to_owned(), false),
  };

  CompiledQuery {
    pattern,
    host_whole_word,
  }
}

fn decorate(variant: &str, separator: &str, bounds: WordBoundaries) -> String {
  let class = word_class(separator);
  let mut decorated = String::with_capacity(variant.len() + 2 * (class.len() + 6));

  if bounds.begin {
    decorated.push_str("(?<!");
    decorated.push_str(&class);
    decorated.push(')');
  }

  decorated.push_str(variant);

  if bounds.end {
    decorated.push_str("(?!");
    decorated.push_str(&class);
    decorated.push(')');
  }

  decorated
}

/// Character class of everything that continues a word written with `separator`.
fn word_class(separator: &str) -> String {
  format!("[a-zA-Z0-9{}]", separator.replace('.', "\\."))
}

#[cfg(test)]
mod tests {
  use fancy_regex::Regex;

  use super::{compile, word_class, CompiledQuery, WordBoundaries};
  use crate::cases::CaseKind;

  fn matcher(compiled: &CompiledQuery) -> Regex {
    Regex::new(&format!("(?i){}", compiled.pattern)).unwrap()
  }

  #[test]
  fn alternation() {
    let compiled = compile(
      "one two_three-Four",
      &[CaseKind::Kebab, CaseKind::Camel],
      WordBoundaries::default(),
    );

    assert_eq!(
      compiled,
      CompiledQuery {
        pattern: "one-two-three-four|oneTwoThreeFour".to_owned(),
        host_whole_word: false
      }
    );
  }

  #[test]
  fn duplicates_removed() {
    let compiled = compile(
      "one two_three-Four",
      &[CaseKind::Pascal, CaseKind::Constant, CaseKind::Pascal],
      WordBoundaries::default(),
    );

    assert_eq!(compiled.pattern, "OneTwoThreeFour|ONE_TWO_THREE_FOUR");

    // same output for different transforms
    let compiled = compile(
      "word",
      &[CaseKind::Kebab, CaseKind::Snake, CaseKind::Camel],
      WordBoundaries::default(),
    );
    assert_eq!(compiled.pattern, "word");
  }

  #[test]
  fn same_variant_different_separator() {
    let compiled = compile(
      "word",
      &[CaseKind::Kebab, CaseKind::Snake],
      WordBoundaries::new(true, false),
    );

    assert_eq!(
      compiled.pattern,
      "(?<![a-zA-Z0-9-])word|(?<![a-zA-Z0-9_])word"
    );
  }

  #[test]
  fn deterministic() {
    let selected = CaseKind::ALL;
    let bounds = WordBoundaries::new(true, true);

    assert_eq!(
      compile("Hello World", &selected, bounds),
      compile("Hello World", &selected, bounds)
    );
  }

  #[test]
  fn literal_boundaries() {
    assert_eq!(
      compile("x", &[], WordBoundaries::new(true, true)),
      CompiledQuery {
        pattern: "x".to_owned(),
        host_whole_word: true
      }
    );
    assert_eq!(
      compile("x", &[], WordBoundaries::new(true, false)),
      CompiledQuery {
        pattern: "\\bx".to_owned(),
        host_whole_word: false
      }
    );
    assert_eq!(
      compile("x", &[], WordBoundaries::new(false, true)),
      CompiledQuery {
        pattern: "x\\b".to_owned(),
        host_whole_word: false
      }
    );
    assert_eq!(
      compile("x", &[], WordBoundaries::default()),
      CompiledQuery {
        pattern: "x".to_owned(),
        host_whole_word: false
      }
    );
  }

  #[test]
  fn punctuation_falls_back_to_query() {
    let compiled = compile(
      "*.",
      &[CaseKind::Kebab, CaseKind::Path],
      WordBoundaries::default(),
    );

    assert_eq!(compiled.pattern, "*.");
  }

  #[test]
  fn escaped_dot() {
    assert_eq!(word_class("."), "[a-zA-Z0-9\\.]");
    assert_eq!(word_class(""), "[a-zA-Z0-9]");
  }

  #[test]
  fn separator_aware_begin() {
    let compiled = compile(
      "First-Hello-Wo",
      &[CaseKind::Snake],
      WordBoundaries::new(true, false),
    );
    assert_eq!(compiled.pattern, "(?<![a-zA-Z0-9_])first_hello_wo");

    let re = matcher(&compiled);
    assert!(re.is_match("First_Hello_Wo").unwrap());
    assert!(re.is_match("let x = First_Hello_World;").unwrap());
    assert!(re.is_match("some-First_Hello_Wo").unwrap());
    assert!(!re.is_match("XFirst_Hello_Wo").unwrap());
    assert!(!re.is_match("_First_Hello_Wo").unwrap());
  }

  #[test]
  fn separator_aware_end() {
    let compiled = compile("hello world", &[CaseKind::Kebab], WordBoundaries::new(false, true));
    let re = matcher(&compiled);

    assert!(re.is_match("hello-world").unwrap());
    assert!(re.is_match("hello-world_suffix").unwrap());
    assert!(!re.is_match("hello-world-suffix").unwrap());
    assert!(!re.is_match("hello-worlds").unwrap());
  }

  #[test]
  fn capitalization_only_separator() {
    let compiled = compile(
      "hello world",
      &[CaseKind::Camel],
      WordBoundaries::new(true, true),
    );
    assert_eq!(
      compiled.pattern,
      "(?<![a-zA-Z0-9])helloWorld(?![a-zA-Z0-9])"
    );

    let re = Regex::new(&compiled.pattern).unwrap();
    assert!(re.is_match("let helloWorld = 3;").unwrap());
    assert!(re.is_match("my_helloWorld").unwrap());
    assert!(!re.is_match("myhelloWorld").unwrap());
  }
}
