//! Balanced-expression extraction from legacy seed text.
//!
//! Seed files carry assignments of the form `key = <literal>` where the
//! literal is a list or dictionary expression. Literals may span many
//! lines, may be wrapped in the engine's `Array[Dictionary](...)`
//! constructor, and may contain double-quoted strings with backslash
//! escapes. Bracket characters inside strings do not count toward
//! nesting.

use regex::Regex;

use crate::error::{MigrateError, Result};

/// Typed-array wrapper the engine emits around list literals.
const ARRAY_WRAPPER: &str = "Array[Dictionary](";

/// Finds the `key = <expr>` assignment and returns the exact span of the
/// bracketed literal that follows, or `None` when the assignment is
/// absent. Callers decide whether a missing key is fatal.
pub fn assignment_expr<'a>(text: &'a str, key: &str) -> Result<Option<&'a str>> {
    let pattern = format!(r"(?m)^\s*{}\s*=\s*", regex::escape(key));
    let locator = Regex::new(&pattern).expect("assignment locator compiles");
    let Some(found) = locator.find(text) else {
        return Ok(None);
    };

    let bytes = text.as_bytes();
    let mut i = found.end();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    if text[i..].starts_with(ARRAY_WRAPPER) {
        i += ARRAY_WRAPPER.len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
    }

    match bytes.get(i) {
        None => Ok(None),
        Some(b'[') => balanced_span(text, i, '[', ']').map(Some),
        Some(b'{') => balanced_span(text, i, '{', '}').map(Some),
        Some(_) => Err(MigrateError::UnsupportedExpr {
            key: key.to_string(),
            offset: i,
            found: text[i..].chars().take(40).collect(),
        }),
    }
}

/// Scans from the opening bracket at `start` to its matching closer and
/// returns the inclusive span. The contents of double-quoted strings are
/// opaque to the depth counter; a backslash escapes the next character.
pub fn balanced_span(text: &str, start: usize, open: char, close: char) -> Result<&str> {
    let mut depth: i64 = 0;
    let mut in_str = false;
    let mut escape = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_str {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_str = false;
            }
        } else if ch == '"' {
            in_str = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Ok(&text[start..start + offset + ch.len_utf8()]);
            }
        }
    }
    Err(MigrateError::UnclosedExpr { start })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_list() {
        let text = "id = \"Tile_B\"\nroad_segments = [[1, 2], [3]]\n";
        let expr = assignment_expr(text, "road_segments")
            .expect("extraction succeeds")
            .expect("key present");
        assert_eq!(expr, "[[1, 2], [3]]");
    }

    #[test]
    fn extracts_nested_dictionaries() {
        let text = "data = { \"a\": [1, { \"b\": [2, 3] }], \"c\": {} }\n";
        let expr = assignment_expr(text, "data").unwrap().unwrap();
        assert_eq!(expr, "{ \"a\": [1, { \"b\": [2, 3] }], \"c\": {} }");
    }

    #[test]
    fn brackets_inside_strings_are_opaque() {
        let text = r#"notes = [ "closing ] inside", "escaped \" and ] again" ]"#;
        let expr = assignment_expr(text, "notes").unwrap().unwrap();
        assert_eq!(
            expr,
            r#"[ "closing ] inside", "escaped \" and ] again" ]"#
        );
    }

    #[test]
    fn unwraps_typed_array_constructor() {
        let text = "employees = Array[Dictionary]([\n  { \"id\": \"cfo\" },\n])\n";
        let expr = assignment_expr(text, "employees").unwrap().unwrap();
        assert_eq!(expr, "[\n  { \"id\": \"cfo\" },\n]");
    }

    #[test]
    fn value_may_start_on_the_next_line() {
        let text = "milestones =\n[ { \"id\": \"m\" } ]\n";
        let expr = assignment_expr(text, "milestones").unwrap().unwrap();
        assert_eq!(expr, "[ { \"id\": \"m\" } ]");
    }

    #[test]
    fn assignment_must_start_a_line() {
        let text = "[header drink_sources=\"1\"]\ndrink_sources = [ { \"pos\": [0, 0] } ]\n";
        let expr = assignment_expr(text, "drink_sources").unwrap().unwrap();
        assert_eq!(expr, "[ { \"pos\": [0, 0] } ]");
    }

    #[test]
    fn absent_key_yields_none() {
        let text = "id = \"Tile_B\"\n";
        assert!(assignment_expr(text, "road_segments").unwrap().is_none());
    }

    #[test]
    fn missing_value_at_end_of_input_yields_none() {
        assert!(assignment_expr("road_segments = ", "road_segments")
            .unwrap()
            .is_none());
    }

    #[test]
    fn scalar_value_is_unsupported() {
        let text = "count = 3\n";
        let err = assignment_expr(text, "count").unwrap_err();
        assert!(matches!(err, MigrateError::UnsupportedExpr { .. }));
    }

    #[test]
    fn unclosed_literal_is_an_error() {
        let text = "grid = [ [1, 2\n";
        let err = assignment_expr(text, "grid").unwrap_err();
        assert!(matches!(err, MigrateError::UnclosedExpr { .. }));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let text = "grid = [ \"no end\n";
        let err = assignment_expr(text, "grid").unwrap_err();
        assert!(matches!(err, MigrateError::UnclosedExpr { .. }));
    }

    #[test]
    fn span_is_exactly_balanced() {
        let text = "grid = [[[]]] trailing = [1]\n";
        let expr = assignment_expr(text, "grid").unwrap().unwrap();
        assert_eq!(expr, "[[[]]]");
        assert!(expr.starts_with('['));
        assert!(expr.ends_with(']'));
    }
}
