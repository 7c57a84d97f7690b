//! Rewrites engine-specific literal syntax into JSON-compatible text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Two-argument integer-vector constructor, e.g. `Vector2i(3, -1)`.
static RE_VECTOR2I: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Vector2i\(\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*\)")
        .expect("vector pattern compiles")
});

/// Makes an extracted legacy literal parseable as JSON: vector
/// constructors become two-element lists and trailing commas are
/// dropped. Total for well-formed legacy input; anything else surfaces
/// as the downstream JSON parse error.
pub fn to_json_text(expr: &str) -> String {
    strip_trailing_commas(&rewrite_vector2i(expr))
}

/// `Vector2i(a, b)` becomes `[a, b]`, keeping the argument spellings.
pub fn rewrite_vector2i(expr: &str) -> String {
    RE_VECTOR2I.replace_all(expr, "[$1, $2]").into_owned()
}

/// Removes a single comma directly preceding a closing bracket or brace,
/// along with the whitespace separating them. String literals are
/// scanned with the same escape rules as the extractor, so a value such
/// as `"a,}"` is preserved verbatim.
pub fn strip_trailing_commas(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut in_str = false;
    let mut escape = false;
    for ch in expr.chars() {
        if in_str {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_str = true;
                out.push(ch);
            }
            ']' | '}' => {
                let kept = out
                    .trim_end_matches(|c: char| c.is_ascii_whitespace())
                    .len();
                if out[..kept].ends_with(',') {
                    out.truncate(kept - 1);
                }
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
