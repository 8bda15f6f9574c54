//! Best-effort minifier for generated script text.
//!
//! Block comments are stripped and line breaks, tabs and runs of spaces
//! are removed. String literals are not understood: comment-like text or
//! repeated spaces inside a literal are stripped as well.

use std::sync::LazyLock;

use regex::Regex;

/// `None` only if the pattern fails to compile, in which case comments are
/// left in place.
static BLOCK_COMMENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"/\*[^*]*\*+([^/][^*]*\*+)*/")
        .map_err(|error| tracing::warn!("block comment pattern failed to compile: {error}"))
        .ok()
});

/// Whitespace sequences removed after comments, applied in order.
const STRIPPED_SEQUENCES: [&str; 7] = ["\r\n", "\r", "\n", "\t", "  ", "   ", "    "];

/// Strips block comments and layout whitespace from `buffer`.
///
/// Runs of spaces are removed pairwise, so an odd-length run leaves a
/// single space behind.
#[must_use]
pub fn compress(buffer: &str) -> String {
    let uncommented = BLOCK_COMMENT.as_ref().map_or_else(
        || buffer.to_owned(),
        |pattern| pattern.replace_all(buffer, "").into_owned(),
    );

    STRIPPED_SEQUENCES
        .iter()
        .fold(uncommented, |text, sequence| text.replace(sequence, ""))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{BLOCK_COMMENT, compress};

    #[rstest]
    fn block_comment_pattern_compiles() {
        assert!(BLOCK_COMMENT.is_some());
    }

    #[rstest]
    #[case::comment_and_layout("/* c */\n  a\tb", "ab")]
    #[case::crlf("a\r\nb\rc\nd", "abcd")]
    #[case::multi_line_comment("x/* one\n * two\n */y", "xy")]
    #[case::starred_comment("x/*** banner ***/y", "xy")]
    #[case::two_comments("a/* 1 */b/* 2 */c", "abc")]
    #[case::single_spaces_kept("var a = 1;", "var a = 1;")]
    #[case::even_run_removed("a    b", "ab")]
    #[case::odd_run_leaves_one("a   b", "a b")]
    #[case::empty("", "")]
    fn strips_comments_and_layout(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(compress(input), expected);
    }

    #[rstest]
    fn strips_comment_markers_inside_string_literals() {
        let script = r#"var s = "/* not a comment */";"#;

        assert_eq!(compress(script), r#"var s = "";"#);
    }

    #[rstest]
    fn unterminated_comment_is_kept() {
        assert_eq!(compress("a /* open"), "a /* open");
    }
}
