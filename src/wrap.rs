// this_file: src/wrap.rs

//! Greedy word wrapping.

/// Wrap `text` into lines of at most `max_chars_per_line` characters.
///
/// Whole words are accumulated onto the current line (joined by single
/// spaces) while the running character count stays within the limit. A
/// single word longer than the limit occupies its own, overflowing line
/// rather than being split. Pure and deterministic; re-wrapping the
/// rejoined output at the same limit yields the same lines.
pub fn wrap(text: &str, max_chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= max_chars_per_line {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap("a beautiful view", 40), vec!["a beautiful view"]);
    }

    #[test]
    fn test_wrap_breaks_at_limit() {
        // "what a" is 6 chars; adding " beautiful" would make 16.
        assert_eq!(
            wrap("what a beautiful view", 10),
            vec!["what a", "beautiful", "view"]
        );
    }

    #[test]
    fn test_wrap_counts_joining_spaces() {
        // "ab cd" is exactly 5 chars and fits; "ab cd ef" would be 8.
        assert_eq!(wrap("ab cd ef", 5), vec!["ab cd", "ef"]);
    }

    #[test]
    fn test_overlong_word_gets_own_line() {
        assert_eq!(
            wrap("a incomprehensibilities b", 10),
            vec!["a", "incomprehensibilities", "b"]
        );
    }

    #[test]
    fn test_empty_text_yields_no_lines() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_no_empty_lines_produced() {
        let lines = wrap("one two three four five six seven", 7);
        assert!(lines.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_zero_limit_puts_each_word_alone() {
        assert_eq!(wrap("a bb ccc", 0), vec!["a", "bb", "ccc"]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // Five two-byte characters still count as five.
        assert_eq!(wrap("ééééé ééééé", 11), vec!["ééééé ééééé"]);
        assert_eq!(wrap("ééééé ééééé", 10), vec!["ééééé", "ééééé"]);
    }

    #[test]
    fn test_rewrapping_is_idempotent() {
        let text = "the quick brown fox jumps over the lazy dog near the riverbank";
        for limit in [5, 12, 20, 40] {
            let once = wrap(text, limit);
            let rejoined = once.join(" ");
            assert_eq!(wrap(&rejoined, limit), once, "limit {}", limit);
        }
    }
}
