/*
    Thin wrapper over the regex crate for testing patterns against words
*/

use regex::Regex;

// Patterns describe whole words, so they are anchored at both ends. The
// bare pattern is checked first so stray parentheses cannot escape the group
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{})$", pattern))
}

pub fn compiles(pattern: &str) -> bool {
    compile(pattern).is_ok()
}

/// Whether `pattern` matches all of `text`.
pub fn matches(pattern: &str, text: &str) -> Result<bool, regex::Error> {
    Ok(compile(pattern)?.is_match(text))
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn whole_word_matching() {
        let cases = vec![("a(b|c)*", "abcb"), ("a(b|c)*", "xabc"), ("(a|)", ""), ("", ""), ("", "a")];
        let answers = vec![true, false, true, true, false];

        for ((pattern, text), answer) in zip(cases, answers) {
            assert_eq!(matches(pattern, text).unwrap(), answer, "{pattern} on {text}");
        }
    }

    #[test]
    fn broken_patterns() {
        assert!(!compiles("(ab"));
        assert!(!compiles("a)|(b"));
        assert!(!compiles("[a"));
        assert!(matches("*", "a").is_err());
        assert!(compiles("a|b"));
    }
}
