//! Shell-style glob matching of diff paths
//!
//! Patterns follow `fnmatch` rules: `*` matches any run of characters
//! including `/`, `?` matches one character, `[...]` is a class (`[!...]`
//! negates). Braces and backslashes are literal, `**` is just two `*`, and an
//! unclosed `[` matches itself.

use regex::Regex;
use tracing::debug;

/// A compiled path pattern
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Glob translated to an anchored regex
    Glob(Regex),
    /// Pattern whose translation failed to compile, compared for equality
    Literal(String),
}

impl PathPattern {
    /// Compile a pattern, falling back to a literal if it cannot be compiled
    pub fn new(pattern: &str) -> Self {
        match Regex::new(&translate(pattern)) {
            Ok(regex) => PathPattern::Glob(regex),
            Err(e) => {
                debug!("Treating invalid glob ({}) as a literal path: {}", pattern, e);
                PathPattern::Literal(pattern.to_string())
            }
        }
    }

    /// Check if the pattern matches the given path
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Glob(regex) => regex.is_match(path),
            PathPattern::Literal(literal) => literal == path,
        }
    }
}

/// Translate a glob into regex source matching the whole path
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("(?s)^(?:");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    out.push_str(")$");
    out
}

/// Index of the `]` closing a class whose body starts at `start`
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // a `]` right after `[` or `[!` is part of the class
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

fn translate_class(body: &[char]) -> String {
    let (negated, body) = match body.split_first() {
        Some((&'!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut out = String::from(if negated { "[^" } else { "[" });
    for &c in body {
        if c == '-' {
            out.push('-');
        } else {
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        }
    }
    out.push(']');
    out
}

/// Test one path against one pattern
pub fn matches(path: &str, pattern: &str) -> bool {
    PathPattern::new(pattern).matches(path)
}

/// True if any path in `diff` matches any of `patterns`
pub fn any_match(patterns: &[String], diff: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        let compiled = PathPattern::new(pattern);
        diff.iter().any(|path| compiled.matches(path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_crosses_separators() {
        assert!(matches("terraform/main.tf", "terraform/*.tf"));
        assert!(matches("terraform/modules/vpc.tf", "terraform/*.tf"));
        assert!(matches("folder/file.tf", "*"));
        assert!(!matches("terraform/main.py", "terraform/*.tf"));
    }

    #[test]
    fn test_double_star_needs_a_separator() {
        assert!(matches("folder_a/file_0", "**/file_0"));
        assert!(matches("a/b/c/file_0", "**/file_0"));
        assert!(matches("docs/readme.md", "docs/**"));
        assert!(matches("a/x/b", "a/**/b"));
        assert!(!matches("file_0", "**/file_0"));
        assert!(!matches("a/b", "a/**/b"));
        assert!(!matches("test_lib.py", "**/test_*"));
        assert!(!matches("folder_b/.folder/file_2", "**/*_1"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        assert!(matches("file1.py", "file?.py"));
        assert!(!matches("file10.py", "file?.py"));
        assert!(matches("src/a.rs", "src/[abc].rs"));
        assert!(!matches("src/d.rs", "src/[abc].rs"));
        assert!(matches("src/d.rs", "src/[!abc].rs"));
        assert!(matches("v7", "v[0-9]"));
        assert!(matches("]", "[]]"));
        assert!(matches("x", "[!]]"));
        assert!(matches("a&b", "a[&]b"));
    }

    #[test]
    fn test_braces_are_literal() {
        assert!(!matches("x.rs", "*.{rs,md}"));
        assert!(matches("x.{rs,md}", "*.{rs,md}"));
    }

    #[test]
    fn test_unclosed_bracket_is_literal_and_star_still_matches() {
        assert!(matches("src/[abcX", "src/[abc*"));
        assert!(matches("src/[abc", "src/[abc"));
        assert!(!matches("src/a", "src/[abc"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("a+b(1).txt", "a+b(1).txt"));
        assert!(!matches("aab1.txt", "a+b(1).txt"));
        assert!(matches(r"dir\file", r"dir\file"));
    }

    #[test]
    fn test_any_match() {
        let diff = vec!["docs/readme.md".to_string(), "src/lib.rs".to_string()];
        assert!(any_match(&["src/*.rs".to_string()], &diff));
        assert!(!any_match(&["*.py".to_string()], &diff));
        assert!(!any_match(&["*".to_string()], &[]));
        assert!(!any_match(&[], &diff));
    }
}
