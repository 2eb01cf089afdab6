// Indentation style detection shared by the codecs and the source patcher

/// One nesting level of a serialized document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
    Tab,
    /// Single-line output with no whitespace between tokens
    Compact,
}

impl Indent {
    pub const DEFAULT: Indent = Indent::Spaces(2);

    /// Leading whitespace of the first indented, non-blank line
    pub fn detect(text: &str) -> Option<Indent> {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .find_map(|line| {
                if line.starts_with('\t') {
                    Some(Indent::Tab)
                } else {
                    let width = line.len() - line.trim_start_matches(' ').len();
                    (width > 0).then_some(Indent::Spaces(width))
                }
            })
    }

    /// Literal whitespace for one level; empty for compact output
    pub fn unit(&self) -> String {
        match self {
            Indent::Spaces(n) => " ".repeat(*n),
            Indent::Tab => "\t".to_string(),
            Indent::Compact => String::new(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_spaces() {
        assert_eq!(Indent::detect("{\n    \"a\": {\n        \"b\": 1\n    }\n}"), Some(Indent::Spaces(4)));
    }

    #[test]
    fn test_detects_tab() {
        assert_eq!(Indent::detect("{\n\t\"a\": 1\n}"), Some(Indent::Tab));
    }

    #[test]
    fn test_skips_blank_lines() {
        assert_eq!(Indent::detect("a:\n   \n  - b\n"), Some(Indent::Spaces(2)));
    }

    #[test]
    fn test_single_line_has_no_indent() {
        assert_eq!(Indent::detect(r#"{"extends":"foo"}"#), None);
    }

    #[test]
    fn test_unit() {
        assert_eq!(Indent::Spaces(3).unit(), "   ");
        assert_eq!(Indent::Tab.unit(), "\t");
        assert_eq!(Indent::Compact.unit(), "");
    }
}
