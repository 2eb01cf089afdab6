// Prettier formatting options: `.prettierrc` contents and CLI flags

use crate::document::{Document, Mapping};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    None,
    Es5,
    All,
}

impl TrailingComma {
    pub fn as_str(self) -> &'static str {
        match self {
            TrailingComma::None => "none",
            TrailingComma::Es5 => "es5",
            TrailingComma::All => "all",
        }
    }
}

impl fmt::Display for TrailingComma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrailingComma {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TrailingComma::None),
            "es5" => Ok(TrailingComma::Es5),
            "all" => Ok(TrailingComma::All),
            other => Err(format!("unknown trailing comma style '{}' (expected none, es5 or all)", other)),
        }
    }
}

/// Explicitly requested Prettier options; unset fields keep Prettier's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrettierOptions {
    pub print_width: Option<u32>,
    pub tab_width: Option<u32>,
    pub use_tabs: Option<bool>,
    pub semi: Option<bool>,
    pub single_quote: Option<bool>,
    pub trailing_comma: Option<TrailingComma>,
    pub bracket_spacing: Option<bool>,
    pub jsx_bracket_same_line: Option<bool>,
}

impl PrettierOptions {
    /// Drop settings that only restate a Prettier default
    pub fn normalized(mut self) -> Self {
        if self.semi == Some(true) {
            self.semi = None;
        }
        if self.bracket_spacing == Some(true) {
            self.bracket_spacing = None;
        }
        self
    }

    /// Overlay `other`, whose set fields win
    pub fn merge(&mut self, other: &PrettierOptions) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            print_width,
            tab_width,
            use_tabs,
            semi,
            single_quote,
            trailing_comma,
            bracket_spacing,
            jsx_bracket_same_line
        );
    }

    pub fn is_empty(&self) -> bool {
        self.to_document().is_empty()
    }

    /// `.prettierrc` entries in canonical key order
    pub fn to_document(&self) -> Mapping {
        let options = self.clone().normalized();
        let mut map = Mapping::new();
        if let Some(width) = options.print_width {
            map.insert("printWidth", Document::from(u64::from(width)));
        }
        if let Some(width) = options.tab_width {
            map.insert("tabWidth", Document::from(u64::from(width)));
        }
        if let Some(tabs) = options.use_tabs {
            map.insert("useTabs", Document::from(tabs));
        }
        if let Some(semi) = options.semi {
            map.insert("semi", Document::from(semi));
        }
        if let Some(single) = options.single_quote {
            map.insert("singleQuote", Document::from(single));
        }
        if let Some(style) = options.trailing_comma {
            map.insert("trailingComma", Document::from(style.as_str()));
        }
        if let Some(spacing) = options.bracket_spacing {
            map.insert("bracketSpacing", Document::from(spacing));
        }
        if let Some(same_line) = options.jsx_bracket_same_line {
            map.insert("jsxBracketSameLine", Document::from(same_line));
        }
        map
    }

    /// Flags for the `prettier` executable
    pub fn to_arguments(&self) -> Vec<String> {
        let options = self.clone().normalized();
        let mut args = Vec::new();
        if let Some(width) = options.print_width {
            args.extend(["--print-width".to_string(), width.to_string()]);
        }
        if let Some(width) = options.tab_width {
            args.extend(["--tab-width".to_string(), width.to_string()]);
        }
        if options.use_tabs == Some(true) {
            args.push("--use-tabs".to_string());
        }
        if options.semi == Some(false) {
            args.push("--no-semi".to_string());
        }
        if options.single_quote == Some(true) {
            args.push("--single-quote".to_string());
        }
        if let Some(style) = options.trailing_comma {
            args.extend(["--trailing-comma".to_string(), style.to_string()]);
        }
        if options.bracket_spacing == Some(false) {
            args.push("--no-bracket-spacing".to_string());
        }
        if options.jsx_bracket_same_line == Some(true) {
            args.push("--jsx-bracket-same-line".to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn everything() -> PrettierOptions {
        PrettierOptions {
            print_width: Some(100),
            tab_width: Some(4),
            use_tabs: Some(true),
            semi: Some(false),
            single_quote: Some(true),
            trailing_comma: Some(TrailingComma::Es5),
            bracket_spacing: Some(false),
            jsx_bracket_same_line: Some(true),
        }
    }

    #[test]
    fn test_defaults_are_not_recorded() {
        let options = PrettierOptions {
            semi: Some(true),
            bracket_spacing: Some(true),
            ..Default::default()
        };
        assert!(options.is_empty());
        assert!(options.to_arguments().is_empty());
    }

    #[test]
    fn test_document_key_order() {
        let keys: Vec<String> = everything().to_document().keys().map(str::to_string).collect();
        assert_eq!(
            keys,
            vec![
                "printWidth",
                "tabWidth",
                "useTabs",
                "semi",
                "singleQuote",
                "trailingComma",
                "bracketSpacing",
                "jsxBracketSameLine"
            ]
        );
    }

    #[test]
    fn test_arguments() {
        assert_eq!(
            everything().to_arguments().join(" "),
            "--print-width 100 --tab-width 4 --use-tabs --no-semi --single-quote \
             --trailing-comma es5 --no-bracket-spacing --jsx-bracket-same-line"
        );
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = PrettierOptions {
            print_width: Some(80),
            single_quote: Some(true),
            ..Default::default()
        };
        base.merge(&PrettierOptions {
            print_width: Some(120),
            ..Default::default()
        });
        assert_eq!(base.print_width, Some(120));
        assert_eq!(base.single_quote, Some(true));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let options: PrettierOptions = toml::from_str("printWidth = 90\ntrailingComma = \"all\"\n").unwrap();
        assert_eq!(options.print_width, Some(90));
        assert_eq!(options.trailing_comma, Some(TrailingComma::All));
    }

    #[test]
    fn test_trailing_comma_from_str() {
        assert_eq!("es5".parse::<TrailingComma>(), Ok(TrailingComma::Es5));
        assert!("some".parse::<TrailingComma>().is_err());
    }
}
