//! Format-preserving patcher for `.eslintrc.js` files.
//!
//! The file is tokenized and every top-level `module.exports = ...`
//! assignment is parsed into a small syntax tree. Edits mark the containers
//! they touch; the printer then copies all other text unchanged.

mod ast;
mod lexer;
mod parser;
mod printer;
mod transform;

use crate::error::PatchResult;
use crate::patcher::Severity;
use printer::{line_indent, Printer};
use tracing::debug;

pub use transform::{PRETTIER_PLUGIN, PRETTIER_PRESET, PRETTIER_RULE};

/// Add the prettier preset, plugin and rule to the exported config object
///
/// Source without a `module.exports` assignment, or whose export is not an
/// object literal, is returned unchanged. Unparseable source is an error.
pub fn update_eslintrc_contents(source: &str, severity: Severity) -> PatchResult<String> {
    let parser::Parsed {
        mut ast,
        exports,
        quote,
    } = parser::parse(source)?;

    if exports.is_empty() {
        debug!("no module.exports assignment found");
        return Ok(source.to_string());
    }
    for &config in &exports {
        transform::add_prettier(&mut ast, config, severity);
    }

    let printer = Printer::new(source, &ast, quote);
    let mut out = String::with_capacity(source.len() + 128);
    let mut cursor = 0;
    for config in exports {
        let Some(span) = ast.node(config).span else {
            continue;
        };
        out.push_str(&source[cursor..span.start]);
        out.push_str(&printer.print(config, line_indent(source, span.start), false));
        cursor = span.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatchError;

    fn patch(source: &str) -> String {
        update_eslintrc_contents(source, Severity::Error).unwrap()
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(
            patch("module.exports = {};"),
            r#"module.exports = { extends: ["prettier"], plugins: ["prettier"], rules: { "prettier/prettier": "error" } };"#
        );
    }

    #[test]
    fn test_existing_sections_keep_layout_and_quotes() {
        let source = "\
module.exports = {
  extends: ['eslint:recommended'],
  rules: {
    semi: 'error',
  },
};
";
        let expected = "\
module.exports = {
  extends: ['eslint:recommended', 'prettier'],
  rules: {
    semi: 'error',
    'prettier/prettier': 'error',
  },
  plugins: ['prettier'],
};
";
        assert_eq!(patch(source), expected);
    }

    #[test]
    fn test_patching_twice_changes_nothing() {
        let once = patch("module.exports = {\n  root: true,\n};\n");
        assert_eq!(patch(&once), once);
    }

    #[test]
    fn test_invalid_sections_are_coerced() {
        assert_eq!(
            patch(r#"module.exports = { extends: "foo", plugins: "bar", rules: "baz" };"#),
            r#"module.exports = { extends: ["foo", "prettier"], plugins: ["bar", "prettier"], rules: { "prettier/prettier": "error" } };"#
        );
    }

    #[test]
    fn test_preset_moves_to_end() {
        let source = r#"module.exports = { extends: ["prettier", "a"], plugins: ["prettier"], rules: { "prettier/prettier": "warn" } };"#;
        assert_eq!(
            patch(source),
            r#"module.exports = { extends: ["a", "prettier"], plugins: ["prettier"], rules: { "prettier/prettier": "warn" } };"#
        );
    }

    #[test]
    fn test_comments_survive() {
        let source = "\
// eslint config
module.exports = {
  // presets
  extends: 'airbnb', // base

  rules: {},
};
";
        let expected = "\
// eslint config
module.exports = {
  // presets
  extends: ['airbnb', 'prettier'], // base

  rules: { 'prettier/prettier': 'error' },
  plugins: ['prettier'],
};
";
        assert_eq!(patch(source), expected);
    }

    #[test]
    fn test_comment_before_comma_survives() {
        let out = patch("module.exports = {\n  extends: 'a' /* keep me */,\n  rules: {},\n};\n");
        assert!(out.contains("  extends: ['a', 'prettier'], /* keep me */\n"), "{}", out);
    }

    #[test]
    fn test_comment_on_line_before_leading_comma_survives() {
        let source = "module.exports = {\n  plugins: [\n    'react' // ui\n    , 'x'\n  ],\n};\n";
        let out = patch(source);
        assert!(
            out.contains("  plugins: [\n    'react', // ui\n    'x',\n    'prettier'\n  ],\n"),
            "{}",
            out
        );
    }

    #[test]
    fn test_new_sections_follow_file_indentation() {
        let source = "module.exports = {\n    root: true,\n};\n";
        insta::assert_snapshot!(patch(source), @r#"
        module.exports = {
            root: true,
            extends: ["prettier"],
            plugins: ["prettier"],
            rules: {
                "prettier/prettier": "error"
            },
        };
        "#);
    }

    #[test]
    fn test_warn_severity() {
        let out = update_eslintrc_contents("module.exports = {};", Severity::Warn).unwrap();
        assert!(out.contains(r#""prettier/prettier": "warn""#));
    }

    #[test]
    fn test_without_exports_is_unchanged() {
        let source = "export default { rules: {} };\n";
        assert_eq!(patch(source), source);
    }

    #[test]
    fn test_non_object_export_is_unchanged() {
        let source = "module.exports = require('./base');\n";
        assert_eq!(patch(source), source);
    }

    #[test]
    fn test_surrounding_code_is_untouched() {
        let source = "\
const path = require(\"path\");

module.exports = {
  parserOptions: { project: path.join(__dirname, `tsconfig.json`) },
  plugins: [\"react\"],
  extends: [\"prettier\"],
  rules: { \"prettier/prettier\": \"off\" },
};

console.log(/}/.test(\"x\"));
";
        let out = patch(source);
        assert_eq!(
            out,
            source.replace("plugins: [\"react\"]", "plugins: [\"react\", \"prettier\"]")
        );
    }

    #[test]
    fn test_accessor_counts_as_existing_section() {
        let source = "module.exports = {\n  get rules() { return {}; },\n};\n";
        let out = patch(source);
        assert!(out.contains("  get rules() { return {}; },\n"), "{out}");
        assert_eq!(out.matches("rules").count(), 1, "{out}");
        assert!(out.contains("extends: [\"prettier\"]"), "{out}");
        assert!(out.contains("plugins: [\"prettier\"]"), "{out}");
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = update_eslintrc_contents("module.exports = {\n  rules: {\n", Severity::Error).unwrap_err();
        assert!(matches!(err, PatchError::Syntax { line: 3, .. }));
    }
}
