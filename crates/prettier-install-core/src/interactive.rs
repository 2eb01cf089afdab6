// Confirmation prompts and coloured CLI output

use anyhow::Result;
use inquire::Confirm;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Check if we should prompt the user
pub fn is_interactive() -> bool {
    // Never prompt in tests or CI
    if is_test_env() || is_ci() {
        return false;
    }

    std::io::stdin().is_terminal()
}

fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Compile-time test flag, `PRETTIER_INSTALL_TEST`, or a test harness thread
fn is_test_env() -> bool {
    if cfg!(test) || std::env::var_os("PRETTIER_INSTALL_TEST").is_some() {
        return true;
    }

    std::thread::current()
        .name()
        .is_some_and(|name| name.contains("test_"))
}

/// Ask a yes/no question; `assume_yes` or a non-interactive session skips the prompt
pub fn confirm(message: &str, default: bool, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !is_interactive() {
        return Ok(default);
    }
    Ok(Confirm::new(message).with_default(default).prompt()?)
}

/// Print a header with decoration
pub fn print_header(text: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!("{}", text.bright_cyan().bold());
    println!("{}", "━".repeat(60).bright_black());
    println!();
}

pub fn print_success(text: &str) {
    println!("{} {}", "✓".bright_green(), text.green());
}

pub fn print_info(text: &str) {
    println!("{} {}", "→".bright_blue(), text.bright_blue());
}

pub fn print_warning(text: &str) {
    println!("{} {}", "▸ ".bright_yellow(), text.yellow());
}

/// Print a list item
pub fn print_item(text: &str) {
    println!("   {} {}", "•".bright_black(), text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_interactive_in_tests() {
        assert!(!is_interactive(), "is_interactive() should return false during tests");
    }

    #[test]
    fn test_confirm_uses_default_without_terminal() {
        assert!(confirm("Proceed?", true, false).unwrap());
        assert!(!confirm("Proceed?", false, false).unwrap());
        assert!(confirm("Proceed?", false, true).unwrap());
    }
}
