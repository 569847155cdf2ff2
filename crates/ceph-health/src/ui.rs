//! UI helpers for the health CLI.
//!
//! Provides consistent formatting for console output.

use colored::Colorize;

/// Print a check title.
pub fn print_section(title: &str) {
    println!("{} {}", "ℹ".blue().bold(), title.cyan().bold());
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Print an error message.
pub fn print_error(message: &str) {
    println!("{} {}", "✗".red().bold(), message.red());
}

/// Print a message for a check that could not complete.
pub fn print_fatal(message: &str) {
    println!(
        "{} {} {}",
        "✗".red().bold(),
        "FATAL".on_red().white().bold(),
        message.red().bold()
    );
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

/// Print a plain, uncolored line (tabular rows, raw command output).
pub fn print_plain(line: &str) {
    println!("{line}");
}

/// Print the closing summary of a health run.
pub fn print_summary(warnings: usize, errors: usize, fatal: usize) {
    println!("{}", "─".repeat(70).bright_black());

    if warnings == 0 && errors == 0 && fatal == 0 {
        print_success("Ceph cluster looks healthy");
        return;
    }

    let text = format!("{warnings} warning(s), {errors} error(s), {fatal} check(s) incomplete");
    if errors > 0 || fatal > 0 {
        print_error(&text);
    } else {
        print_warning(&text);
    }
}
