//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the proposed version change (or initial version).
///
/// # Arguments
/// * `previous` - Previous tag, empty if there is none
/// * `next` - The new version token
pub fn display_proposed_version(previous: &str, next: &str) {
    if previous.is_empty() {
        println!("\n{}", style("Initial Version:").bold());
        println!("  New version: {}", style(next).green());
    } else {
        println!("\n{}", style("Proposed Version Change:").bold());
        println!("  From: {}", style(previous).red());
        println!("  To:   {}", style(next).green());
    }
}

/// Display the changelog text a dry run would write.
pub fn display_preview(path: &str, text: &str) {
    println!("\n{}", style(format!("{} would become:", path)).underlined());
    print!("{}", text);
}

/// Display manual push instruction for a tag.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To publish this release, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} HEAD {}", remote, tag)).cyan()
    );
}
