//! Pure formatting functions for UI output.
//!
//! `format_*` functions build text and are unit tested; `display_*` functions
//! only print what they are given.

use console::style;

use crate::cli::WorkflowResult;
use crate::warnings::PublishWarning;

/// Format and print a fatal error: an `Error:` header, then the detail.
pub fn display_error(message: &str) {
    eprintln!("{}", style("Error:").red().bold());
    eprintln!("  {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning to the user.
pub fn display_warning(warning: &PublishWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Format the primary tags of a release, or `<empty tag>` when untagged.
pub fn format_tags(result: &WorkflowResult) -> String {
    if result.tags.is_empty() {
        "<empty tag>".to_string()
    } else {
        result
            .tags
            .iter()
            .map(|tag| tag.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Format the summary lines of a finished (or previewed) release.
pub fn format_summary(result: &WorkflowResult) -> Vec<String> {
    let package = result.package.as_deref().unwrap_or("package");
    let mut lines = Vec::new();

    if result.dry_run {
        lines.push(format!(
            "Dry run: would publish {}@{}",
            package,
            style(&result.version).green()
        ));
    } else {
        lines.push(format!(
            "Published {}@{}",
            package,
            style(&result.version).green()
        ));
    }
    lines.push(format!("  Tags: {}", format_tags(result)));

    for status in &result.current_tags {
        let current = status
            .current
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<unset>".to_string());
        lines.push(format!(
            "  {} currently points to {}",
            style(&status.tag).cyan(),
            current
        ));
    }

    if let Some(marker) = &result.secondary_tag {
        let verb = if result.dry_run { "Would add" } else { "Added" };
        lines.push(format!("  {} dist-tag: {}", verb, style(marker).cyan()));
    }

    lines
}

/// Display the release summary.
pub fn display_summary(result: &WorkflowResult) {
    let mut lines = format_summary(result).into_iter();
    if let Some(headline) = lines.next() {
        display_success(&headline);
    }
    for line in lines {
        println!("{}", line);
    }
}
