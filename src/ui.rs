use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Start a spinner for a remote call; hidden when `quiet`
pub fn spinner(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Line diff between two renderings, `None` when identical
pub fn line_diff(before: &str, after: &str) -> Option<Vec<String>> {
    let diff = similar::TextDiff::from_lines(before, after);
    let mut lines = Vec::new();
    let mut changed = false;

    for change in diff.iter_all_changes() {
        let text = change.to_string_lossy();
        let text = text.trim_end_matches('\n');
        match change.tag() {
            similar::ChangeTag::Delete => {
                changed = true;
                lines.push(format!("- {text}").red().to_string());
            }
            similar::ChangeTag::Insert => {
                changed = true;
                lines.push(format!("+ {text}").green().to_string());
            }
            similar::ChangeTag::Equal => lines.push(format!("  {text}").dimmed().to_string()),
        }
    }

    changed.then_some(lines)
}

// ============================================================================
// Tests
// ============================================================================
