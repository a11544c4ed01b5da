use colored::Colorize;
use declarative::{Action, Attributes, DiffSummary, ExecuteSummary, ResourceDiff};

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

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Plan Display
// ============================================================================

/// Display planned changes with per-attribute diffs
pub fn display_plan(diffs: &[ResourceDiff]) {
    if diffs.is_empty() {
        println!();
        println!("  {} No changes. Remote orders match the configuration.", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Execution Plan".bold()
    );
    println!("│");

    for diff in diffs {
        let symbol = match diff.action {
            Action::Create => "+".green(),
            Action::Delete => "-".red(),
            Action::Update => "~".yellow(),
            Action::NoOp => " ".normal(),
        };

        let note = match diff.action {
            Action::Create => "(will be created)".to_string(),
            Action::Delete => "(will be forgotten; the remote order is kept)".to_string(),
            Action::Update => format!("(changes: {})", diff.changed.join(", ")),
            Action::NoOp => String::new(),
        };

        println!("│ {} {:<30} {}", symbol, diff.address, note.dimmed());
        for line in attribute_diff(diff.before.as_ref(), diff.after.as_ref()) {
            println!("│     {}", line);
        }
        println!("│");
    }

    let summary = DiffSummary::from_diffs(diffs);
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Plan: {} to add, {} to change, {} to destroy",
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.removals.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

/// Line diff of two attribute sets rendered as pretty JSON
fn attribute_diff(before: Option<&Attributes>, after: Option<&Attributes>) -> Vec<String> {
    let text_a = render_attributes(before);
    let text_b = render_attributes(after);
    let diff = similar::TextDiff::from_lines(&text_a, &text_b);

    diff.iter_all_changes()
        .filter_map(|change| {
            let line = change.to_string();
            let line = line.trim_end();
            match change.tag() {
                similar::ChangeTag::Delete => Some(format!("- {line}").red().to_string()),
                similar::ChangeTag::Insert => Some(format!("+ {line}").green().to_string()),
                similar::ChangeTag::Equal => None,
            }
        })
        .collect()
}

fn render_attributes(attrs: Option<&Attributes>) -> String {
    match attrs {
        Some(attrs) => {
            let mut text = serde_json::to_string_pretty(attrs).unwrap_or_default();
            text.push('\n');
            text
        }
        None => String::new(),
    }
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Apply complete!", "✓".green().bold());
    } else {
        println!("  {} Apply finished with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} orders created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} orders updated", summary.modified);
    }
    if summary.removed > 0 {
        println!("    • {} orders forgotten", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} orders skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "orders".red());
    }
}

// ============================================================================
// Tests
// ============================================================================
