pub mod apply;
pub mod data;
pub mod destroy;
pub mod plan;
pub mod refresh;
pub mod schema;

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{
    ApplyResult, AutoConfirm, ConfirmCallback, ExecuteOptions, ExecuteReport, ExecutionPlan,
    compute_diffs, execute,
};
use std::path::Path;

use crate::Context;
use crate::progress::BarProgress;
use crate::provider::Provider;
use crate::state::ProviderState;
use crate::ui;

/// Confirmation through an interactive terminal prompt
pub struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;

        Ok(confirmed)
    }
}

/// Show a plan, run it, and persist what succeeded
pub fn run_plan(
    ctx: &Context,
    provider: &Provider,
    mut state: ProviderState,
    state_path: &Path,
    plan: ExecutionPlan,
    auto_approve: bool,
    jobs: usize,
) -> Result<ExecuteReport> {
    let diffs = compute_diffs(&plan);
    ui::display_plan(&diffs);
    if diffs.is_empty() {
        return Ok(ExecuteReport::default());
    }

    let opts = ExecuteOptions {
        dry_run: false,
        jobs: jobs.max(1),
    };
    let mut progress = BarProgress::new("Applying", ctx.quiet);
    let report = if auto_approve {
        execute(plan, provider, &opts, &mut progress, &mut AutoConfirm)?
    } else {
        println!();
        execute(plan, provider, &opts, &mut progress, &mut PromptConfirm)?
    };

    if report.outcomes.is_empty() {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(report);
    }

    report.commit(&mut state.resources);
    state.save(state_path)?;

    print_failures(&report);
    ui::print_summary(&report.summary);

    if !report.summary.is_success() {
        bail!("{} order(s) failed", report.summary.failed);
    }
    Ok(report)
}

/// Print one line per failed instance
pub fn print_failures(report: &ExecuteReport) {
    for outcome in &report.outcomes {
        if let ApplyResult::Failed { error } = &outcome.result {
            ui::error(&format!("{}: {}", outcome.address, error));
        }
    }
}
