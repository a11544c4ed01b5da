use anyhow::Result;
use declarative::{ApplyResult, ExecuteOptions, RecordChange, refresh};
use std::path::Path;

use crate::Context;
use crate::progress::BarProgress;
use crate::provider::Provider;
use crate::state::ProviderState;
use crate::ui;

/// Re-read every recorded order and update the state file
pub fn run(ctx: &Context, provider: &Provider, state_path: &Path) -> Result<()> {
    let mut state = ProviderState::load(state_path)?;
    if state.is_empty() {
        ui::info("No orders recorded; nothing to refresh");
        return Ok(());
    }

    let jobs = ExecuteOptions::default().jobs;
    let mut progress = BarProgress::new("Refreshing", ctx.quiet);
    let report = refresh(provider, &state.resources, jobs, &mut progress)?;

    let mut changed = 0;
    for outcome in &report.outcomes {
        match (&outcome.record, &outcome.result) {
            (RecordChange::Remove, _) => ui::warn(&format!(
                "{} no longer exists remotely; removed from state",
                outcome.address
            )),
            (_, ApplyResult::Failed { error }) => {
                ui::error(&format!("{}: {}", outcome.address, error));
            }
            (_, ApplyResult::Modified) => {
                changed += 1;
                if ctx.verbose > 0 {
                    ui::dim(&format!("{} changed remotely", outcome.address));
                }
            }
            _ => {}
        }
    }

    report.commit(&mut state.resources);
    state.save(state_path)?;

    ui::success(&format!(
        "Refreshed {} order(s), {} changed remotely",
        report.outcomes.len(),
        changed
    ));
    if !report.summary.is_success() {
        anyhow::bail!("{} order(s) could not be read", report.summary.failed);
    }
    Ok(())
}
