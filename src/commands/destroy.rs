use anyhow::Result;
use declarative::ExecutionPlan;
use std::path::Path;

use crate::Context;
use crate::provider::Provider;
use crate::state::ProviderState;
use crate::ui;

/// Remove every recorded order from state
///
/// The HashiCups API has no order cancellation, so remote orders stay put.
pub fn run(ctx: &Context, provider: &Provider, state_path: &Path, auto_approve: bool) -> Result<()> {
    let state = ProviderState::load(state_path)?;
    if state.is_empty() {
        ui::info("No orders recorded; nothing to destroy");
        return Ok(());
    }

    let plan = ExecutionPlan::destroy_all(provider, &state.resources)?;
    let report = super::run_plan(ctx, provider, state, state_path, plan, auto_approve, 1)?;

    if report.summary.removed > 0 {
        ui::dim("Remote orders were left in place; only local records were removed");
    }
    Ok(())
}
