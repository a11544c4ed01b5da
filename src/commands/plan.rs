use anyhow::{Context as AnyhowContext, Result};
use declarative::{ExecutionPlan, compute_diffs};
use std::path::Path;

use crate::desired;
use crate::provider::Provider;
use crate::state::ProviderState;
use crate::ui;

/// Print the changes apply would make
pub fn run(provider: &Provider, state_path: &Path, desired_path: &Path) -> Result<()> {
    let state = ProviderState::load(state_path)?;
    let desired = desired::load(desired_path)?;

    let plan = ExecutionPlan::build(provider, &state.resources, &desired)
        .with_context(|| format!("Invalid configuration in {}", desired_path.display()))?;

    ui::display_plan(&compute_diffs(&plan));
    Ok(())
}
