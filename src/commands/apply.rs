use anyhow::{Context as AnyhowContext, Result};
use declarative::ExecutionPlan;
use std::path::Path;

use crate::Context;
use crate::desired;
use crate::provider::Provider;
use crate::state::ProviderState;

/// Converge recorded orders onto the desired configuration
pub fn run(
    ctx: &Context,
    provider: &Provider,
    state_path: &Path,
    desired_path: &Path,
    auto_approve: bool,
    parallelism: usize,
) -> Result<()> {
    let state = ProviderState::load(state_path)?;
    let desired = desired::load(desired_path)?;

    let plan = ExecutionPlan::build(provider, &state.resources, &desired)
        .with_context(|| format!("Invalid configuration in {}", desired_path.display()))?;

    super::run_plan(ctx, provider, state, state_path, plan, auto_approve, parallelism)?;
    Ok(())
}
