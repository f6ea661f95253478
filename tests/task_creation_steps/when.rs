//! When steps for task creation BDD scenarios.

use super::world::{TaskCreationWorld, run_async};
use rstest_bdd_macros::when;

#[when("the candidate task is submitted")]
fn submit_candidate(world: &mut TaskCreationWorld) -> Result<(), eyre::Report> {
    let payload = world
        .pending_payload
        .take()
        .ok_or_else(|| eyre::eyre!("missing pending payload in scenario world"))?;
    world.last_result = Some(run_async(world.service.create(&payload, &world.caller)));
    Ok(())
}
