//! Given steps for task creation BDD scenarios.

use super::world::{TaskCreationWorld, candidate, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(
    r#"a candidate task titled "{title}" with description "{description}" and status "{status}""#
)]
fn candidate_task(world: &mut TaskCreationWorld, title: String, description: String, status: String) {
    world.pending_payload = Some(candidate(&title, &description, &status));
}

#[given(r#"a task titled "{title}" already exists"#)]
fn existing_task(world: &mut TaskCreationWorld, title: String) -> Result<(), eyre::Report> {
    let payload = candidate(&title, "An existing task description", "TODO");
    run_async(world.service.create(&payload, &world.caller))
        .wrap_err("create existing task for duplicate scenario")?;
    Ok(())
}

#[given(r#"the candidate task has no "{field}" field"#)]
fn candidate_without_field(world: &mut TaskCreationWorld, field: String) -> Result<(), eyre::Report> {
    let payload = world
        .pending_payload
        .as_mut()
        .ok_or_else(|| eyre::eyre!("missing pending payload in scenario world"))?;
    payload.remove(&field);
    Ok(())
}
