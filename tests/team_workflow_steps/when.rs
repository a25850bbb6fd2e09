//! When steps for team workflow BDD scenarios.

use super::world::{TrackerWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use ticketry::issue::services::CreateIssueRequest;
use ticketry::team::services::CreateTeamRequest;

#[when(r#"team "{key}" named "{name}" is created"#)]
fn create_team(world: &mut TrackerWorld, key: String, name: String) -> Result<(), eyre::Report> {
    let result = run_async(world.teams.create_team(CreateTeamRequest::new(key, name)));
    if let Ok(team) = &result {
        world.states = run_async(world.workflow.list_states(team.id()))
            .wrap_err("list provisioned states")?;
        world.team = Some(team.clone());
    }
    world.last_team_result = Some(result);
    Ok(())
}

#[when(r#"issue "{title}" is filed in the "{kind}" state"#)]
fn file_issue(world: &mut TrackerWorld, title: String, kind: String) -> Result<(), eyre::Report> {
    let team_id = world.current_team()?.id();
    let status = world.state_of_kind(&kind)?;
    world.last_issue_result = Some(run_async(
        world
            .issues
            .create_issue(CreateIssueRequest::new(team_id, title, status)),
    ));
    Ok(())
}

#[when(r#"the "{kind}" state is deleted"#)]
fn delete_state(world: &mut TrackerWorld, kind: String) -> Result<(), eyre::Report> {
    let status = world.state_of_kind(&kind)?;
    world.last_delete_result = Some(run_async(world.workflow.delete_state(status)));
    Ok(())
}
