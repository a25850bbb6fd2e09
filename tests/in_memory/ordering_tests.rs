//! Fractional ordering of states and issues.

use crate::in_memory::helpers::{Tracker, tracker};
use rstest::rstest;
use ticketry::issue::services::{CreateIssueRequest, UpdatePositionRequest};
use ticketry::position::Position;
use ticketry::workflow::{domain::StateKind, services::CreateStateRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_state_can_be_slotted_between_neighbours(tracker: Tracker) -> eyre::Result<()> {
    let eng = tracker.provision("ENG").await?;
    let todo = tracker.workflow.get_state(eng.state(StateKind::Unstarted)?).await?;
    let doing = tracker.workflow.get_state(eng.state(StateKind::Started)?).await?;
    let slot = Position::between(todo.position(), doing.position())
        .ok_or_else(|| eyre::eyre!("gap should split"))?;

    tracker
        .workflow
        .create_state(
            eng.team.id(),
            CreateStateRequest::new("Ready", StateKind::Unstarted).with_position(slot.value()),
        )
        .await?;

    let names: Vec<String> = tracker
        .workflow
        .list_states(eng.team.id())
        .await?
        .iter()
        .map(|state| state.name().to_string())
        .collect();
    assert_eq!(
        names,
        ["Backlog", "Todo", "Ready", "In Progress", "Done", "Canceled"]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_halving_is_recovered_by_renormalising(tracker: Tracker) -> eyre::Result<()> {
    let eng = tracker.provision("ENG").await?;
    let backlog = eng.state(StateKind::Backlog)?;
    let low = tracker
        .issues
        .create_issue(CreateIssueRequest::new(eng.team.id(), "Low", backlog))
        .await?;
    let high = tracker
        .issues
        .create_issue(CreateIssueRequest::new(eng.team.id(), "High", backlog))
        .await?;
    let mover = tracker
        .issues
        .create_issue(CreateIssueRequest::new(eng.team.id(), "Mover", backlog))
        .await?;

    let mut upper = high.position();
    let mut exhausted = false;
    for _ in 0..200 {
        match Position::between(low.position(), upper) {
            Some(midpoint) => {
                tracker
                    .issues
                    .update_position(mover.id(), UpdatePositionRequest::new(midpoint.value()))
                    .await?;
                upper = midpoint;
            }
            None => {
                exhausted = true;
                break;
            }
        }
    }
    eyre::ensure!(exhausted, "gap never ran out");

    let rewritten = tracker
        .issues
        .renormalize_positions(eng.team.id(), backlog)
        .await?;
    assert_eq!(rewritten, 3);

    let listed = tracker
        .issues
        .list_issues_in_status(eng.team.id(), backlog)
        .await?;
    let summary: Vec<(String, f64)> = listed
        .iter()
        .map(|issue| (issue.title().to_string(), issue.position().value()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Low".to_owned(), 1000.0),
            ("Mover".to_owned(), 2000.0),
            ("High".to_owned(), 3000.0),
        ]
    );
    Ok(())
}
