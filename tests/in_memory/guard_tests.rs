//! Deletion-guard tests, including races against issue moves.

use std::sync::Arc;

use crate::in_memory::helpers::{Tracker, tracker};
use rstest::rstest;
use ticketry::issue::services::{CreateIssueRequest, UpdatePositionRequest};
use ticketry::workflow::{
    domain::{GuardViolation, StateKind},
    services::{CreateStateRequest, WorkflowLifecycleError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn state_becomes_deletable_once_emptied(tracker: Tracker) -> eyre::Result<()> {
    let eng = tracker.provision("ENG").await?;
    let review = tracker
        .workflow
        .create_state(eng.team.id(), CreateStateRequest::new("Review", StateKind::Started))
        .await?;
    let issue = tracker
        .issues
        .create_issue(CreateIssueRequest::new(eng.team.id(), "Audit", review.id()))
        .await?;

    let refused = tracker.workflow.delete_state(review.id()).await;
    assert!(matches!(
        refused,
        Err(WorkflowLifecycleError::Rejected(GuardViolation::StillReferenced { .. }))
    ));

    tracker
        .issues
        .update_position(
            issue.id(),
            UpdatePositionRequest::new(1000.0).with_status(eng.state(StateKind::Started)?),
        )
        .await?;
    tracker.workflow.delete_state(review.id()).await?;

    let remaining = tracker.workflow.list_states(eng.team.id()).await?;
    assert_eq!(remaining.len(), 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_kind_survives_deletion_attempts(tracker: Tracker) -> eyre::Result<()> {
    let eng = tracker.provision("ENG").await?;

    for kind in StateKind::ALL {
        let result = tracker.workflow.delete_state(eng.state(kind)?).await;
        assert!(
            matches!(
                result,
                Err(WorkflowLifecycleError::Rejected(GuardViolation::LastOfKind { .. }))
            ),
            "{kind} state should be protected"
        );
    }
    assert_eq!(tracker.workflow.list_states(eng.team.id()).await?.len(), 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_move_and_delete_never_orphan_an_issue(tracker: Tracker) -> eyre::Result<()> {
    let eng = tracker.provision("ENG").await?;
    for round in 0..20 {
        let review = tracker
            .workflow
            .create_state(
                eng.team.id(),
                CreateStateRequest::new(format!("Review {round}"), StateKind::Started),
            )
            .await?;
        let issue = tracker
            .issues
            .create_issue(CreateIssueRequest::new(
                eng.team.id(),
                format!("Race {round}"),
                eng.state(StateKind::Backlog)?,
            ))
            .await?;

        let issues = Arc::clone(&tracker.issues);
        let workflow = Arc::clone(&tracker.workflow);
        let target = review.id();
        let issue_id = issue.id();
        let mover = tokio::spawn(async move {
            issues
                .update_position(issue_id, UpdatePositionRequest::new(1.0).with_status(target))
                .await
        });
        let deleter = tokio::spawn(async move { workflow.delete_state(target).await });
        let moved = mover.await?;
        let deleted = deleter.await?;

        eyre::ensure!(
            !(moved.is_ok() && deleted.is_ok()),
            "round {round}: issue moved into a state that was deleted"
        );
        let stored = tracker.issues.get_issue(issue_id).await?;
        let status_exists = tracker.workflow.get_state(stored.status_id()).await.is_ok();
        eyre::ensure!(status_exists, "round {round}: issue status no longer exists");
    }
    Ok(())
}
