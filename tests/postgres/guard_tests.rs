//! Deletion guards against `PostgreSQL`.

use std::sync::Arc;

use crate::postgres::helpers::pg_tracker;
use ticketry::issue::services::{CreateIssueRequest, UpdatePositionRequest};
use ticketry::workflow::{
    domain::{GuardViolation, StateKind},
    services::{CreateStateRequest, WorkflowLifecycleError},
};

#[tokio::test(flavor = "multi_thread")]
async fn referenced_and_last_states_are_kept() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let eng = tracker.provision("ENG").await?;
    let backlog = eng.state(StateKind::Backlog)?;
    tracker
        .issues
        .create_issue(CreateIssueRequest::new(eng.team.id(), "Pinned", backlog))
        .await?;

    let referenced = tracker.workflow.delete_state(backlog).await;
    assert!(matches!(
        referenced,
        Err(WorkflowLifecycleError::Rejected(GuardViolation::StillReferenced { issue_count: 1, .. }))
    ));

    let last = tracker
        .workflow
        .delete_state(eng.state(StateKind::Canceled)?)
        .await;
    assert!(matches!(
        last,
        Err(WorkflowLifecycleError::Rejected(GuardViolation::LastOfKind { .. }))
    ));
    assert_eq!(tracker.count_rows("workflow_states")?, 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_move_and_delete_never_orphan_an_issue() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let eng = tracker.provision("ENG").await?;
    for round in 0..10 {
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
        eyre::ensure!(
            tracker.workflow.get_state(stored.status_id()).await.is_ok(),
            "round {round}: issue status no longer exists"
        );
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn state_positions_default_after_current_maximum() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let eng = tracker.provision("ENG").await?;

    let appended = tracker
        .workflow
        .create_state(eng.team.id(), CreateStateRequest::new("Later", StateKind::Backlog))
        .await?;
    let duplicate = tracker
        .workflow
        .create_state(eng.team.id(), CreateStateRequest::new("LATER", StateKind::Backlog))
        .await;

    assert_eq!(appended.position().value(), 6000.0);
    assert!(duplicate.is_err_and(|err| err.is_client_fault()));
    Ok(())
}
