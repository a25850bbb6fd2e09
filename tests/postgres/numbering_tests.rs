//! Issue numbering against `PostgreSQL`.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::postgres::helpers::pg_tracker;
use ticketry::issue::services::{CreateIssueRequest, UpdatePositionRequest};
use ticketry::workflow::domain::StateKind;
use tokio::task::JoinSet;

const WRITERS: u32 = 24;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_get_distinct_gapless_numbers() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let eng = tracker.provision("ENG").await?;
    let backlog = eng.state(StateKind::Backlog)?;

    let mut writers = JoinSet::new();
    for writer in 0..WRITERS {
        let issues = Arc::clone(&tracker.issues);
        let request = CreateIssueRequest::new(eng.team.id(), format!("Issue {writer}"), backlog);
        writers.spawn(async move { issues.create_issue(request).await });
    }
    let mut numbers = BTreeSet::new();
    while let Some(joined) = writers.join_next().await {
        numbers.insert(joined??.number().value());
    }

    let expected: BTreeSet<u32> = (1..=WRITERS).collect();
    eyre::ensure!(numbers == expected, "numbers were {numbers:?}");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn numbers_survive_moves_and_reloads() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let eng = tracker.provision("ENG").await?;
    let backlog = eng.state(StateKind::Backlog)?;
    let done = eng.state(StateKind::Completed)?;

    let created = tracker
        .issues
        .create_issue(
            CreateIssueRequest::new(eng.team.id(), "Persist me", backlog)
                .with_priority(1)
                .with_description("Round trip"),
        )
        .await?;
    assert_eq!(created.position().value(), 1000.0);

    let moved = tracker
        .issues
        .update_position(created.id(), UpdatePositionRequest::new(250.0).with_status(done))
        .await?;
    let reloaded = tracker
        .issues
        .find_by_number(eng.team.id(), 1)
        .await?
        .ok_or_else(|| eyre::eyre!("issue 1 should exist"))?;

    assert_eq!(reloaded.id(), created.id());
    assert_eq!(reloaded.status_id(), done);
    assert_eq!(reloaded.position().value(), 250.0);
    assert_eq!(reloaded.priority(), created.priority());
    assert_eq!(reloaded.description(), Some("Round trip"));
    assert_eq!(
        reloaded.completed_at().map(|at| at.timestamp_micros()),
        moved.completed_at().map(|at| at.timestamp_micros())
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn renormalising_respaces_in_order() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let eng = tracker.provision("ENG").await?;
    let backlog = eng.state(StateKind::Backlog)?;
    for (title, position) in [("A", 3.0), ("B", 1.0), ("C", 2.0)] {
        tracker
            .issues
            .create_issue(
                CreateIssueRequest::new(eng.team.id(), title, backlog).with_position(position),
            )
            .await?;
    }

    let rewritten = tracker
        .issues
        .renormalize_positions(eng.team.id(), backlog)
        .await?;
    let listed: Vec<(String, f64)> = tracker
        .issues
        .list_issues_in_status(eng.team.id(), backlog)
        .await?
        .iter()
        .map(|issue| (issue.title().to_string(), issue.position().value()))
        .collect();

    assert_eq!(rewritten, 3);
    assert_eq!(
        listed,
        vec![
            ("B".to_owned(), 1000.0),
            ("C".to_owned(), 2000.0),
            ("A".to_owned(), 3000.0),
        ]
    );
    Ok(())
}
