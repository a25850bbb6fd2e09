//! Team provisioning against `PostgreSQL`.

use std::sync::Arc;

use crate::postgres::helpers::pg_tracker;
use ticketry::position::Position;
use ticketry::team::{
    domain::{ProvisioningTemplate, StateTemplate},
    services::{CreateTeamRequest, TeamProvisioningService},
};
use ticketry::workflow::{domain::StateKind, services::WorkflowLifecycleService};
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread")]
async fn team_is_created_with_canonical_states() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let eng = tracker.provision("eng").await?;

    let states = tracker.workflow.list_states(eng.team.id()).await?;
    let summary: Vec<(String, f64, bool)> = states
        .iter()
        .map(|state| {
            (
                state.name().to_string(),
                state.position().value(),
                state.is_default(),
            )
        })
        .collect();

    assert_eq!(eng.team.key().as_str(), "ENG");
    assert_eq!(
        summary,
        vec![
            ("Backlog".to_owned(), 1000.0, true),
            ("Todo".to_owned(), 2000.0, true),
            ("In Progress".to_owned(), 3000.0, true),
            ("Done".to_owned(), 4000.0, true),
            ("Canceled".to_owned(), 5000.0, true),
        ]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_provisioning_leaves_nothing_behind() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let template = ProvisioningTemplate::new(vec![
        StateTemplate::new("Backlog", StateKind::Backlog, "#bec2c8", Position::for_slot(1)),
        StateTemplate::new("Todo", StateKind::Unstarted, "#e2e2e2", Position::for_slot(2)),
        StateTemplate::new("BACKLOG", StateKind::Started, "#f2c94c", Position::for_slot(3)),
        StateTemplate::new("Done", StateKind::Completed, "#5e6ad2", Position::for_slot(4)),
        StateTemplate::new("Canceled", StateKind::Canceled, "#9aa5b1", Position::for_slot(5)),
    ])?;
    let store = Arc::new(ticketry::storage::postgres::PostgresTrackerStore::new(
        tracker.pool.clone(),
    ));
    let clock = Arc::new(mockable::DefaultClock);
    let workflow = WorkflowLifecycleService::new(Arc::clone(&store), Arc::clone(&clock));
    let failing = TeamProvisioningService::new(store, workflow, clock).with_template(template);

    let result = failing
        .create_team(CreateTeamRequest::new("OPS", "Operations"))
        .await;

    eyre::ensure!(result.is_err(), "duplicate state name should abort creation");
    assert_eq!(tracker.count_rows("teams")?, 0);
    assert_eq!(tracker.count_rows("workflow_states")?, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_racing_creation_claims_a_key() -> eyre::Result<()> {
    let tracker = pg_tracker().await?;
    let mut creators = JoinSet::new();
    for attempt in 0..6 {
        let teams = Arc::clone(&tracker.teams);
        creators.spawn(async move {
            teams
                .create_team(CreateTeamRequest::new("ENG", format!("Engineering {attempt}")))
                .await
        });
    }

    let mut winners = 0_u32;
    while let Some(joined) = creators.join_next().await {
        match joined? {
            Ok(_) => winners += 1,
            Err(err) => eyre::ensure!(err.is_client_fault(), "unexpected failure: {err}"),
        }
    }

    eyre::ensure!(winners == 1, "{winners} creations succeeded");
    assert_eq!(tracker.count_rows("teams")?, 1);
    assert_eq!(tracker.count_rows("workflow_states")?, 5);
    Ok(())
}
