//! Team creation races and provisioning atomicity.

use std::sync::Arc;

use crate::in_memory::helpers::{Tracker, tracker};
use rstest::rstest;
use ticketry::team::services::CreateTeamRequest;
use tokio::task::JoinSet;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_racing_creation_claims_a_key(tracker: Tracker) -> eyre::Result<()> {
    let mut creators = JoinSet::new();
    for attempt in 0..8 {
        let teams = Arc::clone(&tracker.teams);
        creators.spawn(async move {
            teams
                .create_team(CreateTeamRequest::new("ENG", format!("Engineering {attempt}")))
                .await
        });
    }

    let mut winners = Vec::new();
    while let Some(joined) = creators.join_next().await {
        match joined? {
            Ok(team) => winners.push(team),
            Err(err) => eyre::ensure!(err.is_client_fault(), "unexpected failure: {err}"),
        }
    }

    eyre::ensure!(winners.len() == 1, "{} creations succeeded", winners.len());
    let winner = winners
        .first()
        .ok_or_else(|| eyre::eyre!("no winning team"))?;
    let states = tracker.workflow.list_states(winner.id()).await?;
    eyre::ensure!(states.len() == 5, "winner has {} states", states.len());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provisioning_a_complete_team_is_idempotent(tracker: Tracker) -> eyre::Result<()> {
    let eng = tracker.provision("ENG").await?;

    let added = tracker.teams.provision_default_states(eng.team.id()).await?;

    assert!(added.is_empty());
    assert_eq!(tracker.workflow.list_states(eng.team.id()).await?.len(), 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resumes_add_each_kind_once(tracker: Tracker) -> eyre::Result<()> {
    for round in 0..200 {
        let team = tracker.bare_team(&format!("R{round}")).await?;
        let mut resumers = JoinSet::new();
        for _ in 0..3 {
            let teams = Arc::clone(&tracker.teams);
            let team_id = team.id();
            resumers.spawn(async move { teams.provision_default_states(team_id).await });
        }

        let mut added = 0;
        while let Some(joined) = resumers.join_next().await {
            added += joined??.len();
        }

        eyre::ensure!(added == 5, "round {round}: {added} states added");
        let states = tracker.workflow.list_states(team.id()).await?;
        eyre::ensure!(states.len() == 5, "round {round}: team has {} states", states.len());
    }
    Ok(())
}
