//! Workflow-state templates applied when a team is provisioned.

use super::TeamDomainError;
use crate::position::Position;
use crate::workflow::domain::StateKind;

/// One workflow state to create during provisioning.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTemplate {
    /// Display name of the state.
    pub name: String,
    /// Lifecycle bucket of the state.
    pub kind: StateKind,
    /// Hex colour of the state.
    pub color: String,
    /// Sort key of the state within the team.
    pub position: Position,
}

impl StateTemplate {
    /// Creates a template entry.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: StateKind,
        color: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            color: color.into(),
            position,
        }
    }
}

/// Ordered set of states covering every [`StateKind`] exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningTemplate {
    entries: Vec<StateTemplate>,
}

impl ProvisioningTemplate {
    /// Creates a template from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::DuplicateTemplateKind`] when a kind appears
    /// twice or [`TeamDomainError::MissingTemplateKind`] when a kind has no
    /// entry.
    pub fn new(entries: Vec<StateTemplate>) -> Result<Self, TeamDomainError> {
        for (index, entry) in entries.iter().enumerate() {
            let repeated = entries
                .iter()
                .skip(index + 1)
                .any(|other| other.kind == entry.kind);
            if repeated {
                return Err(TeamDomainError::DuplicateTemplateKind(entry.kind));
            }
        }
        if let Some(missing) = StateKind::ALL
            .into_iter()
            .find(|kind| entries.iter().all(|entry| entry.kind != *kind))
        {
            return Err(TeamDomainError::MissingTemplateKind(missing));
        }
        Ok(Self { entries })
    }

    /// Returns the built-in five-state template.
    ///
    /// Positions are spaced 1000 apart so later states can be inserted
    /// between them.
    #[must_use]
    pub fn canonical() -> Self {
        let entries = [
            ("Backlog", StateKind::Backlog, "#bec2c8"),
            ("Todo", StateKind::Unstarted, "#e2e2e2"),
            ("In Progress", StateKind::Started, "#f2c94c"),
            ("Done", StateKind::Completed, "#5e6ad2"),
            ("Canceled", StateKind::Canceled, "#9aa5b1"),
        ]
        .into_iter()
        .zip(1_u32..)
        .map(|((name, kind, color), slot)| {
            StateTemplate::new(name, kind, color, Position::for_slot(slot))
        })
        .collect();
        Self { entries }
    }

    /// Returns the template entries in provisioning order.
    #[must_use]
    pub fn entries(&self) -> &[StateTemplate] {
        &self.entries
    }
}

impl Default for ProvisioningTemplate {
    fn default() -> Self {
        Self::canonical()
    }
}
