//! Diesel schema for tracker persistence.

diesel::table! {
    /// Teams owning issue numbering and workflow states.
    teams (id) {
        /// Internal team identifier.
        id -> Uuid,
        /// Upper-case team key used in issue identifiers.
        #[max_length = 10]
        key -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Workflow states, the ordered columns of a team's board.
    workflow_states (id) {
        /// Internal state identifier.
        id -> Uuid,
        /// Owning team.
        team_id -> Uuid,
        /// Display name, unique per team ignoring case.
        #[max_length = 100]
        name -> Varchar,
        /// One of `backlog`, `unstarted`, `started`, `completed`, `canceled`.
        #[max_length = 20]
        kind -> Varchar,
        /// Hex colour.
        #[max_length = 7]
        color -> Varchar,
        /// Fractional sort key.
        position -> Float8,
        /// Optional description.
        description -> Nullable<Text>,
        /// Whether the state came from the provisioning template.
        is_default -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issues with team-scoped numbers.
    issues (id) {
        /// Internal issue identifier.
        id -> Uuid,
        /// Owning team.
        team_id -> Uuid,
        /// Team-scoped sequential number.
        number -> Int4,
        /// Title.
        #[max_length = 500]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Current workflow state.
        status_id -> Uuid,
        /// Priority level, 0 through 4.
        priority -> Int2,
        /// Optional assignee.
        assignee_id -> Nullable<Uuid>,
        /// Optional project.
        project_id -> Nullable<Uuid>,
        /// Optional creator.
        created_by -> Nullable<Uuid>,
        /// Fractional sort key within the status.
        position -> Float8,
        /// Set while the issue sits in a completed state.
        completed_at -> Nullable<Timestamptz>,
        /// Set while the issue sits in a canceled state.
        cancelled_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(workflow_states -> teams (team_id));
diesel::joinable!(issues -> teams (team_id));
diesel::joinable!(issues -> workflow_states (status_id));

diesel::allow_tables_to_appear_in_same_query!(teams, workflow_states, issues);
