//! Embedded schema migration.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::result::QueryResult;

const CREATE_TRACKER_TABLES: &str =
    include_str!("../../../migrations/2026-10-01-000000_create_tracker_tables/up.sql");

/// Creates the tracker tables, indexes, and constraints.
///
/// Every statement is guarded with `IF NOT EXISTS`, so applying the schema to
/// an already migrated database is a no-op.
///
/// # Errors
///
/// Returns the database error when a statement fails.
pub fn apply_schema(connection: &mut PgConnection) -> QueryResult<()> {
    connection.batch_execute(CREATE_TRACKER_TABLES)
}
