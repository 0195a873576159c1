//! Postgres table schemas and the startup migration.
//!
//! Every statement is idempotent (`IF NOT EXISTS`), so the migration can run
//! against an empty database or one created by an older release that lacks
//! the `ip_address` / `updated_at` columns.

use crate::client::PgClient;
use brutal_core::{Error, Result};
use tracing::{debug, info};

/// Waitlist signups. Emails are stored lower-cased.
pub const CREATE_WAITLIST_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS waitlist (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email TEXT UNIQUE NOT NULL CHECK (length(email) > 0 AND length(email) <= 254),
    name TEXT CHECK (name IS NULL OR (length(name) > 0 AND length(name) <= 100)),
    ip_address INET,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
    updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
)
"#;

/// Columns added after the first release of the waitlist table.
pub const ALTER_WAITLIST_ADD_IP_ADDRESS: &str =
    "ALTER TABLE waitlist ADD COLUMN IF NOT EXISTS ip_address INET";

pub const ALTER_WAITLIST_ADD_UPDATED_AT: &str =
    "ALTER TABLE waitlist ADD COLUMN IF NOT EXISTS updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()";

/// Case-insensitive uniqueness, even for rows written before emails were
/// normalized.
pub const CREATE_WAITLIST_EMAIL_LOWER_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_waitlist_email_lower ON waitlist (lower(email))";

pub const CREATE_WAITLIST_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_waitlist_email ON waitlist (email)",
    "CREATE INDEX IF NOT EXISTS idx_waitlist_created_at ON waitlist (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_waitlist_ip_address ON waitlist (ip_address)",
];

/// Feedback form submissions.
pub const CREATE_FEEDBACK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT,
    email TEXT,
    ideas TEXT,
    views TEXT,
    suggestions TEXT,
    wants TEXT,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
)
"#;

/// Review form submissions.
pub const CREATE_REVIEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT,
    email TEXT,
    review TEXT,
    idea_opinion TEXT,
    suggestion TEXT,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
)
"#;

/// All migration statements in execution order.
pub fn all_statements() -> Vec<&'static str> {
    let mut statements = vec![
        CREATE_WAITLIST_TABLE,
        ALTER_WAITLIST_ADD_IP_ADDRESS,
        ALTER_WAITLIST_ADD_UPDATED_AT,
        CREATE_WAITLIST_EMAIL_LOWER_INDEX,
    ];
    statements.extend(CREATE_WAITLIST_INDEXES);
    statements.push(CREATE_FEEDBACK_TABLE);
    statements.push(CREATE_REVIEWS_TABLE);
    statements
}

/// Run every migration statement. Each statement is its own atomic
/// operation; there is no wrapping transaction.
pub async fn init_schema(client: &PgClient) -> Result<()> {
    let statements = all_statements();

    for ddl in &statements {
        sqlx::query(ddl)
            .execute(client.pool())
            .await
            .map_err(|e| Error::schema_setup(format!("Failed to execute DDL: {}", e)))?;
    }

    debug!(statements = statements.len(), "Executed schema statements");
    info!("Postgres schema initialized");
    Ok(())
}
