//! Periodic cleanup of dead sessions and lapsed invitations.
//!
//! Deletes revoked or expired `user_sessions` rows and clears invitation
//! tokens that expired without being accepted. The pending family user row
//! itself is kept so a new memorial can re-invite the same email.

use std::time::Duration;

use lembranca_db::repositories::{FamilyUserRepo, SessionRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Rows touched by one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub sessions_deleted: u64,
    pub invitations_cleared: u64,
}

/// One cleanup pass.
pub async fn run_once(pool: &PgPool) -> Result<CleanupReport, sqlx::Error> {
    let sessions_deleted = SessionRepo::cleanup_expired(pool).await?;
    let invitations_cleared = FamilyUserRepo::clear_expired_invitations(pool).await?;
    Ok(CleanupReport {
        sessions_deleted,
        invitations_cleared,
    })
}

/// Run the cleanup loop every `every` until `cancel` is triggered.
pub async fn run(pool: PgPool, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Session cleanup job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&pool).await {
                    Ok(report) if report != CleanupReport::default() => {
                        tracing::info!(
                            sessions_deleted = report.sessions_deleted,
                            invitations_cleared = report.invitations_cleared,
                            "Session cleanup: purged rows"
                        );
                    }
                    Ok(_) => tracing::debug!("Session cleanup: nothing to purge"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
