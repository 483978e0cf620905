//! Tests for the startup admin bootstrap and the session cleanup job.

mod common;

use std::time::Duration;

use lembranca_api::background::session_cleanup;
use lembranca_api::bootstrap::ensure_bootstrap_admin;
use lembranca_api::config::BootstrapAdmin;
use lembranca_db::repositories::AdminUserRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

fn bootstrap_admin() -> BootstrapAdmin {
    BootstrapAdmin {
        email: "Root@Lembranca.test".to_string(),
        password: common::TEST_PASSWORD.to_string(),
        name: "Administrador".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_creates_first_admin_once(pool: PgPool) {
    assert!(ensure_bootstrap_admin(&pool, &bootstrap_admin()).await.unwrap());
    assert!(!ensure_bootstrap_admin(&pool, &bootstrap_admin()).await.unwrap());

    assert_eq!(AdminUserRepo::count(&pool).await.unwrap(), 1);
    let admin = AdminUserRepo::find_by_email(&pool, "root@lembranca.test")
        .await
        .unwrap();
    assert!(admin.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_skips_when_an_admin_exists(pool: PgPool) {
    common::create_admin(&pool, "existente@lembranca.test").await;

    assert!(!ensure_bootstrap_admin(&pool, &bootstrap_admin()).await.unwrap());
    assert!(AdminUserRepo::find_by_email(&pool, "root@lembranca.test")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cleanup_purges_revoked_sessions(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, app.clone()).await;
    common::post_auth(app, "/api/v1/auth/logout", &token).await;

    let report = session_cleanup::run_once(&pool).await.unwrap();
    assert_eq!(report.sessions_deleted, 1);
    assert_eq!(report.invitations_cleared, 0);

    let report = session_cleanup::run_once(&pool).await.unwrap();
    assert_eq!(report, session_cleanup::CleanupReport::default());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cleanup_loop_stops_on_cancel(pool: PgPool) {
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(session_cleanup::run(
        pool,
        Duration::from_secs(3600),
        cancel.clone(),
    ));

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("cleanup loop should stop")
        .unwrap();
}
