//! Integration tests for the repository layer against a real database:
//! - Memorial creation with its production order and invited family user
//! - Nested content, counts and cascade delete
//! - Unique and foreign key violations
//! - Order status transitions and history
//! - Session and invitation cleanup

use chrono::{Duration, NaiveDate, Utc};
use lembranca_core::status::{LeadStatus, MemorialStatus, OrderPriority, ProductionStatus};
use lembranca_db::models::dedication::CreateDedication;
use lembranca_db::models::descendant::CreateDescendant;
use lembranca_db::models::family_user::{
    CreatePendingFamilyUser, FamilyInvitation, ReissueInvitation,
};
use lembranca_db::models::funeral_home::CreateFuneralHome;
use lembranca_db::models::lead::{CreateLead, UpdateLead};
use lembranca_db::models::memorial::{CreateMemorial, MemorialFilter, UpdateMemorial};
use lembranca_db::models::order::{OrderFilter, StatusChange};
use lembranca_db::models::photo::{CreatePhoto, UpdatePhoto};
use lembranca_db::models::session::CreateSession;
use lembranca_db::repositories::{
    DedicationRepo, DescendantRepo, FamilyUserRepo, FuneralHomeRepo, LeadRepo, MemorialRepo,
    OrderRepo, PhotoRepo, SessionRepo, StatsRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn funeral_home(pool: &PgPool, email: &str) -> i64 {
    FuneralHomeRepo::create(
        pool,
        &CreateFuneralHome {
            name: "Funerária Paz".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$dummy".to_string(),
            phone: None,
            address: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_memorial(slug: &str, funeral_home_id: Option<i64>) -> CreateMemorial {
    CreateMemorial {
        slug: slug.to_string(),
        full_name: "Maria da Silva".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1940, 5, 1),
        death_date: NaiveDate::from_ymd_opt(2024, 8, 9),
        birthplace: Some("Recife".to_string()),
        filiation: None,
        biography: None,
        main_photo: None,
        visibility: "public".to_string(),
        status_id: MemorialStatus::PendingData.id(),
        is_historical: false,
        category: None,
        grave_location: None,
        funeral_home_id,
        family_user_id: None,
    }
}

fn is_constraint_violation(err: &sqlx::Error, code: &str, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some(code) && db.constraint() == Some(constraint)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Memorials
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_memorial_with_order_and_invitation(pool: PgPool) {
    let fh = funeral_home(&pool, "paz@example.com").await;
    let pending = CreatePendingFamilyUser {
        name: "Família Silva".to_string(),
        email: "familia@example.com".to_string(),
        invitation_token_hash: "a".repeat(64),
        invitation_expires_at: Utc::now() + Duration::days(7),
    };

    let created = MemorialRepo::create_with_order(
        &pool,
        &new_memorial("maria-da-silva-ab12", Some(fh)),
        Some(&FamilyInvitation::New(pending)),
        Some("paz@example.com"),
    )
    .await
    .unwrap();

    let family = created.invited_family_user.unwrap();
    assert!(!family.is_active);
    assert!(family.password_hash.is_none());
    assert_eq!(created.memorial.family_user_id, Some(family.id));
    assert_eq!(created.memorial.status_id, MemorialStatus::PendingData.id());

    assert_eq!(created.order.memorial_id, created.memorial.id);
    assert_eq!(created.order.production_status_id, ProductionStatus::New.id());
    assert_eq!(created.order.priority_id, OrderPriority::Normal.id());

    let history = OrderRepo::list_history(&pool, created.order.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].previous_status_id, None);
    assert_eq!(history[0].changed_by.as_deref(), Some("paz@example.com"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_memorial_insert_rolls_back_family_user(pool: PgPool) {
    let fh = funeral_home(&pool, "paz@example.com").await;
    MemorialRepo::create_with_order(&pool, &new_memorial("dup", Some(fh)), None, None)
        .await
        .unwrap();

    let pending = CreatePendingFamilyUser {
        name: "Outra Família".to_string(),
        email: "outra@example.com".to_string(),
        invitation_token_hash: "b".repeat(64),
        invitation_expires_at: Utc::now() + Duration::days(7),
    };
    let err = MemorialRepo::create_with_order(
        &pool,
        &new_memorial("dup", Some(fh)),
        Some(&FamilyInvitation::New(pending)),
        None,
    )
    .await
    .unwrap_err();
    assert!(is_constraint_violation(&err, "23505", "uq_memorials_slug"));

    let family = FamilyUserRepo::find_by_email(&pool, "outra@example.com").await.unwrap();
    assert!(family.is_none(), "family user insert must roll back");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_funeral_home_is_fk_violation(pool: PgPool) {
    let err = MemorialRepo::create_with_order(&pool, &new_memorial("x", Some(9999)), None, None)
        .await
        .unwrap_err();
    assert!(is_constraint_violation(&err, "23503", "fk_memorials_funeral_home"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_counts_and_filters(pool: PgPool) {
    let a = funeral_home(&pool, "a@example.com").await;
    let b = funeral_home(&pool, "b@example.com").await;
    let m1 = MemorialRepo::create_with_order(&pool, &new_memorial("m1", Some(a)), None, None)
        .await
        .unwrap()
        .memorial;
    MemorialRepo::create_with_order(&pool, &new_memorial("m2", Some(b)), None, None)
        .await
        .unwrap();

    for i in 0..3 {
        PhotoRepo::create(
            &pool,
            m1.id,
            &CreatePhoto { file_url: format!("https://cdn/{i}.jpg"), caption: None, sort_order: None },
        )
        .await
        .unwrap();
    }
    DedicationRepo::create(
        &pool,
        m1.id,
        &CreateDedication { author_name: "Ana".into(), message: "Saudades".into() },
    )
    .await
    .unwrap();

    let all = MemorialRepo::list_with_counts(&pool, MemorialFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_a = MemorialRepo::list_with_counts(
        &pool,
        MemorialFilter { funeral_home_id: Some(a), family_user_id: None },
    )
    .await
    .unwrap();
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].photo_count, 3);
    assert_eq!(only_a[0].dedication_count, 1);

    let json = serde_json::to_value(&only_a[0]).unwrap();
    assert_eq!(json["slug"], "m1");
    assert_eq!(json["photo_count"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_public_only_returns_active_public(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let mut ids = Vec::new();
    for slug in ["pub", "priv", "pending", "hist"] {
        let m = MemorialRepo::create_with_order(&pool, &new_memorial(slug, Some(fh)), None, None)
            .await
            .unwrap()
            .memorial;
        ids.push(m.id);
    }
    let activate = |visibility: &str, historical: bool| UpdateMemorial {
        visibility: Some(visibility.to_string()),
        status_id: Some(MemorialStatus::Active.id()),
        is_historical: Some(historical),
        ..Default::default()
    };
    MemorialRepo::update(&pool, ids[0], &activate("public", false)).await.unwrap();
    MemorialRepo::update(&pool, ids[1], &activate("private", false)).await.unwrap();
    MemorialRepo::update(&pool, ids[3], &activate("public", true)).await.unwrap();

    let public = MemorialRepo::list_public(&pool, None).await.unwrap();
    let slugs: Vec<_> = public.iter().map(|m| m.slug.as_str()).collect();
    assert_eq!(slugs, ["hist", "pub"]);

    let historical = MemorialRepo::list_public(&pool, Some(true)).await.unwrap();
    assert_eq!(historical.len(), 1);
    assert_eq!(historical[0].slug, "hist");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_ordering_and_cascade_delete(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let m = MemorialRepo::create_with_order(&pool, &new_memorial("m", Some(fh)), None, None)
        .await
        .unwrap()
        .memorial;

    let first = PhotoRepo::create(
        &pool,
        m.id,
        &CreatePhoto { file_url: "1.jpg".into(), caption: None, sort_order: None },
    )
    .await
    .unwrap();
    let second = PhotoRepo::create(
        &pool,
        m.id,
        &CreatePhoto { file_url: "2.jpg".into(), caption: None, sort_order: None },
    )
    .await
    .unwrap();
    assert_eq!(first.sort_order, 0);
    assert_eq!(second.sort_order, 1);

    // Move the second photo to the front.
    PhotoRepo::update(
        &pool,
        m.id,
        second.id,
        &UpdatePhoto { caption: Some("Capa".into()), sort_order: Some(-1) },
    )
    .await
    .unwrap()
    .unwrap();

    DescendantRepo::create(
        &pool,
        m.id,
        &CreateDescendant { name: "João".into(), relationship: "Filho".into() },
    )
    .await
    .unwrap();

    let detail = MemorialRepo::load_detail(&pool, m.clone()).await.unwrap();
    assert_eq!(detail.photos[0].id, second.id);
    assert_eq!(detail.photos[0].caption.as_deref(), Some("Capa"));
    assert_eq!(detail.descendants.len(), 1);

    sqlx::query("DELETE FROM memorials WHERE id = $1")
        .bind(m.id)
        .execute(&pool)
        .await
        .unwrap();
    assert!(PhotoRepo::list_by_memorial(&pool, m.id).await.unwrap().is_empty());
    assert!(DescendantRepo::list_by_memorial(&pool, m.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nested_delete_is_scoped_to_memorial(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let m1 = MemorialRepo::create_with_order(&pool, &new_memorial("m1", Some(fh)), None, None)
        .await
        .unwrap()
        .memorial;
    let m2 = MemorialRepo::create_with_order(&pool, &new_memorial("m2", Some(fh)), None, None)
        .await
        .unwrap()
        .memorial;
    let d = DescendantRepo::create(
        &pool,
        m1.id,
        &CreateDescendant { name: "Ana".into(), relationship: "Filha".into() },
    )
    .await
    .unwrap();

    assert!(!DescendantRepo::delete(&pool, m2.id, d.id).await.unwrap());
    assert!(DescendantRepo::delete(&pool, m1.id, d.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_transition_writes_history(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let order = MemorialRepo::create_with_order(&pool, &new_memorial("m", Some(fh)), None, None)
        .await
        .unwrap()
        .order;

    let moved = OrderRepo::transition_status(
        &pool,
        order.id,
        &StatusChange {
            from_status_id: ProductionStatus::New.id(),
            to_status_id: ProductionStatus::Delivered.id(),
            changed_by: Some("admin@example.com".into()),
            notes: Some("Entregue em mãos".into()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.production_status_id, ProductionStatus::Delivered.id());
    assert!(moved.delivered_at.is_some());

    let history = OrderRepo::list_history(&pool, order.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].previous_status_id, Some(ProductionStatus::New.id()));
    assert_eq!(history[1].new_status_id, ProductionStatus::Delivered.id());

    // A stale `from` status no longer matches.
    let stale = OrderRepo::transition_status(
        &pool,
        order.id,
        &StatusChange {
            from_status_id: ProductionStatus::New.id(),
            to_status_id: ProductionStatus::Ready.id(),
            changed_by: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    assert!(stale.is_none());
    assert_eq!(OrderRepo::list_history(&pool, order.id).await.unwrap().len(), 2);

    let delivered = OrderRepo::list(
        &pool,
        OrderFilter {
            production_status_id: Some(ProductionStatus::Delivered.id()),
            priority_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(delivered.len(), 1);
}

// ---------------------------------------------------------------------------
// Accounts, leads, sessions, stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_funeral_home_email(pool: PgPool) {
    funeral_home(&pool, "dup@example.com").await;
    let err = FuneralHomeRepo::create(
        &pool,
        &CreateFuneralHome {
            name: "Outra".into(),
            email: "dup@example.com".into(),
            password_hash: "x".into(),
            phone: None,
            address: None,
        },
    )
    .await
    .unwrap_err();
    assert!(is_constraint_violation(&err, "23505", "uq_funeral_homes_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_invitation_is_single_use(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let pending = CreatePendingFamilyUser {
        name: "Família".into(),
        email: "f@example.com".into(),
        invitation_token_hash: "c".repeat(64),
        invitation_expires_at: Utc::now() + Duration::days(7),
    };
    let family = MemorialRepo::create_with_order(
        &pool,
        &new_memorial("m", Some(fh)),
        Some(&FamilyInvitation::New(pending)),
        None,
    )
    .await
    .unwrap()
    .invited_family_user
    .unwrap();

    let found = FamilyUserRepo::find_by_invitation_hash(&pool, &"c".repeat(64))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, family.id);

    let accepted = FamilyUserRepo::accept_invitation(&pool, family.id, "$argon2id$hash")
        .await
        .unwrap()
        .unwrap();
    assert!(accepted.is_active);
    assert!(accepted.invitation_token_hash.is_none());

    assert!(FamilyUserRepo::accept_invitation(&pool, family.id, "again").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reissue_invitation_after_cleanup(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let pending = CreatePendingFamilyUser {
        name: "Família".into(),
        email: "f@example.com".into(),
        invitation_token_hash: "e".repeat(64),
        invitation_expires_at: Utc::now() - Duration::days(1),
    };
    let family = MemorialRepo::create_with_order(
        &pool,
        &new_memorial("m1", Some(fh)),
        Some(&FamilyInvitation::New(pending)),
        None,
    )
    .await
    .unwrap()
    .invited_family_user
    .unwrap();
    assert_eq!(FamilyUserRepo::clear_expired_invitations(&pool).await.unwrap(), 1);

    let reissue = FamilyInvitation::Reissue(ReissueInvitation {
        family_user_id: family.id,
        invitation_token_hash: "f".repeat(64),
        invitation_expires_at: Utc::now() + Duration::days(7),
    });
    let created = MemorialRepo::create_with_order(
        &pool,
        &new_memorial("m2", Some(fh)),
        Some(&reissue),
        None,
    )
    .await
    .unwrap();

    let reinvited = created.invited_family_user.unwrap();
    assert_eq!(reinvited.id, family.id);
    assert_eq!(created.memorial.family_user_id, Some(family.id));
    let found = FamilyUserRepo::find_by_invitation_hash(&pool, &"f".repeat(64))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, family.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reissue_skips_activated_user(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let pending = CreatePendingFamilyUser {
        name: "Família".into(),
        email: "f@example.com".into(),
        invitation_token_hash: "1".repeat(64),
        invitation_expires_at: Utc::now() + Duration::days(7),
    };
    let family = MemorialRepo::create_with_order(
        &pool,
        &new_memorial("m1", Some(fh)),
        Some(&FamilyInvitation::New(pending)),
        None,
    )
    .await
    .unwrap()
    .invited_family_user
    .unwrap();
    FamilyUserRepo::accept_invitation(&pool, family.id, "$argon2id$hash")
        .await
        .unwrap()
        .unwrap();

    let reissue = FamilyInvitation::Reissue(ReissueInvitation {
        family_user_id: family.id,
        invitation_token_hash: "2".repeat(64),
        invitation_expires_at: Utc::now() + Duration::days(7),
    });
    let mut input = new_memorial("m2", Some(fh));
    input.family_user_id = Some(family.id);
    let created = MemorialRepo::create_with_order(&pool, &input, Some(&reissue), None)
        .await
        .unwrap();

    assert!(created.invited_family_user.is_none());
    assert_eq!(created.memorial.family_user_id, Some(family.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cleanup_clears_expired_invitations_and_sessions(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let pending = CreatePendingFamilyUser {
        name: "Família".into(),
        email: "f@example.com".into(),
        invitation_token_hash: "d".repeat(64),
        invitation_expires_at: Utc::now() - Duration::days(1),
    };
    let invitation = FamilyInvitation::New(pending);
    MemorialRepo::create_with_order(&pool, &new_memorial("m", Some(fh)), Some(&invitation), None)
        .await
        .unwrap();

    assert_eq!(FamilyUserRepo::clear_expired_invitations(&pool).await.unwrap(), 1);
    assert!(FamilyUserRepo::find_by_invitation_hash(&pool, &"d".repeat(64))
        .await
        .unwrap()
        .is_none());

    SessionRepo::create(
        &pool,
        &CreateSession {
            account_role: "funeral_home".into(),
            account_id: fh,
            refresh_token_hash: "live".into(),
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            account_role: "funeral_home".into(),
            account_id: fh,
            refresh_token_hash: "expired".into(),
            expires_at: Utc::now() - Duration::hours(1),
        },
    )
    .await
    .unwrap();

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
    assert!(SessionRepo::consume_refresh_token(&pool, "expired").await.unwrap().is_none());

    assert_eq!(SessionRepo::revoke_all_for_account(&pool, "funeral_home", fh).await.unwrap(), 1);
    assert!(SessionRepo::consume_refresh_token(&pool, "live").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_token_is_consumed_once(pool: PgPool) {
    let fh = funeral_home(&pool, "a@example.com").await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            account_role: "funeral_home".into(),
            account_id: fh,
            refresh_token_hash: "once".into(),
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();

    let consumed = SessionRepo::consume_refresh_token(&pool, "once").await.unwrap().unwrap();
    assert_eq!(consumed.id, session.id);
    assert!(consumed.is_revoked);
    assert!(SessionRepo::consume_refresh_token(&pool, "once").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leads_and_dashboard_stats(pool: PgPool) {
    let lead = LeadRepo::create(
        &pool,
        &CreateLead {
            name: "Carlos".into(),
            email: "carlos@example.com".into(),
            phone: None,
            accept_emails: true,
            notes: None,
        },
    )
    .await
    .unwrap();
    LeadRepo::create(
        &pool,
        &CreateLead {
            name: "Bia".into(),
            email: "bia@example.com".into(),
            phone: None,
            accept_emails: false,
            notes: None,
        },
    )
    .await
    .unwrap();
    LeadRepo::update(
        &pool,
        lead.id,
        &UpdateLead {
            status_id: Some(LeadStatus::Contacted.id()),
            notes: Some("Ligou".into()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    let fh = funeral_home(&pool, "a@example.com").await;
    MemorialRepo::create_with_order(&pool, &new_memorial("m", Some(fh)), None, None)
        .await
        .unwrap();

    let stats = StatsRepo::dashboard(&pool).await.unwrap();
    assert_eq!(stats.leads.total, 2);
    assert_eq!(stats.leads.pending, 1);
    assert_eq!(stats.memorials.total, 1);
    assert_eq!(stats.memorials.pending, 1);
    assert_eq!(stats.memorials.active, 0);
    assert_eq!(stats.funeral_homes, 1);
    assert_eq!(stats.orders_by_status.len(), ProductionStatus::ALL.len());
    assert_eq!(stats.orders_by_status[0].count, 1);
}
