//! Repository for the `memorials` table.

use lembranca_core::status::{MemorialStatus, OrderPriority, StatusId};
use lembranca_core::types::DbId;
use lembranca_core::validation::VISIBILITY_PUBLIC;
use sqlx::PgPool;

use crate::models::family_user::FamilyInvitation;
use crate::models::memorial::{
    CreateMemorial, CreatedMemorial, Memorial, MemorialDetail, MemorialFilter, MemorialWithCounts,
    UpdateMemorial,
};
use crate::models::order::CreateOrder;
use crate::repositories::{DedicationRepo, DescendantRepo, FamilyUserRepo, OrderRepo, PhotoRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, full_name, birth_date, death_date, birthplace, filiation, \
                        biography, main_photo, visibility, status_id, is_historical, category, \
                        grave_location, funeral_home_id, family_user_id, created_at, updated_at";

/// Same columns qualified with the `m` alias for joined queries.
const M_COLUMNS: &str = "m.id, m.slug, m.full_name, m.birth_date, m.death_date, m.birthplace, \
                          m.filiation, m.biography, m.main_photo, m.visibility, m.status_id, \
                          m.is_historical, m.category, m.grave_location, m.funeral_home_id, \
                          m.family_user_id, m.created_at, m.updated_at";

/// Provides CRUD operations for memorials.
pub struct MemorialRepo;

impl MemorialRepo {
    /// Create a memorial together with its production order, and the
    /// invited family user when one is given, in a single transaction.
    ///
    /// When an invitation is written, `input.family_user_id` is replaced by
    /// the id of the invited user.
    pub async fn create_with_order(
        pool: &PgPool,
        input: &CreateMemorial,
        invitation: Option<&FamilyInvitation>,
        changed_by: Option<&str>,
    ) -> Result<CreatedMemorial, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let invited_family_user = match invitation {
            Some(FamilyInvitation::New(pending)) => {
                Some(FamilyUserRepo::create_pending_in_tx(&mut tx, pending).await?)
            }
            Some(FamilyInvitation::Reissue(reissue)) => {
                FamilyUserRepo::reissue_invitation_in_tx(&mut tx, reissue).await?
            }
            None => None,
        };
        let family_user_id = invited_family_user
            .as_ref()
            .map(|u| u.id)
            .or(input.family_user_id);

        let query = format!(
            "INSERT INTO memorials
                (slug, full_name, birth_date, death_date, birthplace, filiation, biography,
                 main_photo, visibility, status_id, is_historical, category, grave_location,
                 funeral_home_id, family_user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        let memorial = sqlx::query_as::<_, Memorial>(&query)
            .bind(&input.slug)
            .bind(&input.full_name)
            .bind(input.birth_date)
            .bind(input.death_date)
            .bind(&input.birthplace)
            .bind(&input.filiation)
            .bind(&input.biography)
            .bind(&input.main_photo)
            .bind(&input.visibility)
            .bind(input.status_id)
            .bind(input.is_historical)
            .bind(&input.category)
            .bind(&input.grave_location)
            .bind(input.funeral_home_id)
            .bind(family_user_id)
            .fetch_one(&mut *tx)
            .await?;

        let order = OrderRepo::create_in_tx(
            &mut tx,
            &CreateOrder {
                memorial_id: memorial.id,
                funeral_home_id: memorial.funeral_home_id,
                family_user_id,
                priority_id: OrderPriority::Normal.id(),
                notes: None,
                estimated_delivery: None,
            },
            changed_by,
        )
        .await?;

        tx.commit().await?;
        Ok(CreatedMemorial {
            memorial,
            invited_family_user,
            order,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Memorial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM memorials WHERE id = $1");
        sqlx::query_as::<_, Memorial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Memorial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM memorials WHERE slug = $1");
        sqlx::query_as::<_, Memorial>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any memorial (in any status) already uses `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM memorials WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// List memorials with photo and dedication counts, newest first.
    pub async fn list_with_counts(
        pool: &PgPool,
        filter: MemorialFilter,
    ) -> Result<Vec<MemorialWithCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {M_COLUMNS},
                    (SELECT COUNT(*) FROM photos p WHERE p.memorial_id = m.id) AS photo_count,
                    (SELECT COUNT(*) FROM dedications d WHERE d.memorial_id = m.id)
                        AS dedication_count
             FROM memorials m
             WHERE ($1::BIGINT IS NULL OR m.funeral_home_id = $1)
               AND ($2::BIGINT IS NULL OR m.family_user_id = $2)
             ORDER BY m.created_at DESC, m.id DESC"
        );
        sqlx::query_as::<_, MemorialWithCounts>(&query)
            .bind(filter.funeral_home_id)
            .bind(filter.family_user_id)
            .fetch_all(pool)
            .await
    }

    /// Active public memorials, optionally restricted to (non-)historical
    /// ones, newest first.
    pub async fn list_public(
        pool: &PgPool,
        historical: Option<bool>,
    ) -> Result<Vec<Memorial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM memorials
             WHERE visibility = $1
               AND status_id = $2
               AND ($3::BOOLEAN IS NULL OR is_historical = $3)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Memorial>(&query)
            .bind(VISIBILITY_PUBLIC)
            .bind(MemorialStatus::Active.id())
            .bind(historical)
            .fetch_all(pool)
            .await
    }

    /// Update a memorial. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMemorial,
    ) -> Result<Option<Memorial>, sqlx::Error> {
        let query = format!(
            "UPDATE memorials SET
                full_name = COALESCE($2, full_name),
                birth_date = COALESCE($3, birth_date),
                death_date = COALESCE($4, death_date),
                birthplace = COALESCE($5, birthplace),
                filiation = COALESCE($6, filiation),
                biography = COALESCE($7, biography),
                main_photo = COALESCE($8, main_photo),
                visibility = COALESCE($9, visibility),
                status_id = COALESCE($10, status_id),
                is_historical = COALESCE($11, is_historical),
                category = COALESCE($12, category),
                grave_location = COALESCE($13, grave_location)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Memorial>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(input.birth_date)
            .bind(input.death_date)
            .bind(&input.birthplace)
            .bind(&input.filiation)
            .bind(&input.biography)
            .bind(&input.main_photo)
            .bind(&input.visibility)
            .bind(input.status_id)
            .bind(input.is_historical)
            .bind(&input.category)
            .bind(&input.grave_location)
            .fetch_optional(pool)
            .await
    }

    /// Set the status, returning the updated row.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status_id: StatusId,
    ) -> Result<Option<Memorial>, sqlx::Error> {
        let query = format!("UPDATE memorials SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Memorial>(&query)
            .bind(id)
            .bind(status_id)
            .fetch_optional(pool)
            .await
    }

    /// Load descendants, photos and dedications for a memorial.
    pub async fn load_detail(pool: &PgPool, memorial: Memorial) -> Result<MemorialDetail, sqlx::Error> {
        let descendants = DescendantRepo::list_by_memorial(pool, memorial.id).await?;
        let photos = PhotoRepo::list_by_memorial(pool, memorial.id).await?;
        let dedications = DedicationRepo::list_by_memorial(pool, memorial.id).await?;
        Ok(MemorialDetail {
            memorial,
            descendants,
            photos,
            dedications,
        })
    }
}
