//! Handlers for the `/auth` resource.
//!
//! Three account kinds live in three tables; the JWT `role` claim says
//! which table `sub` points into. Every successful login, invitation
//! acceptance or refresh creates a fresh `user_sessions` row.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use lembranca_core::error::CoreError;
use lembranca_core::invitation::{hash_invitation_token, is_expired};
use lembranca_core::roles::{ROLE_ADMIN, ROLE_FAMILY_USER, ROLE_FUNERAL_HOME};
use lembranca_core::types::DbId;
use lembranca_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_len, validate_password,
    MAX_NAME_LENGTH,
};
use lembranca_db::models::admin_user::AdminUser;
use lembranca_db::models::family_user::{FamilyUser, UpdateFamilyUser};
use lembranca_db::models::funeral_home::{
    CreateFuneralHome, FuneralHome, FuneralHomeResponse, UpdateFuneralHome,
};
use lembranca_db::models::session::CreateSession;
use lembranca_db::repositories::{AdminUserRepo, FamilyUserRepo, FuneralHomeRepo, SessionRepo};
use lembranca_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum consecutive failed admin logins before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Admin lockout duration in minutes.
const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_INVITATION: &str = "Invalid or expired invitation";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterFuneralHomeRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Funeral homes only.
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Returned by every endpoint that issues tokens.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub account: AccountInfo,
}

/// Public view of the signed-in account.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// A row from one of the three account tables.
enum Account {
    Admin(AdminUser),
    FuneralHome(FuneralHome),
    Family(FamilyUser),
}

impl Account {
    async fn load(pool: &DbPool, role: &str, id: DbId) -> Result<Option<Self>, sqlx::Error> {
        Ok(match role {
            ROLE_ADMIN => AdminUserRepo::find_by_id(pool, id).await?.map(Account::Admin),
            ROLE_FUNERAL_HOME => FuneralHomeRepo::find_by_id(pool, id)
                .await?
                .map(Account::FuneralHome),
            ROLE_FAMILY_USER => FamilyUserRepo::find_by_id(pool, id).await?.map(Account::Family),
            _ => None,
        })
    }

    fn role(&self) -> &'static str {
        match self {
            Account::Admin(_) => ROLE_ADMIN,
            Account::FuneralHome(_) => ROLE_FUNERAL_HOME,
            Account::Family(_) => ROLE_FAMILY_USER,
        }
    }

    fn id(&self) -> DbId {
        match self {
            Account::Admin(a) => a.id,
            Account::FuneralHome(f) => f.id,
            Account::Family(f) => f.id,
        }
    }

    fn password_hash(&self) -> Option<&str> {
        match self {
            Account::Admin(a) => Some(&a.password_hash),
            Account::FuneralHome(f) => Some(&f.password_hash),
            Account::Family(f) => f.password_hash.as_deref(),
        }
    }

    /// Admins and family users can be inactive; funeral homes cannot.
    fn ensure_active(&self) -> AppResult<()> {
        let active = match self {
            Account::Admin(a) => a.is_active,
            Account::FuneralHome(_) => true,
            Account::Family(f) => f.is_active,
        };
        if active {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "Account is deactivated".into(),
            )))
        }
    }

    fn info(&self) -> AccountInfo {
        let role = self.role();
        match self {
            Account::Admin(a) => AccountInfo {
                id: a.id,
                name: a.name.clone(),
                email: a.email.clone(),
                role,
                phone: None,
                address: None,
            },
            Account::FuneralHome(f) => AccountInfo {
                id: f.id,
                name: f.name.clone(),
                email: f.email.clone(),
                role,
                phone: f.phone.clone(),
                address: f.address.clone(),
            },
            Account::Family(f) => AccountInfo {
                id: f.id,
                name: f.name.clone(),
                email: f.email.clone(),
                role,
                phone: f.phone.clone(),
                address: None,
            },
        }
    }
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
}

fn check_password(password: &str, hash: &str) -> AppResult<bool> {
    verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
}

fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password(password)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

fn validate_name(name: &str) -> AppResult<()> {
    require_non_empty("name", name)?;
    validate_max_len("name", name, MAX_NAME_LENGTH)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/funeral-homes/register
pub async fn register_funeral_home(
    State(state): State<AppState>,
    Json(input): Json<RegisterFuneralHomeRequest>,
) -> AppResult<(StatusCode, Json<FuneralHomeResponse>)> {
    validate_name(&input.name)?;
    validate_email(&input.email)?;
    let email = normalize_email(&input.email);

    if FuneralHomeRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already registered".into(),
        )));
    }

    let password_hash = hash_new_password(&input.password)?;
    let funeral_home = FuneralHomeRepo::create(
        &state.pool,
        &CreateFuneralHome {
            name: input.name.trim().to_string(),
            email,
            password_hash,
            phone: input.phone,
            address: input.address,
        },
    )
    .await?;

    tracing::info!(funeral_home_id = funeral_home.id, "Funeral home registered");
    Ok((StatusCode::CREATED, Json(funeral_home.into())))
}

/// POST /api/v1/auth/funeral-homes/login
pub async fn login_funeral_home(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let funeral_home = FuneralHomeRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid_credentials)?;

    if !check_password(&input.password, &funeral_home.password_hash)? {
        return Err(invalid_credentials());
    }

    let response = create_auth_response(&state, &Account::FuneralHome(funeral_home)).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/families/login
///
/// A family user who has not accepted the invitation has no password and is
/// rejected with the same message as a wrong password.
pub async fn login_family(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let family_user = FamilyUserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid_credentials)?;

    let Some(hash) = family_user.password_hash.as_deref().filter(|_| family_user.is_active) else {
        return Err(invalid_credentials());
    };
    if !check_password(&input.password, hash)? {
        return Err(invalid_credentials());
    }

    let response = create_auth_response(&state, &Account::Family(family_user)).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/admin/login
///
/// Locks the account for [`LOCK_DURATION_MINS`] after
/// [`MAX_FAILED_ATTEMPTS`] consecutive failures.
pub async fn login_admin(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let admin = AdminUserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid_credentials)?;

    if !admin.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = admin.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    if !check_password(&input.password, &admin.password_hash)? {
        let failed = AdminUserRepo::increment_failed_login(&state.pool, admin.id).await?;
        if failed >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            AdminUserRepo::lock_account(&state.pool, admin.id, lock_until).await?;
            tracing::warn!(admin_id = admin.id, failed, "Admin account locked");
        }
        return Err(invalid_credentials());
    }

    AdminUserRepo::record_successful_login(&state.pool, admin.id).await?;

    let response = create_auth_response(&state, &Account::Admin(admin)).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/families/accept-invitation
///
/// Sets the family user's password, activates the account and consumes the
/// invitation. The token is single-use.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(input): Json<AcceptInvitationRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_INVITATION.into()));

    let family_user =
        FamilyUserRepo::find_by_invitation_hash(&state.pool, &hash_invitation_token(&input.token))
            .await?
            .ok_or_else(invalid)?;

    if is_expired(family_user.invitation_expires_at, Utc::now()) {
        return Err(invalid());
    }

    let password_hash = hash_new_password(&input.password)?;
    let family_user = FamilyUserRepo::accept_invitation(&state.pool, family_user.id, &password_hash)
        .await?
        .ok_or_else(invalid)?;

    tracing::info!(family_user_id = family_user.id, "Family invitation accepted");
    let response = create_auth_response(&state, &Account::Family(family_user)).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::consume_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let account = Account::load(&state.pool, &session.account_role, session.account_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;
    account.ensure_active()?;

    let response = create_auth_response(&state, &account).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions of the authenticated account. Returns 204.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked =
        SessionRepo::revoke_all_for_account(&state.pool, &auth_user.role, auth_user.account_id)
            .await?;
    tracing::debug!(account_id = auth_user.account_id, revoked, "Sessions revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<AccountInfo>> {
    let account = load_current(&state, &auth_user).await?;
    Ok(Json(account.info()))
}

/// PUT /api/v1/auth/profile
///
/// Admins can only change their name; `address` applies to funeral homes.
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<AccountInfo>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    let name = input.name.map(|n| n.trim().to_string());
    let id = auth_user.account_id;

    let updated = match auth_user.role.as_str() {
        ROLE_ADMIN => match name {
            Some(name) => AdminUserRepo::update_name(&state.pool, id, &name)
                .await?
                .map(Account::Admin),
            None => AdminUserRepo::find_by_id(&state.pool, id)
                .await?
                .map(Account::Admin),
        },
        ROLE_FUNERAL_HOME => FuneralHomeRepo::update(
            &state.pool,
            id,
            &UpdateFuneralHome {
                name,
                phone: input.phone,
                address: input.address,
            },
        )
        .await?
        .map(Account::FuneralHome),
        ROLE_FAMILY_USER => FamilyUserRepo::update(
            &state.pool,
            id,
            &UpdateFamilyUser {
                name,
                phone: input.phone,
            },
        )
        .await?
        .map(Account::Family),
        _ => None,
    };

    let account = updated.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
    })?;
    Ok(Json(account.info()))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let account = load_current(&state, &auth_user).await?;

    let current_ok = match account.password_hash() {
        Some(hash) => check_password(&input.current_password, hash)?,
        None => false,
    };
    if !current_ok {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_new_password(&input.new_password)?;
    let id = account.id();
    match &account {
        Account::Admin(_) => AdminUserRepo::update_password(&state.pool, id, &new_hash).await?,
        Account::FuneralHome(_) => {
            FuneralHomeRepo::update_password(&state.pool, id, &new_hash).await?
        }
        Account::Family(_) => FamilyUserRepo::update_password(&state.pool, id, &new_hash).await?,
    };

    tracing::info!(account_id = id, role = %auth_user.role, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_current(state: &AppState, auth_user: &AuthUser) -> AppResult<Account> {
    Account::load(&state.pool, &auth_user.role, auth_user.account_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))
}

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(state: &AppState, account: &Account) -> AppResult<AuthResponse> {
    let role = account.role();
    let access_token = generate_access_token(account.id(), role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            account_role: role.to_string(),
            account_id: account.id(),
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        account: account.info(),
    })
}
