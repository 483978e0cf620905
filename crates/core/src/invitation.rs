//! Family invitation tokens.
//!
//! When a funeral home creates a memorial for a family email that has no
//! account yet, a pending family user is created together with a one-time
//! invitation token. The plaintext is handed back once; only its SHA-256
//! digest is stored.

use rand::Rng;

use crate::hashing::{hex_encode, sha256_hex};
use crate::types::Timestamp;

/// Random bytes per token (hex-encoded to 64 characters).
pub const TOKEN_BYTES: usize = 32;

/// Default invitation lifetime in days.
pub const DEFAULT_INVITATION_EXPIRY_DAYS: i64 = 7;

/// A freshly generated invitation.
#[derive(Debug, Clone)]
pub struct GeneratedInvitation {
    /// Sent to the family (link in an email or shown to the funeral home).
    pub plaintext: String,
    /// Stored in `family_users.invitation_token_hash`.
    pub hash: String,
    pub expires_at: Timestamp,
}

/// Generate a new invitation token valid for `expiry_days` from `now`.
pub fn generate_invitation(now: Timestamp, expiry_days: i64) -> GeneratedInvitation {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    let plaintext = hex_encode(bytes);
    let hash = hash_invitation_token(&plaintext);
    GeneratedInvitation {
        plaintext,
        hash,
        expires_at: now + chrono::Duration::days(expiry_days),
    }
}

/// Digest used to look up an invitation by the token a family presents.
pub fn hash_invitation_token(token: &str) -> String {
    sha256_hex(token.trim().as_bytes())
}

/// An invitation without an expiry never lapses.
pub fn is_expired(expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    expires_at.is_some_and(|exp| exp < now)
}
