//! Signed claim tokens for session authentication.
//!
//! Access and refresh tokens are opaque strings of the form
//! `hex(payload) "." hex(tag)` where the payload is a JSON document carrying
//! the subject id and an absolute expiry, and the tag is an HMAC-SHA256 over
//! the payload. Signing is deterministic for a given secret and payload.
//! Verification is read-only; time is an explicit argument so callers inject
//! their clock.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Signing secret for one token family.
///
/// Access and refresh tokens use distinct secrets; both arrive via injected
/// configuration, never global state. The key material is zeroed on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap raw key material.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(Zeroizing::new(bytes.as_ref().to_vec()))
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.0).expect("HMAC accepts keys of any size")
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(redacted)")
    }
}

/// Claims embedded in a signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Identity the token authenticates.
    pub subject: UserId,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// Verification failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Malformed input or signature mismatch.
    #[error("token is not valid")]
    Invalid,
    /// Structurally sound and correctly signed, but past its expiry.
    #[error("token has expired")]
    Expired,
}

/// Wire shape of the signed payload.
#[derive(Deserialize)]
struct ClaimsDto {
    sub: String,
    exp: i64,
}

/// Issue a signed token for `subject` expiring `ttl` after `now`.
///
/// # Examples
/// ```
/// use amity::domain::token::{self, TokenSecret};
/// use amity::domain::UserId;
/// use chrono::{Duration, Utc};
///
/// let secret = TokenSecret::new("access-secret");
/// let subject = UserId::new("u1").expect("valid id");
/// let now = Utc::now();
/// let token = token::issue(&subject, &secret, Duration::minutes(15), now);
/// let claims = token::verify(&token, &secret, now).expect("token verifies");
/// assert_eq!(claims.subject, subject);
/// ```
pub fn issue(subject: &UserId, secret: &TokenSecret, ttl: Duration, now: DateTime<Utc>) -> String {
    // Two plain fields; serialisation cannot fail.
    let payload = serde_json::json!({
        "sub": subject.as_ref(),
        "exp": (now + ttl).timestamp(),
    })
    .to_string();
    let mut mac = secret.mac();
    mac.update(payload.as_bytes());
    let tag = mac.finalize().into_bytes();
    format!("{}.{}", hex::encode(payload.as_bytes()), hex::encode(tag))
}

/// Verify a token against `secret` at time `now` and return its claims.
///
/// Fails [`TokenError::Invalid`] on malformed input or a signature mismatch
/// (checked in constant time) and [`TokenError::Expired`] once `now` is past
/// the embedded expiry.
pub fn verify(
    token: &str,
    secret: &TokenSecret,
    now: DateTime<Utc>,
) -> Result<TokenClaims, TokenError> {
    let (payload_hex, tag_hex) = token.split_once('.').ok_or(TokenError::Invalid)?;
    let payload = hex::decode(payload_hex).map_err(|_| TokenError::Invalid)?;
    let tag = hex::decode(tag_hex).map_err(|_| TokenError::Invalid)?;

    let mut mac = secret.mac();
    mac.update(&payload);
    mac.verify_slice(&tag).map_err(|_| TokenError::Invalid)?;

    let dto: ClaimsDto = serde_json::from_slice(&payload).map_err(|_| TokenError::Invalid)?;
    let subject = UserId::new(&dto.sub).map_err(|_| TokenError::Invalid)?;
    let expires_at = DateTime::from_timestamp(dto.exp, 0).ok_or(TokenError::Invalid)?;
    if now > expires_at {
        return Err(TokenError::Expired);
    }
    Ok(TokenClaims {
        subject,
        expires_at,
    })
}
