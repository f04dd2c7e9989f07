//! Identity data model.
//!
//! Identities are owned by an external account subsystem; this core only
//! reads their id, the stored refresh-token slot, and the display attributes
//! used when enriching relationship views. Ids therefore stay opaque strings
//! rather than assuming any particular shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdValidationError {
    Empty,
    SurroundingWhitespace,
}

impl fmt::Display for UserIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "user id must not be empty"),
            Self::SurroundingWhitespace => {
                write!(f, "user id must not contain surrounding whitespace")
            }
        }
    }
}

impl std::error::Error for UserIdValidationError {}

/// Opaque identifier referencing an identity in the external account store.
///
/// ## Invariants
/// - Non-empty.
/// - No leading or trailing whitespace.
///
/// # Examples
/// ```
/// use amity::domain::UserId;
///
/// let id = UserId::new("u1").expect("valid id");
/// assert_eq!(id.as_ref(), "u1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "64f0c3e2a8b4c91d2f6e7a01")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a fresh random [`UserId`] for fixtures and tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserIdValidationError> {
        if id.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(UserIdValidationError::SurroundingWhitespace);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Authentication view of an identity.
///
/// Only the fields this core reads: the id resolved from token claims and
/// the currently valid refresh-token value. The slot is overwritten by login
/// elsewhere in the system; the refresh guard only compares against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub refresh_token: Option<String>,
}

impl Identity {
    /// Construct an identity with no refresh token on record.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            refresh_token: None,
        }
    }

    /// Attach the currently valid refresh-token value.
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }
}

/// Display attributes fetched when enriching relationship views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProfile {
    pub id: UserId,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Avatar URL, when one has been uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl IdentityProfile {
    /// Construct a profile with the mandatory name fields.
    pub fn new(id: UserId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            image: None,
            gender: None,
        }
    }

    /// Attach an avatar URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Attach a gender attribute.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}
