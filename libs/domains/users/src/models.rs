use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

/// User entity
///
/// `id` is nil and `created_at` is `None` until the record has been persisted.
/// `updated_at` stays `None` until the first successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,

    #[validate(length(min = 1, message = "first name must be provided"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "last name must be provided"))]
    pub last_name: String,

    #[validate(length(min = 1, message = "nickname must be provided"))]
    pub nickname: String,

    /// Stored as given; hashing is not this layer's concern.
    #[validate(length(min = 1, message = "password must be provided"))]
    pub password: String,

    #[validate(
        length(min = 1, message = "email must be provided"),
        email(message = "email must be a valid email address")
    )]
    pub email: String,

    /// ISO 3166-1 alpha-3 code
    #[validate(custom(function = "validate_country"))]
    pub country: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build an unsaved user; the store assigns `id` and `created_at`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        nickname: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            nickname: nickname.into(),
            password: password.into(),
            email: email.into(),
            country: country.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Copy the attributes named by `mask` from `other` into `self`.
    pub fn apply(&mut self, other: &User, mask: &FieldMask) {
        for field in mask.iter() {
            match field {
                UserField::FirstName => self.first_name.clone_from(&other.first_name),
                UserField::LastName => self.last_name.clone_from(&other.last_name),
                UserField::Nickname => self.nickname.clone_from(&other.nickname),
                UserField::Password => self.password.clone_from(&other.password),
                UserField::Email => self.email.clone_from(&other.email),
                UserField::Country => self.country.clone_from(&other.country),
            }
        }
    }

    /// Current value of an updatable attribute.
    pub fn value_of(&self, field: UserField) -> &str {
        match field {
            UserField::FirstName => &self.first_name,
            UserField::LastName => &self.last_name,
            UserField::Nickname => &self.nickname,
            UserField::Password => &self.password,
            UserField::Email => &self.email,
            UserField::Country => &self.country,
        }
    }
}

fn validate_country(country: &str) -> Result<(), validator::ValidationError> {
    if country.is_empty() {
        return Err(validator::ValidationError::new("required")
            .with_message("country must be provided".into()));
    }
    if country.chars().count() != 3 {
        return Err(validator::ValidationError::new("country_length")
            .with_message("country must be exactly 3 characters".into()));
    }
    Ok(())
}

/// Attributes a caller may name in an update.
///
/// The snake_case names double as the `users` column names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserField {
    FirstName,
    LastName,
    Nickname,
    Password,
    Email,
    Country,
}

impl UserField {
    pub fn column(&self) -> &'static str {
        match self {
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::Nickname => "nickname",
            UserField::Password => "password",
            UserField::Email => "email",
            UserField::Country => "country",
        }
    }
}

/// Set of attributes written by an update. Iteration order is the declaration
/// order of [`UserField`], so generated SQL is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMask(BTreeSet<UserField>);

impl FieldMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the field was already present.
    pub fn insert(&mut self, field: UserField) -> bool {
        self.0.insert(field)
    }

    pub fn contains(&self, field: UserField) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = UserField> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<UserField> for FieldMask {
    fn from_iter<I: IntoIterator<Item = UserField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[UserField; N]> for FieldMask {
    fn from(fields: [UserField; N]) -> Self {
        fields.into_iter().collect()
    }
}

/// Filter for listing users. An empty `countries` list matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    pub countries: Vec<String>,
}

impl UserFilter {
    pub fn by_countries<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn matches(&self, user: &User) -> bool {
        self.is_empty() || self.countries.iter().any(|c| *c == user.country)
    }
}
