//! Request shape checks, run before anything reaches the domain service.
//!
//! Every failure is a [`UserError::Validation`] whose message is returned to
//! the caller as-is.

use domain_users::{FieldMask, User, UserError, UserResult};
use rpc::users::v1 as proto;
use std::collections::HashSet;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::conversions::field_from_proto;

pub const USER_REQUIRED: &str = "user must be provided";
pub const ID_REQUIRED: &str = "user id must be provided";
pub const ID_NOT_UUID: &str = "user id must be in the UUID format";
pub const UPDATE_FIELDS_REQUIRED: &str = "at least one update field must be provided";
pub const UPDATE_FIELDS_UNSPECIFIED: &str =
    "at least one update field must be provided and not be unspecified value";
pub const UPDATE_FIELDS_DUPLICATED: &str = "should only input unique update fields";
pub const UPDATE_FIELDS_UNKNOWN: &str = "update fields must be valid values";

/// Reporting order when several attributes are invalid at once
const FIELD_ORDER: [&str; 6] = [
    "first_name",
    "last_name",
    "nickname",
    "password",
    "email",
    "country",
];

pub fn require_user(user: Option<proto::User>) -> UserResult<proto::User> {
    user.ok_or_else(|| UserError::validation(USER_REQUIRED))
}

pub fn require_id(id: &str) -> UserResult<()> {
    if id.is_empty() {
        return Err(UserError::validation(ID_REQUIRED));
    }
    Ok(())
}

/// Non-empty and a UUID, in that order
pub fn parse_id(id: &str) -> UserResult<Uuid> {
    require_id(id)?;
    Uuid::parse_str(id).map_err(|_| UserError::validation(ID_NOT_UUID))
}

/// Turn the wire field list into a mask.
///
/// Rules, first failure wins: non-empty, not just the unspecified sentinel,
/// no duplicates, no unspecified entry among real ones, only known values.
pub fn parse_update_fields(fields: &[i32]) -> UserResult<FieldMask> {
    let unspecified = proto::UpdateUserField::Unspecified as i32;

    if fields.is_empty() {
        return Err(UserError::validation(UPDATE_FIELDS_REQUIRED));
    }
    if fields == [unspecified] {
        return Err(UserError::validation(UPDATE_FIELDS_UNSPECIFIED));
    }

    let mut seen = HashSet::with_capacity(fields.len());
    if !fields.iter().all(|field| seen.insert(*field)) {
        return Err(UserError::validation(UPDATE_FIELDS_DUPLICATED));
    }

    fields
        .iter()
        .map(|&raw| {
            let field = proto::UpdateUserField::try_from(raw)
                .map_err(|_| UserError::validation(UPDATE_FIELDS_UNKNOWN))?;
            field_from_proto(field).ok_or_else(|| UserError::validation(UPDATE_FIELDS_UNSPECIFIED))
        })
        .collect()
}

/// Attribute rules of [`User`], reporting only the first failing attribute.
pub fn validate_user(user: &User) -> UserResult<()> {
    let errors = match user.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    let by_field = errors.field_errors();

    let message = FIELD_ORDER
        .iter()
        .find_map(|name| {
            by_field
                .get(*name)
                .and_then(|errs| primary_error(errs))
                .map(|err| message_for(name, err))
        })
        // Unreachable while every rule sits on a field listed above
        .unwrap_or_else(|| errors.to_string());

    Err(UserError::Validation(message))
}

/// A missing value outranks a malformed one, so an empty email reports
/// "must be provided" rather than "must be valid".
fn primary_error(errors: &[ValidationError]) -> Option<&ValidationError> {
    errors
        .iter()
        .find(|e| e.code == "length" || e.code == "required")
        .or_else(|| errors.first())
}

fn message_for(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{} is invalid", field.replace('_', " ")))
}
