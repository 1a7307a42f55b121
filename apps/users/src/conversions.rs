//! Proto ↔ domain conversions
//!
//! Both `User` types live in other crates, so these are plain functions
//! rather than `From` impls.

use chrono::{DateTime, Utc};
use domain_users::{User, UserField, UserFilter};
use prost_types::Timestamp;
use rpc::users::v1 as proto;
use uuid::Uuid;

pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

/// `None` for timestamps outside chrono's range or with negative nanos
pub fn timestamp_to_datetime(ts: &Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.seconds, u32::try_from(ts.nanos).ok()?)
}

pub fn user_to_proto(user: User) -> proto::User {
    proto::User {
        id: user.id.to_string(),
        first_name: user.first_name,
        last_name: user.last_name,
        nickname: user.nickname,
        password: user.password,
        email: user.email,
        country: user.country,
        created_at: user.created_at.map(datetime_to_timestamp),
        updated_at: user.updated_at.map(datetime_to_timestamp),
    }
}

/// Domain user carrying `id`; the wire id is parsed by the caller.
pub fn user_from_proto(user: proto::User, id: Uuid) -> User {
    User {
        id,
        first_name: user.first_name,
        last_name: user.last_name,
        nickname: user.nickname,
        password: user.password,
        email: user.email,
        country: user.country,
        created_at: user.created_at.as_ref().and_then(timestamp_to_datetime),
        updated_at: user.updated_at.as_ref().and_then(timestamp_to_datetime),
    }
}

pub fn filter_from_proto(filters: Option<proto::SelectUserFilters>) -> UserFilter {
    filters
        .map(|f| UserFilter::by_countries(f.countries))
        .unwrap_or_default()
}

/// `None` for the unspecified sentinel
pub fn field_from_proto(field: proto::UpdateUserField) -> Option<UserField> {
    match field {
        proto::UpdateUserField::Unspecified => None,
        proto::UpdateUserField::FirstName => Some(UserField::FirstName),
        proto::UpdateUserField::LastName => Some(UserField::LastName),
        proto::UpdateUserField::Nickname => Some(UserField::Nickname),
        proto::UpdateUserField::Password => Some(UserField::Password),
        proto::UpdateUserField::Email => Some(UserField::Email),
        proto::UpdateUserField::Country => Some(UserField::Country),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_roundtrip_keeps_nanos() {
        let dt = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let ts = datetime_to_timestamp(dt);

        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanos, 123_456_789);
        assert_eq!(timestamp_to_datetime(&ts), Some(dt));
    }

    #[test]
    fn test_negative_nanos_rejected() {
        let ts = Timestamp {
            seconds: 0,
            nanos: -1,
        };
        assert_eq!(timestamp_to_datetime(&ts), None);
    }

    #[test]
    fn test_user_to_proto_leaves_unset_timestamps_empty() {
        let mut user = User::new("Ada", "Lovelace", "ada", "s3cret", "a@b.com", "DEU");
        user.id = Uuid::new_v4();
        user.created_at = Some(Utc::now());

        let proto = user_to_proto(user.clone());

        assert_eq!(proto.id, user.id.to_string());
        assert!(proto.created_at.is_some());
        assert!(proto.updated_at.is_none());
    }

    #[test]
    fn test_user_from_proto_uses_given_id() {
        let id = Uuid::new_v4();
        let proto = proto::User {
            id: "ignored".into(),
            first_name: "Ada".into(),
            email: "a@b.com".into(),
            ..Default::default()
        };

        let user = user_from_proto(proto, id);

        assert_eq!(user.id, id);
        assert_eq!(user.first_name, "Ada");
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_filter_from_proto() {
        assert!(filter_from_proto(None).is_empty());

        let filter = filter_from_proto(Some(proto::SelectUserFilters {
            countries: vec!["DEU".into(), "FRA".into()],
        }));
        assert_eq!(filter.countries, ["DEU", "FRA"]);
    }

    #[test]
    fn test_field_from_proto() {
        assert_eq!(field_from_proto(proto::UpdateUserField::Unspecified), None);
        assert_eq!(
            field_from_proto(proto::UpdateUserField::Country),
            Some(UserField::Country)
        );
    }
}
