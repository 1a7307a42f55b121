// @generated
// This file is @generated by prost-build.
/// User is the sole entity managed by UserService.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct User {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub first_name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub last_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub nickname: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub password: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub email: ::prost::alloc::string::String,
    /// ISO 3166-1 alpha-3 country code.
    #[prost(string, tag = "7")]
    pub country: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "8")]
    pub created_at: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "9")]
    pub updated_at: ::core::option::Option<::prost_types::Timestamp>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SelectUserFilters {
    #[prost(string, repeated, tag = "1")]
    pub countries: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateUserRequest {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateUserResponse {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct GetUserRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserResponse {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListUsersRequest {
    #[prost(message, optional, tag = "1")]
    pub filters: ::core::option::Option<SelectUserFilters>,
    #[prost(uint64, tag = "2")]
    pub offset: u64,
    #[prost(uint64, tag = "3")]
    pub limit: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListUsersResponse {
    #[prost(message, repeated, tag = "1")]
    pub users: ::prost::alloc::vec::Vec<User>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateUserRequest {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
    #[prost(enumeration = "UpdateUserField", repeated, tag = "2")]
    pub update_fields: ::prost::alloc::vec::Vec<i32>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateUserResponse {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct DeleteUserRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
}
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct DeleteUserResponse {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UserCreatedEvent {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UserUpdatedEvent {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
    #[prost(enumeration = "UpdateUserField", repeated, tag = "2")]
    pub update_fields: ::prost::alloc::vec::Vec<i32>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UserDeletedEvent {
    #[prost(message, optional, tag = "1")]
    pub user: ::core::option::Option<User>,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum UpdateUserField {
    Unspecified = 0,
    FirstName = 1,
    LastName = 2,
    Nickname = 3,
    Password = 4,
    Email = 5,
    Country = 6,
}
impl UpdateUserField {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "UPDATE_USER_FIELD_UNSPECIFIED",
            Self::FirstName => "UPDATE_USER_FIELD_FIRST_NAME",
            Self::LastName => "UPDATE_USER_FIELD_LAST_NAME",
            Self::Nickname => "UPDATE_USER_FIELD_NICKNAME",
            Self::Password => "UPDATE_USER_FIELD_PASSWORD",
            Self::Email => "UPDATE_USER_FIELD_EMAIL",
            Self::Country => "UPDATE_USER_FIELD_COUNTRY",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "UPDATE_USER_FIELD_UNSPECIFIED" => Some(Self::Unspecified),
            "UPDATE_USER_FIELD_FIRST_NAME" => Some(Self::FirstName),
            "UPDATE_USER_FIELD_LAST_NAME" => Some(Self::LastName),
            "UPDATE_USER_FIELD_NICKNAME" => Some(Self::Nickname),
            "UPDATE_USER_FIELD_PASSWORD" => Some(Self::Password),
            "UPDATE_USER_FIELD_EMAIL" => Some(Self::Email),
            "UPDATE_USER_FIELD_COUNTRY" => Some(Self::Country),
            _ => None,
        }
    }
}
include!("users.v1.tonic.rs");
// @@protoc_insertion_point(module)
