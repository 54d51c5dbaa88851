use crate::deserialize_some;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Public projection of a user. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Request for creating a user. The password is hashed before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct CreateUserRequest {
    /// Unique login name
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters.")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,
    /// Plaintext password, write-only
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub password: Option<String>,
    pub bio: Option<String>,
    /// Avatar image URL
    #[validate(url(message = "Enter a valid URL."))]
    pub avatar: Option<String>,
}

/// Request for updating a user. Absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: Option<String>,
    /// Absent leaves the bio unchanged, `null` clears it
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    /// Absent leaves the avatar unchanged, `null` clears it
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    #[validate(url(message = "Enter a valid URL."))]
    pub avatar: Option<Option<String>>,
}

/// Filters for listing users.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Exact username match
    pub username: Option<String>,
}
