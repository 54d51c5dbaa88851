use crate::UserDto;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A logged activity with its owner embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ActivityDto {
    pub id: i32,
    pub user: UserDto,
    pub activity_type: String,
    /// Duration in minutes
    pub duration: i32,
    /// Creation time, never changes after insert
    pub date: DateTime<Utc>,
    pub calories_burned: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct CreateActivityRequest {
    /// Owning user id
    #[validate(required(message = "This field is required."))]
    pub user_id: Option<i32>,
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters.")
    )]
    pub activity_type: Option<String>,
    /// Duration in minutes
    #[validate(
        required(message = "This field is required."),
        range(min = 0, message = "Ensure this value is greater than or equal to 0.")
    )]
    pub duration: Option<i32>,
    /// Defaults to 0
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub calories_burned: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct UpdateActivityRequest {
    pub user_id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters."))]
    pub activity_type: Option<String>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub duration: Option<i32>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub calories_burned: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityFilter {
    /// Only activities owned by this user
    pub user_id: Option<i32>,
    /// Exact activity type match
    pub activity_type: Option<String>,
}
