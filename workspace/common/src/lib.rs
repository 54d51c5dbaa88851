//! Common transport-layer types shared by the store and the HTTP handlers.
//! Outbound `*Dto` structs are the wire representation of each entity;
//! inbound `*Request` structs carry only the writable scalar and id fields.

mod activities;
mod admin;
mod leaderboard;
mod query;
mod teams;
mod users;
mod workouts;

pub use activities::{ActivityDto, ActivityFilter, CreateActivityRequest, UpdateActivityRequest};
pub use admin::ChangeListDto;
pub use leaderboard::{
    CreateLeaderboardEntryRequest, LeaderboardEntryDto, LeaderboardFilter,
    UpdateLeaderboardEntryRequest,
};
pub use query::Pagination;
pub use teams::{CreateTeamRequest, TeamDto, TeamFilter, UpdateTeamRequest};
pub use users::{CreateUserRequest, UpdateUserRequest, UserDto, UserFilter};
pub use workouts::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutDto, WorkoutFilter};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Per-field validation messages, keyed by the request field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Message used when a foreign key or membership id does not resolve.
pub fn invalid_pk_message(id: i32) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

/// Flattens `validator` errors into the field map returned to API callers.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(
    UserResponse = ApiResponse<UserDto>,
    UserListResponse = ApiResponse<Vec<UserDto>>,
    TeamResponse = ApiResponse<TeamDto>,
    TeamListResponse = ApiResponse<Vec<TeamDto>>,
    ActivityResponse = ApiResponse<ActivityDto>,
    ActivityListResponse = ApiResponse<Vec<ActivityDto>>,
    WorkoutResponse = ApiResponse<WorkoutDto>,
    WorkoutListResponse = ApiResponse<Vec<WorkoutDto>>,
    LeaderboardEntryResponse = ApiResponse<LeaderboardEntryDto>,
    LeaderboardListResponse = ApiResponse<Vec<LeaderboardEntryDto>>,
    ChangeListResponse = ApiResponse<ChangeListDto>,
    MessageResponse = ApiResponse<String>
)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

/// Distinguishes an absent field from an explicit `null` so that
/// `Option<Option<T>>` fields can clear nullable references.
pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_field_errors_uses_custom_messages() {
        let request = CreateUserRequest {
            username: Some("ironman".to_string()),
            email: Some("not-an-email".to_string()),
            password: None,
            bio: None,
            avatar: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields["email"], vec!["Enter a valid email address."]);
        assert_eq!(fields["password"], vec!["This field is required."]);
        assert!(!fields.contains_key("username"));
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{"bio": "Genius"}"#).unwrap();
        assert_eq!(absent.avatar, None);
        assert_eq!(absent.bio, Some(Some("Genius".to_string())));

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"avatar": null}"#).unwrap();
        assert_eq!(cleared.avatar, Some(None));
        assert!(cleared.validate().is_ok());

        let invalid: UpdateUserRequest =
            serde_json::from_str(r#"{"avatar": "not a url"}"#).unwrap();
        let fields = field_errors(&invalid.validate().unwrap_err());
        assert_eq!(fields["avatar"], vec!["Enter a valid URL."]);
    }

    #[test]
    fn test_invalid_pk_message() {
        assert_eq!(invalid_pk_message(9), "Invalid pk \"9\" - object does not exist.");
    }
}
