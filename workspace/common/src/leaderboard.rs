use crate::{TeamDto, UserDto, deserialize_some};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Leaderboard row. `team`, when set, carries its full member list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LeaderboardEntryDto {
    pub id: i32,
    pub user: UserDto,
    pub score: i32,
    pub team: Option<TeamDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct CreateLeaderboardEntryRequest {
    #[validate(required(message = "This field is required."))]
    pub user_id: Option<i32>,
    /// Defaults to 0
    pub score: Option<i32>,
    pub team_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq, Default)]
pub struct UpdateLeaderboardEntryRequest {
    pub user_id: Option<i32>,
    pub score: Option<i32>,
    /// Absent leaves the team unchanged, `null` clears it
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>)]
    pub team_id: Option<Option<i32>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardFilter {
    pub user_id: Option<i32>,
    pub team_id: Option<i32>,
}
