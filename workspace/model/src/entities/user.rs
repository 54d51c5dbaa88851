use sea_orm::entity::prelude::*;

/// Represents a person tracking their fitness.
/// The password is only ever stored as an Argon2 PHC string.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    /// URL of the profile picture.
    pub avatar: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activity::Entity")]
    Activity,
    #[sea_orm(has_many = "super::leaderboard_entry::Entity")]
    LeaderboardEntry,
    /// Relation for the many-to-many membership with Teams.
    #[sea_orm(has_many = "super::team_member::Entity")]
    TeamMember,
    /// Relation for the many-to-many suggestion with Workouts.
    #[sea_orm(has_many = "super::workout_suggestion::Entity")]
    WorkoutSuggestion,
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<super::leaderboard_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaderboardEntry.def()
    }
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMember.def()
    }
}

impl Related<super::workout_suggestion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutSuggestion.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        super::team_member::Relation::Team.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::team_member::Relation::User.def().rev())
    }
}

impl Related<super::workout::Entity> for Entity {
    fn to() -> RelationDef {
        super::workout_suggestion::Relation::Workout.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::workout_suggestion::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
