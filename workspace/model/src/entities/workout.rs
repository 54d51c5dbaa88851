use sea_orm::entity::prelude::*;

/// A workout routine that can be suggested to any number of users.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workouts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workout_suggestion::Entity")]
    WorkoutSuggestion,
}

impl Related<super::workout_suggestion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutSuggestion.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::workout_suggestion::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::workout_suggestion::Relation::Workout.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
