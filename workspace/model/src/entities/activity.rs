use sea_orm::entity::prelude::*;

/// A single logged exercise session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user who performed the activity.
    pub user_id: i32,
    pub activity_type: String,
    /// Duration in minutes.
    pub duration: i32,
    /// Set once when the activity is recorded.
    pub date: DateTimeUtc,
    pub calories_burned: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
