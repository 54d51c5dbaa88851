//! This file serves as the root for all SeaORM entity modules.
//! Five entities make up the fitness tracker; two join tables carry
//! the many-to-many team membership and workout suggestion sets.

pub mod activity;
pub mod leaderboard_entry;
pub mod team;
pub mod team_member;
pub mod user;
pub mod workout;
pub mod workout_suggestion;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::activity::Entity as Activity;
    pub use super::leaderboard_entry::Entity as LeaderboardEntry;
    pub use super::team::Entity as Team;
    pub use super::team_member::Entity as TeamMember;
    pub use super::user::Entity as User;
    pub use super::workout::Entity as Workout;
    pub use super::workout_suggestion::Entity as WorkoutSuggestion;
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        ModelTrait, QueryFilter, QueryOrder, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{}@example.com", username)),
            password_hash: Set("not-a-real-hash".to_string()),
            bio: Set(None),
            avatar: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let alice = insert_user(&db, "alice").await?;
        let bob = insert_user(&db, "bob").await?;

        let team = team::ActiveModel {
            name: Set("Runners".to_string()),
            description: Set(Some("Morning runners".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for member in [&alice, &bob] {
            team_member::ActiveModel {
                team_id: Set(team.id),
                user_id: Set(member.id),
            }
            .insert(&db)
            .await?;
        }

        let workout = workout::ActiveModel {
            name: Set("Intervals".to_string()),
            description: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        workout_suggestion::ActiveModel {
            workout_id: Set(workout.id),
            user_id: Set(bob.id),
        }
        .insert(&db)
        .await?;

        activity::ActiveModel {
            user_id: Set(alice.id),
            activity_type: Set("Running".to_string()),
            duration: Set(45),
            date: Set(Utc::now()),
            calories_burned: Set(420),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        leaderboard_entry::ActiveModel {
            user_id: Set(alice.id),
            score: Set(80),
            team_id: Set(Some(team.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Many-to-many: team -> users via teams_members
        let members = team
            .find_related(User)
            .order_by_asc(user::Column::Id)
            .all(&db)
            .await?;
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].username, "alice");
        assert_eq!(members[1].username, "bob");

        // Many-to-many: user -> teams
        let teams = bob.find_related(Team).all(&db).await?;
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Runners");

        // Many-to-many: user -> workouts via workouts_suggested_for
        let suggested = bob.find_related(Workout).all(&db).await?;
        assert_eq!(suggested.len(), 1);
        assert_eq!(suggested[0].name, "Intervals");
        assert!(alice.find_related(Workout).all(&db).await?.is_empty());

        // One-to-many: user -> activities and leaderboard entries
        let activities = alice.find_related(Activity).all(&db).await?;
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].duration, 45);

        let entries = LeaderboardEntry::find()
            .filter(leaderboard_entry::Column::TeamId.eq(team.id))
            .all(&db)
            .await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, alice.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_violates_unique_constraint() -> Result<(), DbErr> {
        let db = setup_db().await?;

        insert_user(&db, "alice").await?;
        let duplicate = insert_user(&db, "alice").await;

        let err = duplicate.expect_err("duplicate username should be rejected");
        assert!(matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));

        Ok(())
    }
}
