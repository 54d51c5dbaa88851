use anyhow::Result;
use common::{
    CreateActivityRequest, CreateLeaderboardEntryRequest, CreateTeamRequest, CreateUserRequest,
    CreateWorkoutRequest,
};
use model::entities::{
    activity, leaderboard_entry, team, team_member, user, workout, workout_suggestion,
};
use model::store::{activities, leaderboard, teams, users, workouts};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use std::collections::HashMap;
use tracing::{debug, error, info, trace};

use super::initdb::run_migrations;
use crate::config::connect;

const SEED_PASSWORD: &str = "password";

struct Hero {
    username: &'static str,
    email: &'static str,
    team: &'static str,
}

const TEAMS: [&str; 2] = ["Marvel", "DC"];

static HEROES: [Hero; 4] = [
    Hero { username: "IronMan", email: "ironman@marvel.com", team: "Marvel" },
    Hero { username: "SpiderMan", email: "spiderman@marvel.com", team: "Marvel" },
    Hero { username: "Batman", email: "batman@dc.com", team: "DC" },
    Hero { username: "Superman", email: "superman@dc.com", team: "DC" },
];

/// Number of rows written by a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub teams: usize,
    pub users: usize,
    pub activities: usize,
    pub workouts: usize,
    pub leaderboard_entries: usize,
}

/// Wipe every table and write the demonstration roster, all in one
/// transaction. Nothing is kept if any step fails.
pub async fn populate(db: &DatabaseConnection) -> Result<SeedSummary> {
    let txn = db.begin().await?;

    trace!("Clearing existing data");
    leaderboard_entry::Entity::delete_many().exec(&txn).await?;
    activity::Entity::delete_many().exec(&txn).await?;
    workout_suggestion::Entity::delete_many().exec(&txn).await?;
    workout::Entity::delete_many().exec(&txn).await?;
    team_member::Entity::delete_many().exec(&txn).await?;
    team::Entity::delete_many().exec(&txn).await?;
    let removed = user::Entity::delete_many().exec(&txn).await?;
    debug!("Removed {} existing users", removed.rows_affected);

    let mut summary = SeedSummary::default();
    let mut heroes = Vec::with_capacity(HEROES.len());
    for hero in &HEROES {
        let created = users::create(
            &txn,
            CreateUserRequest {
                username: Some(hero.username.to_string()),
                email: Some(hero.email.to_string()),
                password: Some(SEED_PASSWORD.to_string()),
                bio: None,
                avatar: None,
            },
        )
        .await?;
        heroes.push((hero, created.id));
        summary.users += 1;
    }

    let mut team_ids = HashMap::new();
    for name in TEAMS {
        let member_ids = heroes
            .iter()
            .filter(|(hero, _)| hero.team == name)
            .map(|(_, id)| *id)
            .collect();
        let created = teams::create(
            &txn,
            CreateTeamRequest {
                name: Some(name.to_string()),
                description: None,
                member_ids: Some(member_ids),
            },
        )
        .await?;
        team_ids.insert(name, created.id);
        summary.teams += 1;
    }

    for (hero, user_id) in heroes {
        activities::create(
            &txn,
            CreateActivityRequest {
                user_id: Some(user_id),
                activity_type: Some("Running".to_string()),
                duration: Some(30),
                calories_burned: Some(300),
            },
        )
        .await?;
        summary.activities += 1;

        leaderboard::create(
            &txn,
            CreateLeaderboardEntryRequest {
                user_id: Some(user_id),
                score: Some(100),
                team_id: team_ids.get(hero.team).copied(),
            },
        )
        .await?;
        summary.leaderboard_entries += 1;

        workouts::create(
            &txn,
            CreateWorkoutRequest {
                name: Some("Pushups".to_string()),
                description: Some("20 pushups".to_string()),
                suggested_for_ids: Some(vec![user_id]),
            },
        )
        .await?;
        summary.workouts += 1;

        debug!("Seeded {} ({})", hero.username, hero.team);
    }

    txn.commit().await?;
    Ok(summary)
}

pub async fn populate_db(database_url: &str) -> Result<()> {
    trace!("Entering populate_db function");
    info!("Populating database with demonstration data");

    let db = connect(database_url).await?;
    run_migrations(&db).await?;

    match populate(&db).await {
        Ok(summary) => {
            info!("Seeding completed: {:?}", summary);
            println!(
                "Successfully populated the database: {} teams, {} users, {} activities, {} workouts, {} leaderboard entries.",
                summary.teams,
                summary.users,
                summary.activities,
                summary.workouts,
                summary.leaderboard_entries
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to populate database, no changes were kept: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use model::entities::prelude::*;
    use sea_orm::{ColumnTrait, ModelTrait, PaginatorTrait, QueryFilter};

    async fn counts(db: &DatabaseConnection) -> [u64; 5] {
        [
            Team::find().count(db).await.unwrap(),
            User::find().count(db).await.unwrap(),
            Activity::find().count(db).await.unwrap(),
            Workout::find().count(db).await.unwrap(),
            LeaderboardEntry::find().count(db).await.unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_populate_twice_leaves_one_roster() {
        let db = setup_test_db().await;

        let first = populate(&db).await.unwrap();
        assert_eq!(
            first,
            SeedSummary { teams: 2, users: 4, activities: 4, workouts: 4, leaderboard_entries: 4 }
        );
        assert_eq!(counts(&db).await, [2, 4, 4, 4, 4]);

        populate(&db).await.unwrap();
        assert_eq!(counts(&db).await, [2, 4, 4, 4, 4]);
    }

    #[tokio::test]
    async fn test_populate_assigns_teams() {
        let db = setup_test_db().await;
        populate(&db).await.unwrap();

        let marvel = Team::find()
            .filter(team::Column::Name.eq("Marvel"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut members: Vec<String> = marvel
            .find_related(User)
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        members.sort();
        assert_eq!(members, vec!["IronMan", "SpiderMan"]);

        let entries = marvel.find_related(LeaderboardEntry).all(&db).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.score == 100));

        let batman = User::find()
            .filter(user::Column::Username.eq("Batman"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(batman.email, "batman@dc.com");
        assert!(model::password::verify_password("password", &batman.password_hash).unwrap());
        let suggested = batman.find_related(Workout).all(&db).await.unwrap();
        assert_eq!(suggested.len(), 1);
        assert_eq!(suggested[0].name, "Pushups");
    }
}
