use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email))
                    .col(string(Users::PasswordHash))
                    .col(text_null(Users::Bio))
                    .col(string_null(Users::Avatar))
                    .to_owned(),
            )
            .await?;

        // Create teams table
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk_auto(Teams::Id))
                    .col(string(Teams::Name).unique_key())
                    .col(text_null(Teams::Description))
                    .to_owned(),
            )
            .await?;

        // Create teams_members table (join table)
        manager
            .create_table(
                Table::create()
                    .table(TeamsMembers::Table)
                    .if_not_exists()
                    .col(integer(TeamsMembers::TeamId))
                    .col(integer(TeamsMembers::UserId))
                    .primary_key(
                        Index::create()
                            .name("pk_teams_members")
                            .col(TeamsMembers::TeamId)
                            .col(TeamsMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_members_team")
                            .from(TeamsMembers::Table, TeamsMembers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_members_user")
                            .from(TeamsMembers::Table, TeamsMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create activities table
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(pk_auto(Activities::Id))
                    .col(integer(Activities::UserId))
                    .col(string(Activities::ActivityType))
                    .col(integer(Activities::Duration))
                    .col(timestamp_with_time_zone(Activities::Date))
                    .col(integer(Activities::CaloriesBurned).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_user")
                            .from(Activities::Table, Activities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create workouts table
        manager
            .create_table(
                Table::create()
                    .table(Workouts::Table)
                    .if_not_exists()
                    .col(pk_auto(Workouts::Id))
                    .col(string(Workouts::Name))
                    .col(text_null(Workouts::Description))
                    .to_owned(),
            )
            .await?;

        // Create workouts_suggested_for table (join table)
        manager
            .create_table(
                Table::create()
                    .table(WorkoutsSuggestedFor::Table)
                    .if_not_exists()
                    .col(integer(WorkoutsSuggestedFor::WorkoutId))
                    .col(integer(WorkoutsSuggestedFor::UserId))
                    .primary_key(
                        Index::create()
                            .name("pk_workouts_suggested_for")
                            .col(WorkoutsSuggestedFor::WorkoutId)
                            .col(WorkoutsSuggestedFor::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workouts_suggested_for_workout")
                            .from(WorkoutsSuggestedFor::Table, WorkoutsSuggestedFor::WorkoutId)
                            .to(Workouts::Table, Workouts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workouts_suggested_for_user")
                            .from(WorkoutsSuggestedFor::Table, WorkoutsSuggestedFor::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create leaderboard_entries table
        manager
            .create_table(
                Table::create()
                    .table(LeaderboardEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaderboardEntries::Id))
                    .col(integer(LeaderboardEntries::UserId))
                    .col(integer(LeaderboardEntries::Score).default(0))
                    .col(integer_null(LeaderboardEntries::TeamId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leaderboard_entry_user")
                            .from(LeaderboardEntries::Table, LeaderboardEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leaderboard_entry_team")
                            .from(LeaderboardEntries::Table, LeaderboardEntries::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Leaderboard listings sort by score
        manager
            .create_index(
                Index::create()
                    .name("idx_leaderboard_entries_score")
                    .table(LeaderboardEntries::Table)
                    .col(LeaderboardEntries::Score)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(LeaderboardEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(WorkoutsSuggestedFor::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Workouts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeamsMembers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Bio,
    Avatar,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum TeamsMembers {
    Table,
    TeamId,
    UserId,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    UserId,
    ActivityType,
    Duration,
    Date,
    CaloriesBurned,
}

#[derive(DeriveIden)]
enum Workouts {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum WorkoutsSuggestedFor {
    Table,
    WorkoutId,
    UserId,
}

#[derive(DeriveIden)]
enum LeaderboardEntries {
    Table,
    Id,
    UserId,
    Score,
    TeamId,
}
