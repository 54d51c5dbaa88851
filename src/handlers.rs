pub mod activities;
pub mod admin;
pub mod api_root;
pub mod health;
pub mod leaderboard;
pub mod teams;
pub mod users;
pub mod workouts;
