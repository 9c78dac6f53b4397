pub mod account;
pub mod activity;
pub mod duels;
pub mod leaderboard;
pub mod profile;
