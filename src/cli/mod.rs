pub mod handicap;
pub mod leaderboard;
pub mod setup;
pub mod ui;
