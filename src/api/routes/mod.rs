pub mod categories;
pub mod games;
pub mod leaderboard;
pub mod variables;
