//! # Runboard
//!
//! A leaderboard viewer backend for a speedrunning statistics service.
//!
//! ## Architecture
//!
//! - **models**: Core display models (games, categories, variables, runs)
//! - **upstream**: Read-only HTTP client for the statistics service
//! - **normalize**: Shapes raw upstream payloads into the display model
//! - **nav**: Drill-down navigation state machine
//! - **rotation**: Virtual-clock page rotation scheduler
//! - **store**: Persisted "remember my selection" state
//! - **session**: Single-threaded event-driven session driver
//! - **api**: Internal proxy endpoints for the presentation layer
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod models;
pub mod nav;
pub mod normalize;
pub mod rotation;
pub mod session;
pub mod store;
pub mod upstream;

pub use models::*;
