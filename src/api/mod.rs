//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod ui;
pub mod v1;

pub use router::create_router;
pub use state::{AppState, PredictionServiceTrait};
