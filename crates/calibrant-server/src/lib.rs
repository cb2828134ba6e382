//! Calibrant Server
//!
//! HTTP API for calibrated text classification: load a checkpoint once,
//! then serve predictions with temperature-scaled probabilities and an
//! uncertainty tier per request.

pub mod config;
pub mod routes;
pub mod state;

pub use config::{ModelSection, ServerConfig};
pub use routes::create_router;
pub use state::AppState;
