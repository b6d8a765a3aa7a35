pub mod api;
pub mod server;

pub use api::{ApiError, AppState, TrackResponse};
pub use server::{create_router, run_server};
