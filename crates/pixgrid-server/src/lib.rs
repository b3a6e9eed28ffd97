//! pixgrid-server: HTTP front end for the session store and pipeline.
//!
//! A client uploads an image once (`POST /api/upload`), then converts
//! it as often as it likes with different parameters
//! (`POST /api/convert`, `POST /api/download`) without sending the
//! image again. Sessions expire after a period of inactivity.

pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::{AppState, Limits};
