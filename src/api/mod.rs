//! HTTP API.
//!
//! Exposes the engine as JSON endpoints under `/api/`. The router is
//! composable: `api_router()` returns a `Router` that can be mounted on any
//! axum server, and `start_api_server_on()` runs it in the background.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server_on, ApiServer, ApiServerSession};
pub use types::ApiContext;
