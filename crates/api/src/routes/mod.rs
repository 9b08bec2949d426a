pub mod health;
pub mod villa;

use axum::Router;

use crate::state::AppState;

/// Base path of the villa resource, used for `Location` headers.
pub const VILLAS_PATH: &str = "/api/v1/villas";

/// Build the `/api/v1` route tree.
///
/// ```text
/// /villas                 list, create
/// /villas/{id}            get, full update, partial update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/villas", villa::router())
}
