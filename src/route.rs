//! Route definitions for the listing search API

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::database::AppState;
use crate::handler::{
    end_session, get_session, import_categories, import_listings, list_categories,
    open_session, search_listings, session_action, session_page,
};
use crate::middleware::auth_middleware;

/// Creates the application router
///
/// # Route Definitions
///
/// - `GET /api/listings` - Filtered, paginated search
/// - `POST /api/listings` - Bulk import listings (authorization checked)
/// - `GET /api/categories` - All categories
/// - `POST /api/categories` - Bulk import categories (authorization checked)
/// - `POST /api/sessions` - Open a filter session from the query string
/// - `GET /api/sessions/{id}` - Session view
/// - `DELETE /api/sessions/{id}` - End a session
/// - `POST /api/sessions/{id}/actions` - Apply a filter action
/// - `POST /api/sessions/{id}/page` - Move to another page
///
/// ```no_run
/// # use flatmate_search::config::Config;
/// # use flatmate_search::database::{init_db, AppState};
/// # use flatmate_search::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let state = AppState::new(db, Config::default());
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/listings",
            get(search_listings)
                .merge(post(import_listings).route_layer(middleware::from_fn(auth_middleware))),
        )
        .route(
            "/categories",
            get(list_categories)
                .merge(post(import_categories).route_layer(middleware::from_fn(auth_middleware))),
        )
        .route("/sessions", post(open_session))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/actions", post(session_action))
        .route("/sessions/{id}/page", post(session_page));

    Router::new().nest("/api", api_routes).with_state(state)
}
