//! HTTP request handlers
//!
//! - Importing and listing listings/categories
//! - Stateless search: filter query string in, one page of results out
//! - Filter sessions: open from a query string, mutate, paginate, end

use std::sync::Arc;

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::database::{self, AppState};
use crate::error::AppError;
use crate::filter::{
    codec, pagination, predicate, FilterCriteria, FilterSession, HistoryNavigator, Mutation,
    PageWindow, SyncScheduler, PAGE_SIZE,
};
use crate::listing::{Category, Listing};
use crate::model::{ImportResponse, PageParams, PageRequest, SearchResponse, SessionView};
use crate::sessions::SessionEntry;

/// Stores a batch of listings, overwriting any with the same id
///
/// # Response
///
/// - **201 Created** - `{ "imported": n }`
pub async fn import_listings(
    State(state): State<AppState>,
    Json(listings): Json<Vec<Listing>>,
) -> Result<impl IntoResponse, AppError> {
    let imported = database::insert_listings(&state.db, &listings)?;
    Ok((StatusCode::CREATED, Json(ImportResponse { imported })))
}

/// Stores a batch of categories, overwriting any with the same id
pub async fn import_categories(
    State(state): State<AppState>,
    Json(categories): Json<Vec<Category>>,
) -> Result<impl IntoResponse, AppError> {
    let imported = database::insert_categories(&state.db, &categories)?;
    Ok((StatusCode::CREATED, Json(ImportResponse { imported })))
}

/// Lists every stored category
///
/// # Response
///
/// - **200 OK** - `[{ "id": "...", "name": "...", "icon": "..." }]`
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(database::fetch_categories(&state.db)?))
}

/// Filters every stored listing by the query string and returns one page
///
/// The query string uses the same keys a filter session writes, plus `page`.
///
/// # Example Request
///
/// `GET /api/listings?search=loft&propertyType=room&internet=true&page=1`
///
/// A missing, zero or non-numeric `page` falls back to page 1.
///
/// # Response
///
/// - **200 OK** - one page of results; an empty `data` when nothing matches
pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let listings = database::fetch_listings(&state.db)?;
    let criteria = codec::decode(query.as_deref().unwrap_or_default());
    let page = params.page.unwrap_or(1).max(1);

    let filtered = predicate::filter_listings(&listings, &criteria);
    let response = search_response(&filtered, &criteria, page);

    Ok(Json(response).into_response())
}

/// Opens a filter session from the query string the page was loaded with
///
/// # Response
///
/// - **201 Created** - the session view, including its `id`
pub async fn open_session(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let listings = database::fetch_listings(&state.db)?;
    let categories = database::fetch_categories(&state.db)?;
    let query = query.unwrap_or_default();

    let path = &state.config.listings_path;
    let history = Arc::new(HistoryNavigator::new(codec::location(path, &query)));
    let scheduler = SyncScheduler::with_delay(history.clone(), path.clone(), state.config.sync_debounce);
    let session = FilterSession::new(listings, categories, &query, scheduler);

    let id = state.sessions.insert(SessionEntry {
        session,
        history,
        created_at: Utc::now(),
    });
    info!(session = %id, "opened filter session");

    let view = state
        .sessions
        .with(&id, |entry| Json(session_view(&id, entry)).into_response())
        .ok_or(AppError::NotFound("session"))?;
    Ok((StatusCode::CREATED, view).into_response())
}

/// Returns the current view of a session
///
/// # Response
///
/// - **200 OK** - the session view
/// - **404 Not Found** - unknown or expired session id
pub async fn get_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    state
        .sessions
        .with(&id, |entry| Json(session_view(&id, entry)).into_response())
        .ok_or(AppError::NotFound("session"))
}

/// Applies one sidebar action to a session and returns the updated view
///
/// # Request Body
///
/// ```json
/// { "action": "setScalar", "key": "search", "value": "loft" }
/// ```
pub async fn session_action(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(mutation): Json<Mutation>,
) -> Result<Response, AppError> {
    state
        .sessions
        .with(&id, |entry| {
            entry.session.apply_mutation(mutation);
            Json(session_view(&id, entry)).into_response()
        })
        .ok_or(AppError::NotFound("session"))
}

/// Moves a session to another page without touching its criteria or URL
///
/// # Request Body
///
/// ```json
/// { "page": 3 }
/// ```
///
/// # Response
///
/// - **200 OK** - the session view on the requested page
/// - **404 Not Found** - unknown or expired session id
pub async fn session_page(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> Result<Response, AppError> {
    state
        .sessions
        .with(&id, |entry| {
            entry.session.go_to_page(request.page);
            Json(session_view(&id, entry)).into_response()
        })
        .ok_or(AppError::NotFound("session"))
}

/// Ends a session, dropping any URL commit still waiting on the debounce
pub async fn end_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if !state.sessions.remove(&id) {
        return Err(AppError::NotFound("session"));
    }
    info!(session = %id, "ended filter session");

    Ok(Json(json!({
        "message": "Session ended",
        "deleted_id": id
    }))
    .into_response())
}

fn search_response<'a>(
    filtered: &[&'a Listing],
    criteria: &'a FilterCriteria,
    page: usize,
) -> SearchResponse<'a> {
    let total_pages = pagination::total_pages(filtered.len());
    SearchResponse {
        page,
        page_size: PAGE_SIZE,
        total: filtered.len(),
        total_pages,
        active_filters: criteria.active_count(),
        query: codec::encode(criteria),
        criteria,
        window: PageWindow::new(page, total_pages).items(),
        data: pagination::page_slice(filtered, page).to_vec(),
    }
}

fn session_view<'a>(id: &'a str, entry: &'a SessionEntry) -> SessionView<'a> {
    let session = &entry.session;
    SessionView {
        id,
        created_at: entry.created_at,
        location: entry.history.current(),
        history_length: entry.history.len(),
        navigations: entry.history.log(),
        pending_commit: session.pending_commit(),
        categories: session.categories(),
        results: SearchResponse {
            page: session.current_page(),
            page_size: PAGE_SIZE,
            total: session.filtered_count(),
            total_pages: session.total_pages(),
            active_filters: session.active_filter_count(),
            query: session.query(),
            criteria: session.criteria(),
            window: session.page_window().items(),
            data: session.page_slice(),
        },
    }
}
