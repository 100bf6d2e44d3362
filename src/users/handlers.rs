use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tracing::{error, info, instrument};

use crate::{
    pagination::PageWindow,
    response::{ApiError, Envelope},
    state::AppState,
    users::{
        dto::{
            parse_id, CreateUserRequest, IdQuery, ListQuery, QueryPairs, ReadQuery,
            UpdateUserRequest, UserPage,
        },
        repo_types::{User, UserFields},
    },
};

type RawQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;
type RawBody = Result<Bytes, BytesRejection>;

const CREATED: &str = "created";
const CREATE_FAILED: &str = "create failed";
const DELETED: &str = "deleted";
const DELETE_NOT_FOUND: &str = "id not found, delete failed";
const UPDATED: &str = "updated";
const UPDATE_NOT_FOUND: &str = "user id not found";
const UPDATE_FAILED: &str = "update failed";
const QUERY_OK: &str = "query succeeded";
const NO_DATA: &str = "no data found";

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/user/create", post(create_user))
        .route("/user/delete", delete(delete_user))
        .route("/user/update", put(update_user))
}

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/user/read", get(read_users))
        .route("/user/list", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: RawBody,
) -> Result<Json<Envelope<User>>, ApiError> {
    let body: CreateUserRequest = decode_json(payload, CREATE_FAILED)?;
    let fields =
        UserFields::try_from(body).map_err(|e| ApiError::invalid(CREATE_FAILED, e.to_string()))?;

    let user = state
        .users
        .insert(fields)
        .await
        .map_err(|e| ApiError::storage(CREATE_FAILED, e))?;

    info!(user_id = user.id, "user created");
    Ok(Envelope::ok(CREATED, user))
}

#[instrument(skip(state, query))]
pub async fn delete_user(
    State(state): State<AppState>,
    query: RawQuery,
) -> Result<Json<Envelope<User>>, ApiError> {
    let q: IdQuery = query_pairs(query, DELETE_NOT_FOUND)?.into();
    let user = load_user(&state, q.id.as_deref(), DELETE_NOT_FOUND).await?;

    state
        .users
        .soft_delete(&user)
        .await
        .map_err(|e| ApiError::storage(DELETE_NOT_FOUND, e))?;

    info!(user_id = user.id, "user deleted");
    Ok(Envelope::ok(DELETED, user))
}

#[instrument(skip(state, query, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    query: RawQuery,
    payload: RawBody,
) -> Result<Json<Envelope<User>>, ApiError> {
    let q: IdQuery = query_pairs(query, UPDATE_NOT_FOUND)?.into();
    // Existence is checked before the body is looked at.
    let current = load_user(&state, q.id.as_deref(), UPDATE_NOT_FOUND).await?;

    let patch: UpdateUserRequest = decode_json(payload, UPDATE_FAILED)?;
    let fields = patch
        .merge_onto(current.fields())
        .map_err(|e| ApiError::invalid(UPDATE_FAILED, e.to_string()))?;

    let user = state
        .users
        .update_by_id(current.id, &fields)
        .await
        .map_err(|e| ApiError::storage(UPDATE_FAILED, e))?
        .ok_or(ApiError::NotFound(UPDATE_NOT_FOUND))?;

    info!(user_id = user.id, "user updated");
    Ok(Envelope::ok(UPDATED, user))
}

/// Exact name match first; the id is only consulted when no name matched.
#[instrument(skip(state, query))]
pub async fn read_users(
    State(state): State<AppState>,
    query: RawQuery,
) -> Result<Json<Envelope<Vec<User>>>, ApiError> {
    let q: ReadQuery = query_pairs(query, NO_DATA)?.into();
    let mut users = match q.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => state.users.find_by_name(name).await.unwrap_or_else(|e| {
            error!(error = %format!("{e:#}"), "find_by_name failed");
            Vec::new()
        }),
        None => Vec::new(),
    };

    if users.is_empty() {
        if let Some(id) = parse_id(q.id.as_deref()) {
            match state.users.find_by_id(id).await {
                Ok(found) => users.extend(found),
                Err(e) => error!(error = %format!("{e:#}"), id, "find_by_id failed"),
            }
        }
    }

    if users.is_empty() {
        return Err(ApiError::NotFound(NO_DATA));
    }
    Ok(Envelope::ok(QUERY_OK, users))
}

#[instrument(skip(state, query))]
pub async fn list_users(
    State(state): State<AppState>,
    query: RawQuery,
) -> Result<Json<Envelope<UserPage>>, ApiError> {
    let q: ListQuery = query_pairs(query, NO_DATA)?.into();
    let (page_size, page_num) = q.params();
    let window = PageWindow::from_params(page_size, page_num);

    let (list, total) = state
        .users
        .find_paged(window)
        .await
        .map_err(|e| ApiError::storage(NO_DATA, e))?;

    if list.is_empty() {
        return Err(ApiError::NotFound(NO_DATA));
    }
    Ok(Envelope::ok(
        QUERY_OK,
        UserPage {
            list,
            total,
            page_num,
            page_size,
        },
    ))
}

/// Decode a JSON body whatever its declared content type; an empty body is a
/// decode failure.
fn decode_json<T: DeserializeOwned>(body: RawBody, msg: &'static str) -> Result<T, ApiError> {
    let bytes = body.map_err(|e| ApiError::invalid(msg, e.body_text()))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::invalid(msg, e.to_string()))
}

fn query_pairs(query: RawQuery, msg: &'static str) -> Result<QueryPairs, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::invalid(msg, e.body_text()))?;
    Ok(QueryPairs(pairs))
}

/// Load a live user by its raw `id` query value. Unparseable ids, missing
/// rows and storage failures all come back as the same business failure.
async fn load_user(
    state: &AppState,
    raw_id: Option<&str>,
    not_found: &'static str,
) -> Result<User, ApiError> {
    let Some(id) = parse_id(raw_id) else {
        return Err(ApiError::NotFound(not_found));
    };
    match state.users.find_by_id(id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ApiError::NotFound(not_found)),
        Err(e) => Err(ApiError::storage(not_found, e)),
    }
}
