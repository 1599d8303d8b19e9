use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::provider::Provider;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/providers", post(create_provider).get(list_providers))
}

#[derive(Deserialize)]
pub struct CreateProviderRequest {
    pub code: String,
    pub name: String,
    pub phone: Option<String>,
}

async fn create_provider(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProviderRequest>,
) -> Result<Json<Provider>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.code.trim().is_empty() {
        return Err(AppError::BadRequest("code cannot be empty".to_string()));
    }

    let provider = Provider {
        id: Uuid::new_v4(),
        code: payload.code,
        name: payload.name,
        phone: payload.phone,
        created_at: Utc::now(),
    };

    state.providers.insert(provider.id, provider.clone());
    Ok(Json(provider))
}

async fn list_providers(State(state): State<Arc<AppState>>) -> Json<Vec<Provider>> {
    let providers = state
        .providers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Json(providers)
}
