//! 令牌处理器

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::{info, warn};

use super::model::{AccessToken, RefreshRequest, TokenRequest};
use crate::app::AppState;
use crate::core::{auth::TokenPair, error::CoreError};

pub async fn obtain_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, CoreError> {
    let Json(payload) = payload?;
    let (username, password) = payload.validated()?;

    let pair = state.tokens.obtain_pair(&username, &password).map_err(|e| {
        warn!("Failed login for user: {}", username);
        e
    })?;
    info!("Token pair issued for user: {}", username);
    Ok(Json(pair))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AccessToken>, CoreError> {
    let Json(payload) = payload?;
    let refresh = payload.validated()?;

    let access = state.tokens.refresh(&refresh)?;
    Ok(Json(AccessToken { access }))
}
