use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::dto::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let user = state
        .login
        .login(&client, &body.email, &body.password, &body.user_type)
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user,
    }))
}
