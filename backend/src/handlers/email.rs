//! HTTP handler for the email-sending endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::mailer::EmailMessage;
use crate::AppState;

/// Email request schema
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Invalid recipient address"))]
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub html: bool,
}

#[derive(Serialize)]
pub struct EmailResponse {
    pub status: String,
    pub message: String,
}

/// POST /api/send-email
///
/// The schema is validated before the relay is consulted, so a malformed
/// recipient never triggers a connection.
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> AppResult<Json<EmailResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid email request: {e}")))?;

    let mailer = state.mailer.as_ref().ok_or_else(|| {
        AppError::Configuration("Email service not configured. Contact administrator.".to_string())
    })?;

    let message = EmailMessage {
        to: request.to.clone(),
        subject: request.subject,
        body: request.body,
        html: request.html,
    };
    mailer.send(&message).await?;

    Ok(Json(EmailResponse {
        status: "success".to_string(),
        message: format!("Email sent to {}", request.to),
    }))
}
