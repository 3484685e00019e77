use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Json,
};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::WebhookAck;
use crate::services::WebhookRequest;

pub const SECRET_HEADER: &str = "x-webhook-secret";

/// Receive a webhook delivery (single event or batch)
/// POST /webhook
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let request = WebhookRequest {
        body,
        secret_header: header_string(&headers, SECRET_HEADER),
        content_type: header_string(&headers, header::CONTENT_TYPE.as_str()),
    };

    state.processor.process(request).await.map(Json)
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
