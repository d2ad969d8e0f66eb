use crate::app::server::AppState;
use crate::domain::model::{CompoundInput, CompoundRecord, DocumentPreview, LookupNamespace};
use crate::utils::error::ProxyError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus { status: 404, .. } => StatusCode::NOT_FOUND,
            Self::Http(_)
            | Self::UpstreamStatus { .. }
            | Self::UpstreamUnavailable { .. }
            | Self::Resolution { .. }
            | Self::PropertyFetch { .. }
            | Self::SerializationError(_) => StatusCode::BAD_GATEWAY,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "invalid_input",
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::BAD_GATEWAY => "upstream_unavailable",
            _ => "internal_error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {}", self);
        } else {
            tracing::warn!("⚠️ Request rejected: {}", self);
        }

        let body = json!({
            "error": self.error_code(),
            "message": self.user_friendly_message(),
        });
        (status, Json(body)).into_response()
    }
}

pub async fn root_handler() -> Json<Value> {
    Json(json!({"Hello": "World"}))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn augment_handler(
    State(state): State<AppState>,
    payload: Result<Json<Vec<CompoundInput>>, JsonRejection>,
) -> Result<Json<Vec<CompoundRecord>>, ProxyError> {
    let Json(inputs) =
        payload.map_err(|rejection| ProxyError::invalid_input(rejection.body_text()))?;

    let records = state.augmentor.augment(&inputs).await?;
    Ok(Json(records))
}

/// 原樣轉發 PubChem 的完整化合物紀錄
pub async fn compound_record_handler(
    State(state): State<AppState>,
    Path((namespace, identifier)): Path<(String, String)>,
) -> Result<Json<Value>, ProxyError> {
    let namespace = LookupNamespace::parse(&namespace).ok_or_else(|| {
        ProxyError::invalid_input(format!(
            "unsupported namespace '{}', expected one of name, cid, smiles, inchikey",
            namespace
        ))
    })?;

    let record = state.registry.fetch_record(namespace, &identifier).await?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub url: String,
}

pub async fn preview_handler(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<DocumentPreview>, ProxyError> {
    let preview = state.previewer.preview(&params.url).await?;
    Ok(Json(preview))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProxyError::invalid_input("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::UpstreamStatus {
                status: 404,
                url: "u".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProxyError::UpstreamStatus {
                status: 503,
                url: "u".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ProxyError::ConfigError {
                message: "m".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_root_and_health() {
        let Json(root) = tokio_test::block_on(root_handler());
        assert_eq!(root["Hello"], "World");
        let Json(health) = tokio_test::block_on(health_handler());
        assert_eq!(health["status"], "ok");
    }
}
