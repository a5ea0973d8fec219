use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use stubby_core::{ShortenerError, StorageError};
use tracing::info;

pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(request): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>> {
    let original_url = request.validated_url()?;

    let mapping = state.shortener().shorten(original_url).await?;
    info!(code = %mapping.short_code, id = %mapping.id, "shortened url");

    Ok(Json(ShortenResponse {
        short_url: state.short_url(&mapping.short_code),
        short_code: mapping.short_code.to_string(),
        original_url: mapping.original_url,
        created_at: mapping.created_at,
        expires_at: mapping.expires_at,
    }))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let Some(original_url) = state.shortener().resolve(&short_code).await? else {
        return Err(AppError::NotFound(short_code));
    };

    // Stored urls passed validation, but rows may predate it.
    let location = HeaderValue::try_from(original_url.as_str()).map_err(|_| {
        ShortenerError::Storage(StorageError::InvalidData(format!(
            "stored url for '{short_code}' is not a valid Location header"
        )))
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}
