//! Share CRUD and public access handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::info;

use sharelink_core::error::AppError;
use sharelink_entity::share::ShareView;
use sharelink_service::{AccessIntent, ShareAccess, SharedDownload};

use crate::dto::request::{
    CreateShareRequest, ListSharesQuery, ShareUnlockRequest, UpdateShareRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse, SharedContentResponse};
use crate::extractors::{AuthUser, parse_uuid};
use crate::state::AppState;

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListSharesQuery>,
) -> Result<Json<ApiResponse<Vec<ShareView>>>, AppError> {
    let shares = state
        .share_service
        .list_shares(&auth, query.path.as_deref())
        .await?;

    let links = state.share_service.links();
    let views = shares.iter().map(|s| links.view(s)).collect();
    Ok(Json(ApiResponse::ok(views)))
}

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<Json<ApiResponse<ShareView>>, AppError> {
    let share = state.share_service.create_share(&auth, req.into()).await?;
    Ok(Json(ApiResponse::ok(state.share_service.links().view(&share))))
}

/// GET /api/shares/{id} and GET /api/shares/{id}/info
pub async fn get_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShareView>>, AppError> {
    let share_id = parse_uuid(&id)?;
    let share = state.share_service.get_share(&auth, share_id).await?;
    Ok(Json(ApiResponse::ok(state.share_service.links().view(&share))))
}

/// PUT /api/shares/{id}
pub async fn update_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateShareRequest>,
) -> Result<Json<ApiResponse<ShareView>>, AppError> {
    let share_id = parse_uuid(&id)?;
    let share = state
        .share_service
        .update_share(&auth, share_id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(state.share_service.links().view(&share))))
}

/// DELETE /api/shares/{id}
pub async fn delete_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let share_id = parse_uuid(&id)?;
    state.share_service.delete_share(&auth, share_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Share deleted".to_string(),
    })))
}

/// GET /api/s/{token}
pub async fn access_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    respond(&state, &token, AccessIntent::Read).await
}

/// POST /api/s/{token}
pub async fn unlock_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<ShareUnlockRequest>,
) -> Result<Response, AppError> {
    respond(
        &state,
        &token,
        AccessIntent::Unlock {
            password: req.password,
        },
    )
    .await
}

async fn respond(state: &AppState, token: &str, intent: AccessIntent) -> Result<Response, AppError> {
    let body = match state.access_service.access(token, intent).await? {
        ShareAccess::Download(download) => return stream_download(download),
        ShareAccess::PasswordRequired { path } => SharedContentResponse::PasswordRequired {
            requires_password: true,
            path,
        },
        ShareAccess::Listing {
            path,
            permission,
            files,
        } => SharedContentResponse::Listing {
            path,
            permission,
            files,
        },
        ShareAccess::Preview {
            path,
            permission,
            file,
        } => SharedContentResponse::Preview {
            path,
            permission,
            file,
        },
    };
    Ok(Json(ApiResponse::ok(body)).into_response())
}

/// Streams an authorized download as an attachment.
fn stream_download(download: SharedDownload) -> Result<Response, AppError> {
    info!(
        file = %download.file_name,
        size = download.size,
        downloads = download.downloads,
        "Serving shared file"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                sanitize_filename(&download.file_name)
            ),
        )
        .header(header::CONTENT_LENGTH, download.size)
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// Makes a file name safe to embed in a quoted header parameter.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}
