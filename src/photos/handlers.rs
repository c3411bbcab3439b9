use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::{ensure_owner, AuthUser},
    error::AppError,
    photos::{
        dto::PhotoRequest,
        repo_types::{NewPhoto, Photo, PhotoView},
    },
    response::{message, CreatedResponse, DataResponse, MessageResponse},
    state::AppState,
    validation::{parse_id, ValidJson},
};

pub fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/photos", get(list_photos).post(create_photo))
        .route(
            "/photos/:id",
            get(get_photo).put(update_photo).delete(delete_photo),
        )
}

fn photo_not_found() -> AppError {
    AppError::NotFound("Photo not found".into())
}

#[instrument(skip_all, fields(caller = identity.id))]
pub async fn list_photos(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<DataResponse<Vec<PhotoView>>>, AppError> {
    let photos = state.photos.list_by_owner(identity.id).await?;
    Ok(Json(DataResponse { data: photos }))
}

#[instrument(skip_all, fields(caller = identity.id, path_id = %raw_id))]
pub async fn get_photo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<DataResponse<PhotoView>>, AppError> {
    let id = parse_id(&raw_id, "photo")?;
    let photo = state
        .photos
        .find_view(id, identity.id)
        .await?
        .ok_or_else(photo_not_found)?;
    Ok(Json(DataResponse { data: photo }))
}

#[instrument(skip_all, fields(caller = identity.id))]
pub async fn create_photo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidJson(payload): ValidJson<PhotoRequest>,
) -> Result<(StatusCode, Json<CreatedResponse<Photo>>), AppError> {
    let photo = state
        .photos
        .create(NewPhoto {
            title: payload.title,
            caption: payload.caption,
            photo_url: payload.photo_url,
            user_id: identity.id,
        })
        .await?;

    info!(photo_id = photo.id, "photo added");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Photo successfully added",
            data: photo,
        }),
    ))
}

/// Someone else's photo is indistinguishable from a missing one here.
#[instrument(skip_all, fields(caller = identity.id, path_id = %raw_id))]
pub async fn update_photo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(raw_id): Path<String>,
    ValidJson(payload): ValidJson<PhotoRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&raw_id, "photo")?;
    let mut photo = state
        .photos
        .find_owned(id, identity.id)
        .await?
        .ok_or_else(photo_not_found)?;

    photo.title = payload.title;
    photo.caption = payload.caption;
    photo.photo_url = payload.photo_url;
    state.photos.save(&photo).await?;

    info!(photo_id = id, "photo updated");
    Ok(Json(message("Photo successfully updated")))
}

#[instrument(skip_all, fields(caller = identity.id, path_id = %raw_id))]
pub async fn delete_photo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&raw_id, "photo")?;
    let photo = state
        .photos
        .find_by_id(id)
        .await?
        .ok_or_else(photo_not_found)?;

    ensure_owner(
        &identity,
        photo.user_id,
        "You do not have access to delete this photo",
    )?;

    if !state.photos.delete(id).await? {
        return Err(photo_not_found());
    }
    info!(photo_id = id, "photo deleted");
    Ok(Json(message("Photo successfully deleted")))
}
