use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

use super::dto::{BlogResponse, CreateBlogResponse, MessageResponse, UpdateBlogResponse};
use super::repo::Blog;
use super::services::{authorize_owner, discard_upload, read_blog_form, store_upload};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/blogs", get(list_blogs))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blog", post(create_blog))
        .route("/blog/:id", put(update_blog).delete(delete_blog))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// GET /blogs, open to anyone.
#[instrument(skip(state))]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let blogs = Blog::list(&state.db).await?;
    Ok(Json(blogs.into_iter().map(BlogResponse::from).collect()))
}

/// POST /blog (multipart: title, description, optional image)
#[instrument(skip(state, mp))]
pub async fn create_blog(
    State(state): State<AppState>,
    user: AuthUser,
    mut mp: Multipart,
) -> Result<Json<CreateBlogResponse>, ApiError> {
    let form = read_blog_form(&mut mp).await?;

    let stored = match form.image {
        Some(upload) => Some(store_upload(&state.images, upload).await?),
        None => None,
    };

    let blog = match Blog::create(
        &state.db,
        user.user_id,
        &form.title,
        &form.description,
        stored.as_deref(),
    )
    .await
    {
        Ok(blog) => blog,
        Err(e) => {
            // The row never landed, so the file on disk belongs to nobody.
            if let Some(filename) = &stored {
                discard_upload(&state.images, filename).await;
            }
            return Err(e.into());
        }
    };

    info!(blog_id = blog.id, "blog created");
    Ok(Json(CreateBlogResponse {
        message: "Blog created successfully".into(),
        blog_id: blog.id,
    }))
}

/// PUT /blog/:id (multipart: title, description, optional image), owner only.
#[instrument(skip(state, mp))]
pub async fn update_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    mut mp: Multipart,
) -> Result<Json<UpdateBlogResponse>, ApiError> {
    authorize_owner(&state.db, id, user.user_id).await?;

    let form = read_blog_form(&mut mp).await?;

    let stored = match form.image {
        Some(upload) => Some(store_upload(&state.images, upload).await?),
        None => None,
    };

    match Blog::update(&state.db, id, &form.title, &form.description, stored.as_deref()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            // The row vanished between the ownership check and the write.
            if let Some(filename) = &stored {
                discard_upload(&state.images, filename).await;
            }
            return Err(ApiError::NotFound);
        }
        Err(e) => {
            if let Some(filename) = &stored {
                discard_upload(&state.images, filename).await;
            }
            return Err(e.into());
        }
    }

    info!(blog_id = id, updated_image = ?stored, "blog updated");
    Ok(Json(UpdateBlogResponse {
        message: "Blog updated successfully".into(),
        updated_image: stored,
    }))
}

/// DELETE /blog/:id, owner only. Any image file stays on disk.
#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    authorize_owner(&state.db, id, user.user_id).await?;

    if !Blog::delete(&state.db, id).await? {
        return Err(ApiError::NotFound);
    }

    info!(blog_id = id, "blog deleted");
    Ok(Json(MessageResponse {
        message: "Blog deleted successfully".into(),
    }))
}
