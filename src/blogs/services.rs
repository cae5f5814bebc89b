use std::sync::Arc;

use axum::extract::Multipart;
use bytes::Bytes;
use sqlx::SqlitePool;
use tracing::warn;

use crate::blogs::repo::Blog;
use crate::error::ApiError;
use crate::storage::{stored_filename, ImageStore};

/// Load the target record and check that the acting user owns it.
/// Existence is decided before ownership, so a missing id is a 404 for
/// everyone and non-owners learn nothing from the distinction.
pub async fn authorize_owner(
    db: &SqlitePool,
    blog_id: i64,
    user_id: i64,
) -> Result<Blog, ApiError> {
    let blog = Blog::get(db, blog_id).await?.ok_or(ApiError::NotFound)?;
    if blog.user_id != user_id {
        warn!(
            blog_id,
            user_id,
            owner_id = blog.user_id,
            "mutation blocked for non-owner"
        );
        return Err(ApiError::Forbidden);
    }
    Ok(blog)
}

#[derive(Debug)]
pub struct BlogForm {
    pub title: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug)]
pub struct ImageUpload {
    pub original_name: String,
    pub body: Bytes,
}

/// Drain a `multipart/form-data` body into a validated form. Unknown
/// fields are ignored; an empty image part (file input left blank)
/// counts as no upload.
pub async fn read_blog_form(multipart: &mut Multipart) -> Result<BlogForm, ApiError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("invalid title field: {e}")))?,
                );
            }
            Some("description") => {
                description = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("invalid description field: {e}"))
                })?);
            }
            Some("image") => {
                let original_name = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("invalid image field: {e}")))?;
                if !body.is_empty() {
                    image = Some(ImageUpload {
                        original_name,
                        body,
                    });
                }
            }
            _ => {}
        }
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("title is required".into()))?;
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::BadRequest("description is required".into()))?;

    Ok(BlogForm {
        title,
        description,
        image,
    })
}

/// Write an upload to the image store under a freshly generated name and
/// return that name.
pub async fn store_upload(
    images: &Arc<dyn ImageStore>,
    upload: ImageUpload,
) -> anyhow::Result<String> {
    let filename = stored_filename(&upload.original_name);
    images.save(&filename, upload.body).await?;
    Ok(filename)
}

/// Best-effort cleanup of a file whose database row never materialized.
pub async fn discard_upload(images: &Arc<dyn ImageStore>, filename: &str) {
    if let Err(e) = images.remove(filename).await {
        warn!(error = %e, filename, "failed to remove orphaned upload");
    }
}
