use serde::Serialize;

use crate::blogs::repo::Blog;

/// Blog record as returned by the list endpoint. Field names follow the
/// stored columns, so `userid` stays flat.
#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: i64,
    #[serde(rename = "userid")]
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

impl From<Blog> for BlogResponse {
    fn from(b: Blog) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            title: b.title,
            description: b.description,
            image: b.image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateBlogResponse {
    pub message: String,
    #[serde(rename = "blogId")]
    pub blog_id: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdateBlogResponse {
    pub message: String,
    #[serde(rename = "updatedImage")]
    pub updated_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
