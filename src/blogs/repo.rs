use sqlx::{FromRow, SqlitePool};

/// Blog row. `image` holds the stored filename under the upload
/// directory, not a full path.
#[derive(Debug, Clone, FromRow)]
pub struct Blog {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

impl Blog {
    pub async fn create(
        db: &SqlitePool,
        user_id: i64,
        title: &str,
        description: &str,
        image: Option<&str>,
    ) -> sqlx::Result<Blog> {
        sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (userid, title, description, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, userid AS user_id, title, description, image
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(image)
        .fetch_one(db)
        .await
    }

    /// All records in creation order, regardless of owner.
    pub async fn list(db: &SqlitePool) -> sqlx::Result<Vec<Blog>> {
        sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, userid AS user_id, title, description, image
            FROM blogs
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Blog>> {
        sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, userid AS user_id, title, description, image
            FROM blogs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Partial update: title and description are always written, the image
    /// column only when a replacement was uploaded. `None` result means the
    /// row no longer exists.
    pub async fn update(
        db: &SqlitePool,
        id: i64,
        title: &str,
        description: &str,
        image: Option<&str>,
    ) -> sqlx::Result<Option<Blog>> {
        let query = match image {
            Some(image) => sqlx::query_as::<_, Blog>(
                r#"
                UPDATE blogs
                SET title = $1, description = $2, image = $3
                WHERE id = $4
                RETURNING id, userid AS user_id, title, description, image
                "#,
            )
            .bind(title)
            .bind(description)
            .bind(image)
            .bind(id),
            None => sqlx::query_as::<_, Blog>(
                r#"
                UPDATE blogs
                SET title = $1, description = $2
                WHERE id = $3
                RETURNING id, userid AS user_id, title, description, image
                "#,
            )
            .bind(title)
            .bind(description)
            .bind(id),
        };
        query.fetch_optional(db).await
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
