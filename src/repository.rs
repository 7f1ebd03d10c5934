use crate::models::{Post, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, allowing the
/// handlers to interact with the data layer without knowing the concrete
/// implementation (Postgres in production, mocks in tests).
///
/// Every method returns `Result<_, sqlx::Error>`: store failures propagate to the
/// handler boundary where they are converted into the `ApiError` taxonomy, never
/// leaked to clients as raw internal errors.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    /// Looks up a user by email. Used by signin for credential resolution.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    /// Inserts a new user. The unique index on `users.email` is the uniqueness
    /// authority: a duplicate email surfaces as a unique-violation database error,
    /// which the signup handler maps to a 409 Conflict.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>;

    // --- Posts ---
    async fn create_post(
        &self,
        title: &str,
        content: &str,
        author_id: Uuid,
    ) -> Result<Post, sqlx::Error>;
    /// Updates title and content by id. Ownership is checked by the handler before
    /// this runs; `None` means the post no longer exists.
    async fn update_post(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Post>, sqlx::Error>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error>;
    /// Returns all posts, newest first. No pagination; the bulk listing is an
    /// acknowledged unbounded scan.
    async fn list_posts(&self) -> Result<Vec<Post>, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL
/// through a shared connection pool. Each call checks a connection out of the pool
/// for the duration of the query and returns it on every exit path.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        author_id: Uuid,
    ) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, content, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, title, content, author_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_post(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, content = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, author_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT id, title, content, author_id, created_at, updated_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_posts(&self) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author_id, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
