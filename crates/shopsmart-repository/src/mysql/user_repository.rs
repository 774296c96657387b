//! MySQL user repository implementation.

use super::{count_to_u64, parse_enum, parse_id};
use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopsmart_core::{normalize_email, Page, PageRequest, ShopError, ShopResult, User, UserId};
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, profile_photo, created_at, updated_at";

/// MySQL user repository implementation.
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String, // MySQL stores UUID as CHAR(36)
    name: String,
    email: String,
    password_hash: String,
    role: String,
    profile_photo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = ShopError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_id("users.id", &row.id)?,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: parse_enum("users.role", &row.role)?,
            profile_photo: row.profile_photo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> ShopResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> ShopResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<MySql> = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows = query.build_query_as::<UserRow>().fetch_all(self.pool.inner()).await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_email(&self, email: &str) -> ShopResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(normalize_email(email))
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> ShopResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = ? LIMIT 1")
            .bind(normalize_email(email))
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }

    async fn find_all(&self, page: PageRequest) -> ShopResult<Page<User>> {
        debug!("Finding all users, page: {}, size: {}", page.page, page.size);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        let users = rows.into_iter().map(User::try_from).collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(users, page, count_to_u64(total)))
    }

    async fn save(&self, user: &User) -> ShopResult<User> {
        debug!("Saving new user: {}", user.email);

        // MySQL doesn't support RETURNING, so insert then select
        sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, role, profile_photo, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.profile_photo)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| ShopError::internal("Failed to fetch inserted user"))
    }

    async fn update(&self, user: &User) -> ShopResult<User> {
        debug!("Updating user: {}", user.id);

        sqlx::query(
            r"
            UPDATE users
            SET name = ?, email = ?, password_hash = ?, role = ?, profile_photo = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.profile_photo)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(self.pool.inner())
        .await?;

        // rows_affected is 0 for an unchanged row, so existence is checked by re-reading
        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| ShopError::not_found("User", user.id))
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}
