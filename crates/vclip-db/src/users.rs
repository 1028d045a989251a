//! User accounts.

use sqlx::PgPool;
use vclip_models::ids::UserId;
use vclip_models::user::User;

use crate::error::{DbError, DbResult};

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: UserId) -> DbResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "select id, email, created_at from users where id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(format!("user {id}")))?;
        Ok(row.into())
    }

    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "select id, email, created_at from users where email = $1",
        )
        .bind(vclip_models::user::normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    /// Insert a user, doing nothing if the email already exists, and return
    /// the resulting row either way.
    pub async fn upsert(&self, user: &User) -> DbResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            insert into users (id, email, created_at)
            values ($1, $2, $3)
            on conflict (email) do update set email = excluded.email
            returning id, email, created_at
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::from(row.id),
            email: row.email,
            created_at: row.created_at,
        }
    }
}
