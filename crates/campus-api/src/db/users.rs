//! Account persistence operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Role;

/// An account row, with the role parsed.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub password_salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for account creation.
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub password_salt: String,
    pub password_hash: String,
}

/// Insert a new account. Fails on duplicate email (unique constraint).
pub async fn insert(pool: &PgPool, new: &NewUser) -> Result<UserRecord, sqlx::Error> {
    let id = Uuid::new_v4();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO users (id, email, full_name, role, password_salt, password_hash, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(id)
    .bind(&new.email)
    .bind(&new.full_name)
    .bind(new.role.as_str())
    .bind(&new.password_salt)
    .bind(&new.password_hash)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(UserRecord {
        id,
        email: new.email.clone(),
        full_name: new.full_name.clone(),
        role: new.role,
        password_salt: new.password_salt.clone(),
        password_hash: new.password_hash.clone(),
        created_at,
    })
}

/// Fetch an account by email.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, full_name, role, password_salt, password_hash, created_at
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserRow::into_record))
}

/// Fetch an account by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, full_name, role, password_salt, password_hash, created_at
         FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserRow::into_record))
}

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
    password_salt: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> UserRecord {
        // READ path: an unknown role in the database defaults to the least
        // privileged role, logged at ERROR because it may indicate prior
        // data corruption.
        let role: Role = self.role.parse().unwrap_or_else(|e| {
            tracing::error!(
                id = %self.id,
                role = %self.role,
                error = %e,
                "unknown role in database — defaulting to student; investigate"
            );
            Role::Student
        });

        UserRecord {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role,
            password_salt: self.password_salt,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}
