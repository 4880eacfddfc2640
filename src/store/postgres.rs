use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Connection, PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};
use std::time::Duration;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use super::{CredentialStore, NewUser, StoreError, UserRecord};

const USER_COLUMNS: &str = r"
    id, fullname, email, phonenumber, password_hash,
    EXTRACT(EPOCH FROM created_at)::BIGINT AS created_at_unix,
    EXTRACT(EPOCH FROM updated_at)::BIGINT AS updated_at_unix
";

/// `PostgreSQL` backed store; expects the schema in `sql/schema.sql`.
#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a small connection pool against `dsn`.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn connect(dsn: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }

    async fn fetch_one_by(
        &self,
        query: &str,
        bind: Bind<'_>,
    ) -> Result<Option<UserRecord>, StoreError> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let query = sqlx::query(query);
        let query = match bind {
            Bind::Email(email) => query.bind(email),
            Bind::Id(id) => query.bind(id),
        };
        let row = query.fetch_optional(&self.pool).instrument(span).await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }
}

enum Bind<'a> {
    Email(&'a str),
    Id(Uuid),
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        fullname: row.try_get("fullname")?,
        email: row.try_get("email")?,
        phonenumber: row.try_get("phonenumber")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at_unix")?,
        updated_at: row.try_get("updated_at_unix")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        self.fetch_one_by(&query, Bind::Email(email)).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        self.fetch_one_by(&query, Bind::Id(id)).await
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        // No prior existence check: the unique index on email decides.
        let query = format!(
            r"
            INSERT INTO users (fullname, email, phonenumber, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        );
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(&user.fullname)
            .bind(&user.email)
            .bind(&user.phonenumber)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(user_from_row(&row)?),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(StoreError::Backend(
                anyhow::Error::new(err).context("failed to insert user"),
            )),
        }
    }

    async fn save(&self, user: &UserRecord) -> Result<bool, StoreError> {
        let query = r"
            UPDATE users
            SET fullname = $2,
                phonenumber = $3,
                password_hash = $4,
                updated_at = NOW()
            WHERE id = $1
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(user.id)
            .bind(&user.fullname)
            .bind(&user.phonenumber)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;
        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;
        Ok(())
    }
}
