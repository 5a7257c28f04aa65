use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::EmailAddress;
use crate::domain::credential::models::NewCredential;
use crate::domain::credential::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = AuthError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(Credential {
            id: CredentialId(row.id),
            name: row.name,
            email: EmailAddress::new(row.email.clone()).map_err(|e| {
                AuthError::Store(format!("stored email {:?} is invalid: {}", row.email, e))
            })?,
            password_hash: row.password_hash,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn insert(&self, credential: NewCredential) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (name, email, password_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&credential.name)
        .bind(credential.email.as_str())
        .bind(&credential.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::Store(format!(
                        "email already registered: {}",
                        credential.email
                    ));
                }
            }
            AuthError::Store(e.to_string())
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credential>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, name, email, password_hash
            FROM credentials
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        row.map(Credential::try_from).transpose()
    }
}
