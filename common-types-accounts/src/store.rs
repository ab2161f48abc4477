use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{
    RunQueryDsl,
    scoped_futures::ScopedFutureExt,
};

use crate::{
    Error::StoreError,
    Schema::{hooked_sql_types::UserRole, users},
    State::PostgresPool,
    Types::{AdminRecord, ProvisionOutcome},
};

mod db;

use db::{ExistingUser, NewUser, PromoteUser};

/// Durable storage for admin accounts. Owns email uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn create_admin(&self, email: &str, password_hash: &str) -> Result<ProvisionOutcome, StoreError>;
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Reject,
    Promote(i32),
    Insert,
}

fn decide(existing: Option<&ExistingUser>) -> Action {
    match existing {
        Some(user) if user.role == UserRole::Admin => Action::Reject,
        Some(user) => Action::Promote(user.id),
        None => Action::Insert,
    }
}

// Losing an insert race to another writer shows up as a unique violation
fn map_insert_error(err: DieselError, email: &str) -> StoreError {
    if matches!(err, DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) {
        tracing::warn!("Conflicting emails found, rejecting request, {err}");
        StoreError::DuplicateEmail(email.to_owned())
    } else {
        StoreError::from(err)
    }
}

pub struct PostgresAdminStore {
    pool: PostgresPool,
}

impl PostgresAdminStore {
    pub fn new(pool: PostgresPool) -> Self {
        PostgresAdminStore { pool }
    }
}

// 1. Fetch a connection from the pool
// 2. Look the email up inside a serializable transaction
// 3. Already an admin: reject as a duplicate
// 4. Regular user: promote to admin and replace the password hash
// 5. Unknown: insert a fresh admin row
//
#[async_trait]
impl AdminStore for PostgresAdminStore {
    #[tracing::instrument(skip(self, password_hash))]
    async fn create_admin(&self, email: &str, password_hash: &str) -> Result<ProvisionOutcome, StoreError> {
        tracing::info!("Querying database");
        let mut conn = self.pool.get().await.map_err(|err| {
            tracing::error!("Failed to fetch Postgres connection, {err}");
            StoreError::Store(format!("failed to connect to the database, {err}"))
        })?;

        let email = email.to_owned();
        let password_hash = password_hash.to_owned();
        conn.build_transaction()
            .read_write()
            .serializable()
            .run::<_, StoreError, _>(move |conn| async move {
                let existing: Option<ExistingUser> = users::table
                    .filter(users::email.eq(&email))
                    .select(ExistingUser::as_select())
                    .first(conn)
                    .await
                    .optional()?;

                match decide(existing.as_ref()) {
                    Action::Reject => {
                        tracing::warn!("Email already belongs to an admin, rejecting request");
                        Err(StoreError::DuplicateEmail(email))
                    }
                    Action::Promote(id) => {
                        tracing::info!("Promoting existing user {id} to admin");
                        let record = diesel::update(users::table.find(id))
                            .set(&PromoteUser {
                                role: UserRole::Admin,
                                password_hash: &password_hash,
                                updated_at: Utc::now(),
                            })
                            .returning(AdminRecord::as_returning())
                            .get_result(conn)
                            .await?;
                        Ok(ProvisionOutcome::Promoted(record))
                    }
                    Action::Insert => {
                        let record = diesel::insert_into(users::table)
                            .values(&NewUser {
                                email: &email,
                                password_hash: &password_hash,
                                role: UserRole::Admin,
                            })
                            .returning(AdminRecord::as_returning())
                            .get_result(conn)
                            .await
                            .map_err(|err| map_insert_error(err, &email))?;
                        tracing::info!("Inserted admin {}", record.id);
                        Ok(ProvisionOutcome::Created(record))
                    }
                }
            }.scope_boxed())
            .await
    }
}
