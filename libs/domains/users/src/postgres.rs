use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, FromQueryResult,
    SqlErr, Statement, TransactionTrait, Value,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{FieldMask, User, UserFilter};
use crate::repository::UserRepository;

/// Name of the unique constraint on `users.email`.
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(Clone)]
enum Connection {
    Pool(DatabaseConnection),
    Transaction(Arc<DatabaseTransaction>),
}

/// PostgreSQL implementation of UserRepository using SeaORM raw statements.
///
/// A repository obtained inside [`PgUserRepository::transaction`] runs every
/// statement on that transaction.
#[derive(Clone)]
pub struct PgUserRepository {
    conn: Connection,
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    nickname: String,
    password: String,
    email: String,
    country: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            nickname: row.nickname,
            password: row.password,
            email: row.email,
            country: row.country,
            created_at: Some(row.created_at),
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct InsertedRow {
    id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct TouchedRow {
    updated_at: DateTime<Utc>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            conn: Connection::Pool(db),
        }
    }

    pub fn in_transaction(&self) -> bool {
        matches!(self.conn, Connection::Transaction(_))
    }

    /// Run `f` against a repository bound to a database transaction.
    ///
    /// Commits when `f` returns `Ok`, rolls back otherwise. Called on a
    /// repository that is already inside a transaction, `f` joins it and the
    /// outer scope decides the outcome.
    pub async fn transaction<T, F>(&self, f: F) -> UserResult<T>
    where
        T: Send,
        F: for<'r> FnOnce(&'r PgUserRepository) -> BoxFuture<'r, UserResult<T>> + Send,
    {
        let db = match &self.conn {
            Connection::Transaction(_) => return f(self).await,
            Connection::Pool(db) => db,
        };

        let txn = Arc::new(db.begin().await?);
        let scoped = PgUserRepository {
            conn: Connection::Transaction(Arc::clone(&txn)),
        };
        let result = f(&scoped).await;
        drop(scoped);

        // Dropping an unfinished transaction rolls it back.
        let txn = Arc::try_unwrap(txn)
            .map_err(|_| UserError::Internal("transaction still referenced after scope".into()))?;

        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    async fn fetch_one<M: FromQueryResult + Send + Sync>(
        &self,
        stmt: Statement,
    ) -> Result<Option<M>, DbErr> {
        let query = M::find_by_statement(stmt);
        match &self.conn {
            Connection::Pool(db) => query.one(db).await,
            Connection::Transaction(txn) => query.one(txn.as_ref()).await,
        }
    }

    async fn fetch_all<M: FromQueryResult + Send + Sync>(
        &self,
        stmt: Statement,
    ) -> Result<Vec<M>, DbErr> {
        let query = M::find_by_statement(stmt);
        match &self.conn {
            Connection::Pool(db) => query.all(db).await,
            Connection::Transaction(txn) => query.all(txn.as_ref()).await,
        }
    }

    async fn execute(&self, stmt: Statement) -> Result<u64, DbErr> {
        let result = match &self.conn {
            Connection::Pool(db) => db.execute_raw(stmt).await?,
            Connection::Transaction(txn) => txn.execute_raw(stmt).await?,
        };
        Ok(result.rows_affected())
    }
}

fn is_email_conflict(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains(EMAIL_CONSTRAINT))
}

fn map_write_err(err: DbErr) -> UserError {
    if is_email_conflict(&err) {
        UserError::DuplicateEmail
    } else {
        err.into()
    }
}

pub(crate) fn get_statement(id: Uuid) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT * FROM users WHERE id = $1",
        [id.into()],
    )
}

pub(crate) fn list_statement(filter: &UserFilter, offset: u64, limit: u64) -> Statement {
    let mut sql = String::from("SELECT * FROM users");
    let mut values: Vec<Value> = Vec::with_capacity(filter.countries.len() + 2);

    if !filter.is_empty() {
        let placeholders: Vec<String> = filter
            .countries
            .iter()
            .map(|country| {
                values.push(country.clone().into());
                format!("${}", values.len())
            })
            .collect();
        sql.push_str(&format!(" WHERE country IN ({})", placeholders.join(", ")));
    }

    // Postgres has no unsigned integers; clamp to the BIGINT range.
    values.push(i64::try_from(limit).unwrap_or(i64::MAX).into());
    values.push(i64::try_from(offset).unwrap_or(i64::MAX).into());
    sql.push_str(&format!(
        " ORDER BY created_at, id LIMIT ${} OFFSET ${}",
        values.len() - 1,
        values.len()
    ));

    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

pub(crate) fn insert_statement(user: &User) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
            INSERT INTO users (first_name, last_name, nickname, password, email, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at
        "#,
        [
            user.first_name.clone().into(),
            user.last_name.clone().into(),
            user.nickname.clone().into(),
            user.password.clone().into(),
            user.email.clone().into(),
            user.country.clone().into(),
        ],
    )
}

/// `UPDATE` touching only the masked columns. `None` for an empty mask.
pub(crate) fn update_statement(user: &User, mask: &FieldMask) -> Option<Statement> {
    if mask.is_empty() {
        return None;
    }

    let mut values: Vec<Value> = vec![user.id.into()];
    let assignments: Vec<String> = mask
        .iter()
        .map(|field| {
            values.push(user.value_of(field).to_owned().into());
            format!("{} = ${}", field.column(), values.len())
        })
        .collect();

    let sql = format!(
        "UPDATE users SET {}, updated_at = now() WHERE id = $1 RETURNING updated_at",
        assignments.join(", ")
    );
    Some(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
}

pub(crate) fn delete_statement(id: Uuid) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "DELETE FROM users WHERE id = $1",
        [id.into()],
    )
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get(&self, id: Uuid) -> UserResult<User> {
        self.fetch_one::<UserRow>(get_statement(id))
            .await?
            .map(User::from)
            .ok_or(UserError::NotFound)
    }

    async fn list(&self, filter: &UserFilter, offset: u64, limit: u64) -> UserResult<Vec<User>> {
        let rows = self
            .fetch_all::<UserRow>(list_statement(filter, offset, limit))
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: &mut User) -> UserResult<()> {
        let row = self
            .fetch_one::<InsertedRow>(insert_statement(user))
            .await
            .map_err(map_write_err)?
            .ok_or_else(|| UserError::Internal("insert returned no row".into()))?;

        user.id = row.id;
        user.created_at = Some(row.created_at);
        user.updated_at = None;
        Ok(())
    }

    async fn update(&self, user: &mut User, mask: &FieldMask) -> UserResult<()> {
        let stmt = update_statement(user, mask)
            .ok_or_else(|| UserError::validation("missing update fields"))?;

        let row = self
            .fetch_one::<TouchedRow>(stmt)
            .await
            .map_err(map_write_err)?
            .ok_or(UserError::NotFound)?;

        user.updated_at = Some(row.updated_at);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> UserResult<()> {
        match self.execute(delete_statement(id)).await? {
            0 => Err(UserError::NotFound),
            _ => Ok(()),
        }
    }
}
