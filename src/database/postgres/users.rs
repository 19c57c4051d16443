use sqlx::PgConnection;

use crate::database::{ErrorExt, Result};
use crate::schema::{NewUser, User, UserChanges};
use crate::types::id::{marker::UserMarker, Id};

#[tracing::instrument(skip_all, name = "query.users.insert")]
pub(super) async fn insert(conn: &mut PgConnection, user: &NewUser) -> Result<User> {
  sqlx::query_as::<_, User>(
    r"INSERT INTO users (username, email, password_hash)
      VALUES ($1, $2, $3)
      RETURNING id, username, email, password_hash, created_at",
  )
  .bind(&user.username)
  .bind(&user.email)
  .bind(&user.password_hash)
  .fetch_one(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.users.find")]
pub(super) async fn find(conn: &mut PgConnection, id: Id<UserMarker>) -> Result<Option<User>> {
  sqlx::query_as::<_, User>(
    "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
  )
  .bind(id)
  .fetch_optional(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.users.find_by_username")]
pub(super) async fn find_by_username(
  conn: &mut PgConnection,
  username: &str,
) -> Result<Option<User>> {
  sqlx::query_as::<_, User>(
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
  )
  .bind(username)
  .fetch_optional(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.users.is_username_taken")]
pub(super) async fn is_username_taken(
  conn: &mut PgConnection,
  username: &str,
  except: Option<Id<UserMarker>>,
) -> Result<bool> {
  sqlx::query_scalar::<_, bool>(
    "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
  )
  .bind(username)
  .bind(except)
  .fetch_one(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.users.is_email_taken")]
pub(super) async fn is_email_taken(
  conn: &mut PgConnection,
  email: &str,
  except: Option<Id<UserMarker>>,
) -> Result<bool> {
  sqlx::query_scalar::<_, bool>(
    "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
  )
  .bind(email)
  .bind(except)
  .fetch_one(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.users.update")]
pub(super) async fn update(
  conn: &mut PgConnection,
  id: Id<UserMarker>,
  changes: &UserChanges,
) -> Result<Option<User>> {
  sqlx::query_as::<_, User>(
    r"UPDATE users SET
        username = COALESCE($2, username),
        email = COALESCE($3, email),
        password_hash = COALESCE($4, password_hash)
      WHERE id = $1
      RETURNING id, username, email, password_hash, created_at",
  )
  .bind(id)
  .bind(changes.username.as_deref())
  .bind(changes.email.as_deref())
  .bind(changes.password_hash.as_deref())
  .fetch_optional(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.users.delete")]
pub(super) async fn delete(conn: &mut PgConnection, id: Id<UserMarker>) -> Result<bool> {
  let result = sqlx::query("DELETE FROM users WHERE id = $1")
    .bind(id)
    .execute(conn)
    .await
    .into_db_error()?;
  Ok(result.rows_affected() > 0)
}
