// src/repositories/user_repository.rs
//
// User persistence and the friendship relation

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::User;
use crate::error::{AppError, AppResult};

pub trait UserRepository: Send + Sync {
    fn list_all(&self) -> AppResult<Vec<User>>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    /// Persists a new user and returns the stored record with its
    /// assigned id. Ids are never reused, even after deletion.
    fn create(&self, user: &User) -> AppResult<User>;
    /// Full-record update. Returns `None` when the id is unknown.
    /// The friendship set is owned by the narrow friend operations and
    /// is left untouched.
    fn update(&self, user: &User) -> AppResult<Option<User>>;
    /// Removes the user together with all friendship edges and likes
    /// that reference it.
    fn delete(&self, id: i64) -> AppResult<()>;
    fn exists(&self, id: i64) -> AppResult<bool>;
    /// Friend ids resolved to full records, ordered by id.
    fn friends_of(&self, id: i64) -> AppResult<Vec<User>>;
    /// Intersection of two users' friend sets, resolved to full
    /// records, ordered by id.
    fn common_friends(&self, user_id: i64, other_id: i64) -> AppResult<Vec<User>>;
    /// Writes both directions of the symmetric edge atomically.
    /// Returns whether the edge was newly added.
    fn add_friend(&self, user_id: i64, friend_id: i64) -> AppResult<bool>;
    /// Removes both directions atomically. Returns whether an edge
    /// was actually removed.
    fn remove_friend(&self, user_id: i64, friend_id: i64) -> AppResult<bool>;
}

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to User - returns rusqlite::Error for query_map
    /// compatibility. The friendship set is attached separately.
    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        let birthday_str: String = row.get("birthday")?;
        let birthday = NaiveDate::parse_from_str(&birthday_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(User {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            login: row.get("login")?,
            birthday,
            friends: BTreeSet::new(),
        })
    }

    /// Fill in the friendship sets for a batch of already-loaded users.
    fn attach_friends(conn: &Connection, users: &mut [User]) -> AppResult<()> {
        if users.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; users.len()].join(",");
        let query = format!(
            "SELECT user_id, friend_id FROM friendship WHERE user_id IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&query)?;
        let edges: Vec<(i64, i64)> = stmt
            .query_map(params_from_iter(users.iter().map(|u| u.id)), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (user_id, friend_id) in edges {
            if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
                user.friends.insert(friend_id);
            }
        }
        Ok(())
    }
}

impl UserRepository for SqliteUserRepository {
    fn list_all(&self) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT id, name, email, login, birthday FROM users ORDER BY id")?;
        let mut users: Vec<User> = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::attach_friends(&conn, &mut users)?;
        Ok(users)
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT id, name, email, login, birthday FROM users WHERE id = ?1")?;
        let mut users: Vec<User> = stmt
            .query_map(params![id], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::attach_friends(&conn, &mut users)?;
        Ok(users.pop())
    }

    fn create(&self, user: &User) -> AppResult<User> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO users (name, email, login, birthday) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.name,
                user.email,
                user.login,
                user.birthday.to_string()
            ],
        )?;

        let mut stored = user.clone();
        stored.id = conn.last_insert_rowid();
        stored.friends.clear();
        Ok(stored)
    }

    fn update(&self, user: &User) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let rows = conn.execute(
            "UPDATE users SET name = ?1, email = ?2, login = ?3, birthday = ?4 WHERE id = ?5",
            params![
                user.name,
                user.email,
                user.login,
                user.birthday.to_string(),
                user.id
            ],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_by_id(user.id)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        // friendship and like rows cascade with the user row
        let rows = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(AppError::not_found(format!(
                "user with id {} not found",
                id
            )));
        }
        Ok(())
    }

    fn exists(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn friends_of(&self, id: i64) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.email, u.login, u.birthday
             FROM friendship f
             JOIN users u ON f.friend_id = u.id
             WHERE f.user_id = ?1
             ORDER BY u.id",
        )?;
        let mut users: Vec<User> = stmt
            .query_map(params![id], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::attach_friends(&conn, &mut users)?;
        Ok(users)
    }

    fn common_friends(&self, user_id: i64, other_id: i64) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.email, u.login, u.birthday
             FROM friendship f1
             JOIN friendship f2 ON f1.friend_id = f2.friend_id
             JOIN users u ON f1.friend_id = u.id
             WHERE f1.user_id = ?1 AND f2.user_id = ?2
             ORDER BY u.id",
        )?;
        let mut users: Vec<User> = stmt
            .query_map(params![user_id, other_id], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::attach_friends(&conn, &mut users)?;
        Ok(users)
    }

    fn add_friend(&self, user_id: i64, friend_id: i64) -> AppResult<bool> {
        let mut conn = self.pool.get()?;

        // Both directions of the edge in one transaction
        let tx = conn.transaction()?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO friendship (user_id, friend_id) VALUES (?1, ?2)",
            params![user_id, friend_id],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO friendship (user_id, friend_id) VALUES (?1, ?2)",
            params![friend_id, user_id],
        )?;
        tx.commit()?;

        Ok(inserted > 0)
    }

    fn remove_friend(&self, user_id: i64, friend_id: i64) -> AppResult<bool> {
        let mut conn = self.pool.get()?;

        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM friendship WHERE user_id = ?1 AND friend_id = ?2",
            params![user_id, friend_id],
        )?;
        tx.execute(
            "DELETE FROM friendship WHERE user_id = ?1 AND friend_id = ?2",
            params![friend_id, user_id],
        )?;
        tx.commit()?;

        Ok(removed > 0)
    }
}
