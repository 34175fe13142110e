// src/repositories/mpa_repository.rs
//
// MPA rating reference data - read-only lookups

use rusqlite::params;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::db::ConnectionPool;
use crate::domain::Mpa;
use crate::error::AppResult;

/// Same lifecycle as [`crate::repositories::GenreRepository`]: fixed
/// seed rows, lookups only.
#[cfg_attr(test, automock)]
pub trait MpaRepository: Send + Sync {
    fn list_all(&self) -> AppResult<Vec<Mpa>>;
    fn get_by_id(&self, id: i32) -> AppResult<Option<Mpa>>;
}

pub struct SqliteMpaRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMpaRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl MpaRepository for SqliteMpaRepository {
    fn list_all(&self) -> AppResult<Vec<Mpa>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM mpa ORDER BY id")?;
        let ratings: Vec<Mpa> = stmt
            .query_map([], |row| {
                Ok(Mpa {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ratings)
    }

    fn get_by_id(&self, id: i32) -> AppResult<Option<Mpa>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM mpa WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Mpa {
                id: row.get(0)?,
                name: row.get(1)?,
            }))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool_at, get_connection, initialize_database};

    fn test_repo() -> (tempfile::TempDir, SqliteMpaRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool_at(&dir.path().join("test.db")).unwrap();
        initialize_database(&get_connection(&pool).unwrap()).unwrap();
        (dir, SqliteMpaRepository::new(Arc::new(pool)))
    }

    #[test]
    fn test_seeded_ratings_listed_in_id_order() {
        let (_dir, repo) = test_repo();

        let ratings = repo.list_all().unwrap();
        let names: Vec<&str> = ratings.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["G", "PG", "PG-13", "R", "NC-17"]);
    }

    #[test]
    fn test_get_by_id() {
        let (_dir, repo) = test_repo();

        let g = repo.get_by_id(1).unwrap().unwrap();
        assert_eq!(g.name, "G");
        assert!(repo.get_by_id(99).unwrap().is_none());
    }
}
