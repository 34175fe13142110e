// src/repositories/genre_repository.rs
//
// Genre reference data - read-only lookups

use rusqlite::params;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::db::ConnectionPool;
use crate::domain::Genre;
use crate::error::AppResult;

/// Rows come from the seed data written at schema initialization;
/// there is no create path. Absence of an id is reported by the
/// caller, not the store.
#[cfg_attr(test, automock)]
pub trait GenreRepository: Send + Sync {
    fn list_all(&self) -> AppResult<Vec<Genre>>;
    fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>>;
}

pub struct SqliteGenreRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteGenreRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl GenreRepository for SqliteGenreRepository {
    fn list_all(&self) -> AppResult<Vec<Genre>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM genres ORDER BY id")?;
        let genres: Vec<Genre> = stmt
            .query_map([], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(genres)
    }

    fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM genres WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Genre {
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

    fn test_repo() -> (tempfile::TempDir, SqliteGenreRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool_at(&dir.path().join("test.db")).unwrap();
        initialize_database(&get_connection(&pool).unwrap()).unwrap();
        (dir, SqliteGenreRepository::new(Arc::new(pool)))
    }

    #[test]
    fn test_seeded_genres_listed_in_id_order() {
        let (_dir, repo) = test_repo();

        let genres = repo.list_all().unwrap();
        assert_eq!(genres.len(), 6);
        assert!(genres.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(genres[0].name, "Comedy");
    }

    #[test]
    fn test_get_by_id() {
        let (_dir, repo) = test_repo();

        let drama = repo.get_by_id(2).unwrap().unwrap();
        assert_eq!(drama.name, "Drama");
        assert!(repo.get_by_id(99).unwrap().is_none());
    }
}
