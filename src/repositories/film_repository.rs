// src/repositories/film_repository.rs
//
// Film persistence: the film rows, their Mpa reference, the genre
// associations and the likes relation

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{Film, Genre, Mpa};
use crate::error::{AppError, AppResult};

pub trait FilmRepository: Send + Sync {
    /// All films, each joined with its Mpa, genre set and like set.
    fn list_all(&self) -> AppResult<Vec<Film>>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Film>>;
    /// Checks the Mpa and Genre references exist, persists the film and
    /// its genre associations atomically, returns the stored record
    /// with its assigned id. Ids are never reused.
    fn create(&self, film: &Film) -> AppResult<Film>;
    /// Full-record update; genre associations are replaced wholesale.
    /// Returns `None` when the id is unknown. The like set is owned by
    /// the narrow like operations and is left untouched.
    fn update(&self, film: &Film) -> AppResult<Option<Film>>;
    /// Removes the film together with its like and genre rows.
    fn delete(&self, id: i64) -> AppResult<()>;
    /// Top-N films by descending distinct-like count, ties broken by
    /// ascending id. Films with zero likes are included. A count of
    /// zero or less yields an empty list.
    fn popular(&self, count: i64) -> AppResult<Vec<Film>>;
    /// Idempotent; returns whether the like was newly recorded.
    fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<bool>;
    /// Returns whether a like was actually removed.
    fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<bool>;
}

pub struct SqliteFilmRepository {
    pool: Arc<ConnectionPool>,
}

const FILM_SELECT: &str = "SELECT f.id, f.name, f.description, f.release_date, f.duration,
            m.id AS mpa_id, m.name AS mpa_name
     FROM films f
     JOIN mpa m ON f.mpa_id = m.id";

impl SqliteFilmRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Film - returns rusqlite::Error for query_map
    /// compatibility. Genre and like sets are attached separately.
    fn row_to_film(row: &Row) -> Result<Film, rusqlite::Error> {
        let release_date_str: String = row.get("release_date")?;
        let release_date = NaiveDate::parse_from_str(&release_date_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Film {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            release_date,
            duration: row.get("duration")?,
            mpa: Mpa {
                id: row.get("mpa_id")?,
                name: row.get("mpa_name")?,
            },
            genres: BTreeSet::new(),
            likes: BTreeSet::new(),
        })
    }

    /// Fill in genre and like sets for a batch of already-loaded films.
    fn attach_relations(conn: &Connection, films: &mut [Film]) -> AppResult<()> {
        if films.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; films.len()].join(",");

        let query = format!(
            "SELECT fg.film_id, g.id, g.name
             FROM film_genres fg
             JOIN genres g ON g.id = fg.genre_id
             WHERE fg.film_id IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&query)?;
        let genre_rows: Vec<(i64, Genre)> = stmt
            .query_map(params_from_iter(films.iter().map(|f| f.id)), |row| {
                Ok((
                    row.get(0)?,
                    Genre {
                        id: row.get(1)?,
                        name: row.get(2)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let query = format!(
            "SELECT film_id, user_id FROM likes WHERE film_id IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&query)?;
        let like_rows: Vec<(i64, i64)> = stmt
            .query_map(params_from_iter(films.iter().map(|f| f.id)), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (film_id, genre) in genre_rows {
            if let Some(film) = films.iter_mut().find(|f| f.id == film_id) {
                film.genres.insert(genre);
            }
        }
        for (film_id, user_id) in like_rows {
            if let Some(film) = films.iter_mut().find(|f| f.id == film_id) {
                film.likes.insert(user_id);
            }
        }
        Ok(())
    }

    /// Every Mpa and Genre id referenced by the film must exist before
    /// anything is written.
    fn check_references(conn: &Connection, film: &Film) -> AppResult<()> {
        let mpa_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM mpa WHERE id = ?1)",
            params![film.mpa.id],
            |row| row.get(0),
        )?;
        if !mpa_exists {
            return Err(AppError::not_found(format!(
                "mpa rating with id {} not found",
                film.mpa.id
            )));
        }

        for genre in &film.genres {
            let genre_exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM genres WHERE id = ?1)",
                params![genre.id],
                |row| row.get(0),
            )?;
            if !genre_exists {
                return Err(AppError::not_found(format!(
                    "genre with id {} not found",
                    genre.id
                )));
            }
        }
        Ok(())
    }

    fn insert_genres(conn: &Connection, film_id: i64, genres: &BTreeSet<Genre>) -> AppResult<()> {
        for genre in genres {
            conn.execute(
                "INSERT OR IGNORE INTO film_genres (film_id, genre_id) VALUES (?1, ?2)",
                params![film_id, genre.id],
            )?;
        }
        Ok(())
    }
}

impl FilmRepository for SqliteFilmRepository {
    fn list_all(&self) -> AppResult<Vec<Film>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY f.id", FILM_SELECT))?;
        let mut films: Vec<Film> = stmt
            .query_map([], Self::row_to_film)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::attach_relations(&conn, &mut films)?;
        Ok(films)
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Film>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("{} WHERE f.id = ?1", FILM_SELECT))?;
        let mut films: Vec<Film> = stmt
            .query_map(params![id], Self::row_to_film)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::attach_relations(&conn, &mut films)?;
        Ok(films.pop())
    }

    fn create(&self, film: &Film) -> AppResult<Film> {
        let mut conn = self.pool.get()?;

        let tx = conn.transaction()?;
        Self::check_references(&tx, film)?;
        tx.execute(
            "INSERT INTO films (name, description, release_date, duration, mpa_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                film.name,
                film.description,
                film.release_date.to_string(),
                film.duration,
                film.mpa.id
            ],
        )?;
        let film_id = tx.last_insert_rowid();
        Self::insert_genres(&tx, film_id, &film.genres)?;
        tx.commit()?;

        let mut stored = film.clone();
        stored.id = film_id;
        stored.likes.clear();
        Ok(stored)
    }

    fn update(&self, film: &Film) -> AppResult<Option<Film>> {
        let mut conn = self.pool.get()?;

        // Genre replacement must never be observable half-done, so the
        // row update, the delete and the re-insert share a transaction.
        let tx = conn.transaction()?;
        Self::check_references(&tx, film)?;
        let rows = tx.execute(
            "UPDATE films SET name = ?1, description = ?2, release_date = ?3,
                              duration = ?4, mpa_id = ?5
             WHERE id = ?6",
            params![
                film.name,
                film.description,
                film.release_date.to_string(),
                film.duration,
                film.mpa.id,
                film.id
            ],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        tx.execute(
            "DELETE FROM film_genres WHERE film_id = ?1",
            params![film.id],
        )?;
        Self::insert_genres(&tx, film.id, &film.genres)?;
        tx.commit()?;

        self.get_by_id(film.id)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        // like and genre rows cascade with the film row
        let rows = conn.execute("DELETE FROM films WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(AppError::not_found(format!(
                "film with id {} not found",
                id
            )));
        }
        Ok(())
    }

    fn popular(&self, count: i64) -> AppResult<Vec<Film>> {
        if count <= 0 {
            return Ok(Vec::new());
        }

        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT f.id, f.name, f.description, f.release_date, f.duration,
                    m.id AS mpa_id, m.name AS mpa_name,
                    COUNT(l.user_id) AS like_count
             FROM films f
             JOIN mpa m ON f.mpa_id = m.id
             LEFT JOIN likes l ON f.id = l.film_id
             GROUP BY f.id, f.name, f.description, f.release_date, f.duration, m.id, m.name
             ORDER BY like_count DESC, f.id ASC
             LIMIT ?1",
        )?;
        let mut films: Vec<Film> = stmt
            .query_map(params![count], Self::row_to_film)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::attach_relations(&conn, &mut films)?;
        Ok(films)
    }

    fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO likes (film_id, user_id) VALUES (?1, ?2)",
            params![film_id, user_id],
        )?;
        Ok(inserted > 0)
    }

    fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let removed = conn.execute(
            "DELETE FROM likes WHERE film_id = ?1 AND user_id = ?2",
            params![film_id, user_id],
        )?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool_at, get_connection, initialize_database};
    use crate::domain::User;
    use crate::repositories::user_repository::{SqliteUserRepository, UserRepository};

    fn test_repos() -> (tempfile::TempDir, SqliteFilmRepository, SqliteUserRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = Arc::new(create_connection_pool_at(&dir.path().join("test.db")).unwrap());
        initialize_database(&get_connection(&pool).unwrap()).unwrap();
        (
            dir,
            SqliteFilmRepository::new(Arc::clone(&pool)),
            SqliteUserRepository::new(pool),
        )
    }

    fn mpa(id: i32, name: &str) -> Mpa {
        Mpa {
            id,
            name: name.to_string(),
        }
    }

    fn film(name: &str) -> Film {
        Film::new(
            name.to_string(),
            format!("About {}", name),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            120,
            mpa(1, "G"),
            BTreeSet::new(),
        )
    }

    fn seeded_user(users: &SqliteUserRepository, login: &str) -> i64 {
        users
            .create(&User::new(
                login.to_string(),
                format!("{}@example.com", login),
                login.to_string(),
                NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            ))
            .unwrap()
            .id
    }

    #[test]
    fn test_create_assigns_id_and_round_trips() {
        let (_dir, films, _users) = test_repos();

        let mut candidate = film("Heat");
        candidate.genres.insert(Genre {
            id: 4,
            name: "Thriller".to_string(),
        });
        candidate.genres.insert(Genre {
            id: 6,
            name: "Action".to_string(),
        });

        let stored = films.create(&candidate).unwrap();
        assert!(stored.id > 0);

        let loaded = films.get_by_id(stored.id).unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.genres.len(), 2);
    }

    #[test]
    fn test_create_with_unknown_mpa_writes_nothing() {
        let (_dir, films, _users) = test_repos();

        let mut candidate = film("Ghost");
        candidate.mpa = mpa(99, "X");

        assert!(films.create(&candidate).unwrap_err().is_not_found());
        assert!(films.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_with_unknown_genre_writes_nothing() {
        let (_dir, films, _users) = test_repos();

        let mut candidate = film("Ghost");
        candidate.genres.insert(Genre {
            id: 99,
            name: "Unknown".to_string(),
        });

        assert!(films.create(&candidate).unwrap_err().is_not_found());
        assert!(films.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_replaces_genre_associations() {
        let (_dir, films, _users) = test_repos();

        let mut candidate = film("Heat");
        candidate.genres.insert(Genre {
            id: 1,
            name: "Comedy".to_string(),
        });
        let stored = films.create(&candidate).unwrap();

        let mut updated = stored.clone();
        updated.genres.clear();
        updated.genres.insert(Genre {
            id: 2,
            name: "Drama".to_string(),
        });
        updated.genres.insert(Genre {
            id: 4,
            name: "Thriller".to_string(),
        });

        let reloaded = films.update(&updated).unwrap().unwrap();
        let genre_ids: Vec<i32> = reloaded.genres.iter().map(|g| g.id).collect();
        assert_eq!(genre_ids, vec![2, 4]);
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let (_dir, films, _users) = test_repos();

        let mut ghost = film("Ghost");
        ghost.id = 42;
        assert!(films.update(&ghost).unwrap().is_none());
    }

    #[test]
    fn test_add_like_is_idempotent() {
        let (_dir, films, users) = test_repos();

        let stored = films.create(&film("Heat")).unwrap();
        let user_id = seeded_user(&users, "alice");

        assert!(films.add_like(stored.id, user_id).unwrap());
        assert!(!films.add_like(stored.id, user_id).unwrap());

        let loaded = films.get_by_id(stored.id).unwrap().unwrap();
        assert_eq!(loaded.like_count(), 1);
    }

    #[test]
    fn test_remove_like_is_isolated_per_user() {
        let (_dir, films, users) = test_repos();

        let stored = films.create(&film("Heat")).unwrap();
        let alice = seeded_user(&users, "alice");
        let bob = seeded_user(&users, "bob");
        films.add_like(stored.id, alice).unwrap();

        // bob never liked it; removing is a no-op for alice's like
        assert!(!films.remove_like(stored.id, bob).unwrap());
        assert_eq!(films.get_by_id(stored.id).unwrap().unwrap().like_count(), 1);

        assert!(films.remove_like(stored.id, alice).unwrap());
        assert_eq!(films.get_by_id(stored.id).unwrap().unwrap().like_count(), 0);
    }

    #[test]
    fn test_popular_orders_by_count_then_id() {
        let (_dir, films, users) = test_repos();

        let f1 = films.create(&film("First")).unwrap();
        let f2 = films.create(&film("Second")).unwrap();
        let f3 = films.create(&film("Third")).unwrap();

        let likers: Vec<i64> = (0..5)
            .map(|i| seeded_user(&users, &format!("user{}", i)))
            .collect();

        // f2 and f3 get 5 likes each, f1 gets 1
        for user_id in &likers {
            films.add_like(f2.id, *user_id).unwrap();
            films.add_like(f3.id, *user_id).unwrap();
        }
        films.add_like(f1.id, likers[0]).unwrap();

        let top_two: Vec<i64> = films.popular(2).unwrap().iter().map(|f| f.id).collect();
        assert_eq!(top_two, vec![f2.id, f3.id]);
    }

    #[test]
    fn test_popular_count_edge_cases() {
        let (_dir, films, _users) = test_repos();

        films.create(&film("First")).unwrap();
        films.create(&film("Second")).unwrap();
        films.create(&film("Third")).unwrap();

        assert!(films.popular(0).unwrap().is_empty());
        assert_eq!(films.popular(100).unwrap().len(), 3);
    }

    #[test]
    fn test_popular_includes_zero_like_films() {
        let (_dir, films, _users) = test_repos();

        let stored = films.create(&film("Quiet")).unwrap();
        let top = films.popular(10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, stored.id);
        assert_eq!(top[0].like_count(), 0);
    }

    #[test]
    fn test_delete_cascades_likes_and_genres() {
        let (_dir, films, users) = test_repos();

        let mut candidate = film("Heat");
        candidate.genres.insert(Genre {
            id: 6,
            name: "Action".to_string(),
        });
        let stored = films.create(&candidate).unwrap();
        let alice = seeded_user(&users, "alice");
        films.add_like(stored.id, alice).unwrap();

        films.delete(stored.id).unwrap();

        assert!(films.get_by_id(stored.id).unwrap().is_none());
        assert!(films.list_all().unwrap().is_empty());
        assert!(films.delete(stored.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_deleting_a_user_cascades_their_likes() {
        let (_dir, films, users) = test_repos();

        let stored = films.create(&film("Heat")).unwrap();
        let alice = seeded_user(&users, "alice");
        let bob = seeded_user(&users, "bob");
        films.add_like(stored.id, alice).unwrap();
        films.add_like(stored.id, bob).unwrap();

        users.delete(alice).unwrap();

        let loaded = films.get_by_id(stored.id).unwrap().unwrap();
        assert_eq!(loaded.likes.iter().copied().collect::<Vec<_>>(), vec![bob]);
    }
}
