// src/repositories/memory/mod.rs
//
// In-memory backend
//
// The in-memory analog of the SQLite database file: every repository
// holds an Arc<MemoryDb> the way the SQLite repositories share an
// Arc<ConnectionPool>. A single mutex guards the whole state, so each
// read-modify-write sequence is atomic - including cross-table
// cascades such as a user deletion scrubbing that user's likes.

pub mod memory_film_repository;
pub mod memory_reference_repositories;
pub mod memory_user_repository;

pub use memory_film_repository::InMemoryFilmRepository;
pub use memory_reference_repositories::{InMemoryGenreRepository, InMemoryMpaRepository};
pub use memory_user_repository::InMemoryUserRepository;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{Film, Genre, Mpa, User};
use crate::error::{AppError, AppResult};

pub struct MemoryDb {
    state: Mutex<MemoryState>,
}

pub(crate) struct MemoryState {
    pub users: BTreeMap<i64, User>,
    pub films: BTreeMap<i64, Film>,
    pub genres: BTreeMap<i32, Genre>,
    pub mpa: BTreeMap<i32, Mpa>,
    // Monotonic counters: ids are never reused, even after deleting
    // the highest-id record.
    pub next_user_id: i64,
    pub next_film_id: i64,
}

impl MemoryDb {
    /// Fresh store carrying the same reference rows the SQL schema
    /// seeds.
    pub fn new() -> Self {
        let mpa = [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    Mpa {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect();

        let genres = [
            (1, "Comedy"),
            (2, "Drama"),
            (3, "Animation"),
            (4, "Thriller"),
            (5, "Documentary"),
            (6, "Action"),
        ]
        .into_iter()
        .map(|(id, name)| {
            (
                id,
                Genre {
                    id,
                    name: name.to_string(),
                },
            )
        })
        .collect();

        Self {
            state: Mutex::new(MemoryState {
                users: BTreeMap::new(),
                films: BTreeMap::new(),
                genres,
                mpa,
                next_user_id: 1,
                next_film_id: 1,
            }),
        }
    }

    pub(crate) fn lock(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Other("in-memory store mutex poisoned".to_string()))
    }
}

impl Default for MemoryDb {
    fn default() -> Self {
        Self::new()
    }
}
