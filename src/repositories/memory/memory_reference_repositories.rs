// src/repositories/memory/memory_reference_repositories.rs
//
// In-memory Genre and Mpa lookups over the seeded reference tables

use std::sync::Arc;

use super::MemoryDb;
use crate::domain::{Genre, Mpa};
use crate::error::AppResult;
use crate::repositories::genre_repository::GenreRepository;
use crate::repositories::mpa_repository::MpaRepository;

pub struct InMemoryGenreRepository {
    db: Arc<MemoryDb>,
}

impl InMemoryGenreRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }
}

impl GenreRepository for InMemoryGenreRepository {
    fn list_all(&self) -> AppResult<Vec<Genre>> {
        let state = self.db.lock()?;
        Ok(state.genres.values().cloned().collect())
    }

    fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>> {
        let state = self.db.lock()?;
        Ok(state.genres.get(&id).cloned())
    }
}

pub struct InMemoryMpaRepository {
    db: Arc<MemoryDb>,
}

impl InMemoryMpaRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }
}

impl MpaRepository for InMemoryMpaRepository {
    fn list_all(&self) -> AppResult<Vec<Mpa>> {
        let state = self.db.lock()?;
        Ok(state.mpa.values().cloned().collect())
    }

    fn get_by_id(&self, id: i32) -> AppResult<Option<Mpa>> {
        let state = self.db.lock()?;
        Ok(state.mpa.get(&id).cloned())
    }
}
