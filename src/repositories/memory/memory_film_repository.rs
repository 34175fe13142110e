// src/repositories/memory/memory_film_repository.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{MemoryDb, MemoryState};
use crate::domain::{Film, Genre, Mpa};
use crate::error::{AppError, AppResult};
use crate::repositories::film_repository::FilmRepository;

pub struct InMemoryFilmRepository {
    db: Arc<MemoryDb>,
}

impl InMemoryFilmRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }

    /// Resolve the film's Mpa id against the reference table, failing
    /// before any write when the row does not exist.
    fn resolve_mpa(state: &MemoryState, film: &Film) -> AppResult<Mpa> {
        state.mpa.get(&film.mpa.id).cloned().ok_or_else(|| {
            AppError::not_found(format!("mpa rating with id {} not found", film.mpa.id))
        })
    }

    /// Resolve every genre id against the reference table; the result
    /// is canonical rows ordered by id with duplicates collapsed.
    fn resolve_genres(state: &MemoryState, film: &Film) -> AppResult<BTreeSet<Genre>> {
        film.genres
            .iter()
            .map(|genre| {
                state.genres.get(&genre.id).cloned().ok_or_else(|| {
                    AppError::not_found(format!("genre with id {} not found", genre.id))
                })
            })
            .collect()
    }
}

impl FilmRepository for InMemoryFilmRepository {
    fn list_all(&self) -> AppResult<Vec<Film>> {
        let state = self.db.lock()?;
        Ok(state.films.values().cloned().collect())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Film>> {
        let state = self.db.lock()?;
        Ok(state.films.get(&id).cloned())
    }

    fn create(&self, film: &Film) -> AppResult<Film> {
        let mut state = self.db.lock()?;

        let mpa = Self::resolve_mpa(&state, film)?;
        let genres = Self::resolve_genres(&state, film)?;

        let id = state.next_film_id;
        state.next_film_id += 1;

        let mut stored = film.clone();
        stored.id = id;
        stored.mpa = mpa;
        stored.genres = genres;
        stored.likes.clear();
        state.films.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, film: &Film) -> AppResult<Option<Film>> {
        let mut state = self.db.lock()?;

        // Reference checks come first, matching the SQLite backend's
        // order within its transaction.
        let mpa = Self::resolve_mpa(&state, film)?;
        let genres = Self::resolve_genres(&state, film)?;

        match state.films.get_mut(&film.id) {
            Some(existing) => {
                existing.name = film.name.clone();
                existing.description = film.description.clone();
                existing.release_date = film.release_date;
                existing.duration = film.duration;
                existing.mpa = mpa;
                // full replace of the association set
                existing.genres = genres;
                // the like set is owned by the like operations
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.db.lock()?;

        // like and genre rows live inside the film record, so removing
        // it removes them with it
        if state.films.remove(&id).is_none() {
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

        let state = self.db.lock()?;

        let mut films: Vec<Film> = state.films.values().cloned().collect();
        films.sort_by(|a, b| {
            b.like_count()
                .cmp(&a.like_count())
                .then_with(|| a.id.cmp(&b.id))
        });
        films.truncate(count as usize);
        Ok(films)
    }

    fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<bool> {
        let mut state = self.db.lock()?;

        if !state.users.contains_key(&user_id) {
            return Err(AppError::not_found(format!(
                "user with id {} not found",
                user_id
            )));
        }
        match state.films.get_mut(&film_id) {
            Some(film) => Ok(film.likes.insert(user_id)),
            None => Err(AppError::not_found(format!(
                "film with id {} not found",
                film_id
            ))),
        }
    }

    fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<bool> {
        let mut state = self.db.lock()?;

        match state.films.get_mut(&film_id) {
            Some(film) => Ok(film.likes.remove(&user_id)),
            None => Ok(false),
        }
    }
}
