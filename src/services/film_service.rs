// src/services/film_service.rs
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{validate_film, Film, Genre, Mpa};
use crate::error::{AppError, AppResult};
use crate::repositories::{FilmRepository, GenreRepository, MpaRepository};
use crate::services::UserService;

/// How many films `popular_films` returns when the caller does not say.
pub const DEFAULT_POPULAR_COUNT: i64 = 10;

#[derive(Debug, Clone)]
pub struct CreateFilmRequest {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa_id: i32,
    /// Duplicate ids are collapsed before persistence.
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct UpdateFilmRequest {
    pub film_id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa_id: i32,
    pub genre_ids: Vec<i32>,
}

pub struct FilmService {
    films: Arc<dyn FilmRepository>,
    users: Arc<UserService>,
    mpa: Arc<dyn MpaRepository>,
    genres: Arc<dyn GenreRepository>,
}

impl FilmService {
    pub fn new(
        films: Arc<dyn FilmRepository>,
        users: Arc<UserService>,
        mpa: Arc<dyn MpaRepository>,
        genres: Arc<dyn GenreRepository>,
    ) -> Self {
        Self {
            films,
            users,
            mpa,
            genres,
        }
    }

    pub fn get_films(&self) -> AppResult<Vec<Film>> {
        self.films.list_all()
    }

    pub fn get_film(&self, id: i64) -> AppResult<Film> {
        self.films.get_by_id(id)?.ok_or_else(|| film_not_found(id))
    }

    pub fn create_film(&self, request: CreateFilmRequest) -> AppResult<Film> {
        let film = self.build_film(
            0,
            request.name,
            request.description,
            request.release_date,
            request.duration,
            request.mpa_id,
            request.genre_ids,
        )?;

        let stored = self.films.create(&film)?;
        log::info!("film {} created with id {}", stored.name, stored.id);
        Ok(stored)
    }

    pub fn update_film(&self, request: UpdateFilmRequest) -> AppResult<Film> {
        let film = self.build_film(
            request.film_id,
            request.name,
            request.description,
            request.release_date,
            request.duration,
            request.mpa_id,
            request.genre_ids,
        )?;

        match self.films.update(&film)? {
            Some(stored) => {
                log::info!("film {} updated", stored.id);
                Ok(stored)
            }
            None => Err(film_not_found(request.film_id)),
        }
    }

    pub fn delete_film(&self, id: i64) -> AppResult<()> {
        self.films.delete(id)?;
        log::info!("film {} deleted", id);
        Ok(())
    }

    /// Top films by like count; `None` asks for the default of
    /// [`DEFAULT_POPULAR_COUNT`].
    pub fn popular_films(&self, count: Option<i64>) -> AppResult<Vec<Film>> {
        self.films.popular(count.unwrap_or(DEFAULT_POPULAR_COUNT))
    }

    /// Idempotent; returns whether the like was newly recorded.
    pub fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<bool> {
        self.check_film_exists(film_id)?;
        self.users.get_user(user_id)?;

        let newly = self.films.add_like(film_id, user_id)?;
        if newly {
            log::info!("user {} liked film {}", user_id, film_id);
        }
        Ok(newly)
    }

    /// Returns whether a like was actually removed.
    pub fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<bool> {
        self.check_film_exists(film_id)?;
        self.users.get_user(user_id)?;

        let removed = self.films.remove_like(film_id, user_id)?;
        if removed {
            log::info!("user {} unliked film {}", user_id, film_id);
        }
        Ok(removed)
    }

    /// Field validation runs before reference resolution, so a film
    /// that is both malformed and pointing at a missing Mpa row
    /// reports the validation failure.
    fn build_film(
        &self,
        id: i64,
        name: String,
        description: String,
        release_date: NaiveDate,
        duration: i32,
        mpa_id: i32,
        genre_ids: Vec<i32>,
    ) -> AppResult<Film> {
        let mut film = Film::new(
            name,
            description,
            release_date,
            duration,
            Mpa {
                id: mpa_id,
                name: String::new(),
            },
            BTreeSet::new(),
        );
        film.id = id;
        validate_film(&film)?;

        // A film must be gradeable: the Mpa row has to exist.
        film.mpa = self
            .mpa
            .get_by_id(mpa_id)?
            .ok_or_else(|| AppError::not_found(format!("mpa rating with id {} not found", mpa_id)))?;
        film.genres = self.resolve_genres(genre_ids)?;
        Ok(film)
    }

    fn resolve_genres(&self, genre_ids: Vec<i32>) -> AppResult<BTreeSet<Genre>> {
        let distinct: BTreeSet<i32> = genre_ids.into_iter().collect();
        distinct
            .into_iter()
            .map(|id| {
                self.genres
                    .get_by_id(id)?
                    .ok_or_else(|| AppError::not_found(format!("genre with id {} not found", id)))
            })
            .collect()
    }

    fn check_film_exists(&self, id: i64) -> AppResult<()> {
        if self.films.get_by_id(id)?.is_some() {
            Ok(())
        } else {
            Err(film_not_found(id))
        }
    }
}

fn film_not_found(id: i64) -> AppError {
    AppError::not_found(format!("film with id {} not found", id))
}
