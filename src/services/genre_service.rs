// src/services/genre_service.rs
use std::sync::Arc;

use crate::domain::Genre;
use crate::error::{AppError, AppResult};
use crate::repositories::GenreRepository;

pub struct GenreService {
    repo: Arc<dyn GenreRepository>,
}

impl GenreService {
    pub fn new(repo: Arc<dyn GenreRepository>) -> Self {
        Self { repo }
    }

    pub fn get_genres(&self) -> AppResult<Vec<Genre>> {
        let mut genres = self.repo.list_all()?;
        genres.sort_by_key(|genre| genre.id);
        Ok(genres)
    }

    pub fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| AppError::not_found(format!("genre with id {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryGenreRepository, MemoryDb};

    fn service() -> GenreService {
        GenreService::new(Arc::new(InMemoryGenreRepository::new(Arc::new(
            MemoryDb::new(),
        ))))
    }

    #[test]
    fn test_genres_are_sorted_by_id() {
        let genres = service().get_genres().unwrap();
        assert_eq!(genres.len(), 6);
        assert!(genres.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_unknown_genre_is_not_found() {
        let service = service();
        assert_eq!(service.get_genre(2).unwrap().name, "Drama");
        assert!(service.get_genre(99).unwrap_err().is_not_found());
    }
}
