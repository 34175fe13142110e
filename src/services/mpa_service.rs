// src/services/mpa_service.rs
use std::sync::Arc;

use crate::domain::Mpa;
use crate::error::{AppError, AppResult};
use crate::repositories::MpaRepository;

pub struct MpaService {
    repo: Arc<dyn MpaRepository>,
}

impl MpaService {
    pub fn new(repo: Arc<dyn MpaRepository>) -> Self {
        Self { repo }
    }

    pub fn get_all_mpa(&self) -> AppResult<Vec<Mpa>> {
        let mut ratings = self.repo.list_all()?;
        ratings.sort_by_key(|mpa| mpa.id);
        Ok(ratings)
    }

    pub fn get_mpa(&self, id: i32) -> AppResult<Mpa> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| AppError::not_found(format!("mpa rating with id {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryMpaRepository, MemoryDb};

    fn service() -> MpaService {
        MpaService::new(Arc::new(InMemoryMpaRepository::new(Arc::new(
            MemoryDb::new(),
        ))))
    }

    #[test]
    fn test_ratings_are_sorted_by_id() {
        let names: Vec<String> = service()
            .get_all_mpa()
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["G", "PG", "PG-13", "R", "NC-17"]);
    }

    #[test]
    fn test_unknown_rating_is_not_found() {
        let service = service();
        assert_eq!(service.get_mpa(5).unwrap().name, "NC-17");
        assert!(service.get_mpa(99).unwrap_err().is_not_found());
    }
}
