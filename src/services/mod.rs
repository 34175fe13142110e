// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod film_service;
pub mod genre_service;
pub mod mpa_service;
pub mod user_service;


// Re-export all services and their types
pub use film_service::{CreateFilmRequest, FilmService, UpdateFilmRequest};

pub use user_service::{CreateUserRequest, UpdateUserRequest, UserService};

pub use genre_service::GenreService;

pub use mpa_service::MpaService;
