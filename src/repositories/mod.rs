// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic beyond reference-existence checks
// - NO cross-repository calls
// - Explicit SQL only
//
// Every trait has two implementations: a SQLite one sharing an
// Arc<ConnectionPool>, and an in-memory one sharing an Arc<MemoryDb>.

pub mod film_repository;
pub mod genre_repository;
pub mod memory;
pub mod mpa_repository;
pub mod user_repository;

pub use film_repository::{FilmRepository, SqliteFilmRepository};
pub use genre_repository::{GenreRepository, SqliteGenreRepository};
pub use memory::{
    InMemoryFilmRepository, InMemoryGenreRepository, InMemoryMpaRepository,
    InMemoryUserRepository, MemoryDb,
};
pub use mpa_repository::{MpaRepository, SqliteMpaRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
