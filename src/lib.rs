// src/lib.rs
// FilmHub - Social movie rating service, domain and storage core
//
// Architecture:
// - Domain-centric: entities and their invariants live in src/domain
// - Two interchangeable backends behind one set of repository traits:
//   SQLite (shared connection pool) and in-memory (shared mutex-guarded
//   state)
// - Services orchestrate validation, reference checks and domain-error
//   translation; the HTTP boundary is a caller of this crate, not part
//   of it

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_film,
    validate_user,
    DomainError,
    DomainResult,
    Film,
    Genre,
    Mpa,
    User,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, create_connection_pool_at, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    FilmRepository,
    GenreRepository,
    InMemoryFilmRepository,
    InMemoryGenreRepository,
    InMemoryMpaRepository,
    InMemoryUserRepository,
    MemoryDb,
    MpaRepository,
    SqliteFilmRepository,
    SqliteGenreRepository,
    SqliteMpaRepository,
    SqliteUserRepository,
    UserRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    CreateFilmRequest,
    CreateUserRequest,
    // Film Service
    FilmService,
    // Genre / Mpa Services
    GenreService,
    MpaService,
    UpdateFilmRequest,
    UpdateUserRequest,
    // User Service
    UserService,
};
