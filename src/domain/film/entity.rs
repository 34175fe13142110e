use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{Genre, Mpa};

/// A film in the catalog.
/// Root entity for likes and the popularity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    /// Internal immutable identifier, assigned by the store on creation
    pub id: i64,

    /// Title, never blank
    pub name: String,

    /// Synopsis, never blank, at most 200 characters
    pub description: String,

    /// Cannot predate the first public film screening (1895-12-28)
    pub release_date: NaiveDate,

    /// Running time in minutes, never negative
    pub duration: i32,

    /// Content rating; every film must be gradeable
    pub mpa: Mpa,

    /// Genre tags, ordered by id, no duplicate ids
    #[serde(default)]
    pub genres: BTreeSet<Genre>,

    /// Ids of users who liked this film; set membership, not a counter
    #[serde(default)]
    pub likes: BTreeSet<i64>,
}

impl Film {
    /// Build an unsaved film record. The store assigns the real id.
    pub fn new(
        name: String,
        description: String,
        release_date: NaiveDate,
        duration: i32,
        mpa: Mpa,
        genres: BTreeSet<Genre>,
    ) -> Self {
        Self {
            id: 0,
            name,
            description,
            release_date,
            duration,
            mpa,
            genres,
            likes: BTreeSet::new(),
        }
    }

    /// Number of distinct users who liked this film.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}
