use serde::{Deserialize, Serialize};

/// MPA content rating attached to exactly one film (G, PG, PG-13, R, NC-17).
/// Reference data seeded at schema initialization, never created through the
/// normal domain flow.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mpa {
    pub id: i32,
    pub name: String,
}
