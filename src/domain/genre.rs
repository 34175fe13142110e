use serde::{Deserialize, Serialize};

/// Genre tag attached to zero or more films via a many-to-many association.
/// Reference data, same lifecycle as [`crate::domain::Mpa`].
///
/// Ordering is by id first so a `BTreeSet<Genre>` iterates in id order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}
