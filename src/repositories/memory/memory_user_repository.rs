// src/repositories/memory/memory_user_repository.rs

use std::sync::Arc;

use super::MemoryDb;
use crate::domain::User;
use crate::error::{AppError, AppResult};
use crate::repositories::user_repository::UserRepository;

pub struct InMemoryUserRepository {
    db: Arc<MemoryDb>,
}

impl InMemoryUserRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }
}

impl UserRepository for InMemoryUserRepository {
    fn list_all(&self) -> AppResult<Vec<User>> {
        let state = self.db.lock()?;
        Ok(state.users.values().cloned().collect())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.db.lock()?;
        Ok(state.users.get(&id).cloned())
    }

    fn create(&self, user: &User) -> AppResult<User> {
        let mut state = self.db.lock()?;

        let id = state.next_user_id;
        state.next_user_id += 1;

        let mut stored = user.clone();
        stored.id = id;
        stored.friends.clear();
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, user: &User) -> AppResult<Option<User>> {
        let mut state = self.db.lock()?;

        match state.users.get_mut(&user.id) {
            Some(existing) => {
                existing.name = user.name.clone();
                existing.email = user.email.clone();
                existing.login = user.login.clone();
                existing.birthday = user.birthday;
                // the friendship set is owned by the friend operations
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.db.lock()?;

        if state.users.remove(&id).is_none() {
            return Err(AppError::not_found(format!(
                "user with id {} not found",
                id
            )));
        }

        // Scrub the relationship rows the deleted user appeared in,
        // inside the same lock scope so no caller sees a half-cascade.
        for user in state.users.values_mut() {
            user.friends.remove(&id);
        }
        for film in state.films.values_mut() {
            film.likes.remove(&id);
        }
        Ok(())
    }

    fn exists(&self, id: i64) -> AppResult<bool> {
        let state = self.db.lock()?;
        Ok(state.users.contains_key(&id))
    }

    fn friends_of(&self, id: i64) -> AppResult<Vec<User>> {
        let state = self.db.lock()?;

        let friend_ids = match state.users.get(&id) {
            Some(user) => user.friends.clone(),
            None => return Ok(Vec::new()),
        };
        Ok(friend_ids
            .iter()
            .filter_map(|friend_id| state.users.get(friend_id).cloned())
            .collect())
    }

    fn common_friends(&self, user_id: i64, other_id: i64) -> AppResult<Vec<User>> {
        let state = self.db.lock()?;

        let (first, second) = match (state.users.get(&user_id), state.users.get(&other_id)) {
            (Some(a), Some(b)) => (&a.friends, &b.friends),
            _ => return Ok(Vec::new()),
        };
        Ok(first
            .intersection(second)
            .filter_map(|friend_id| state.users.get(friend_id).cloned())
            .collect())
    }

    fn add_friend(&self, user_id: i64, friend_id: i64) -> AppResult<bool> {
        let mut state = self.db.lock()?;

        if !state.users.contains_key(&user_id) {
            return Err(AppError::not_found(format!(
                "user with id {} not found",
                user_id
            )));
        }
        if !state.users.contains_key(&friend_id) {
            return Err(AppError::not_found(format!(
                "user with id {} not found",
                friend_id
            )));
        }

        // Both directions inside one lock scope keeps the edge atomic.
        let newly = match state.users.get_mut(&user_id) {
            Some(user) => user.friends.insert(friend_id),
            None => false,
        };
        if let Some(friend) = state.users.get_mut(&friend_id) {
            friend.friends.insert(user_id);
        }
        Ok(newly)
    }

    fn remove_friend(&self, user_id: i64, friend_id: i64) -> AppResult<bool> {
        let mut state = self.db.lock()?;

        let removed = match state.users.get_mut(&user_id) {
            Some(user) => user.friends.remove(&friend_id),
            None => false,
        };
        if let Some(friend) = state.users.get_mut(&friend_id) {
            friend.friends.remove(&user_id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::new(MemoryDb::new()))
    }

    fn user(login: &str) -> User {
        User::new(
            login.to_string(),
            format!("{}@example.com", login),
            login.to_string(),
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let repo = repo();

        let a = repo.create(&user("alice")).unwrap();
        let b = repo.create(&user("bob")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let repo = repo();

        let a = repo.create(&user("alice")).unwrap();
        repo.delete(a.id).unwrap();
        let b = repo.create(&user("bob")).unwrap();

        assert!(b.id > a.id);
    }

    #[test]
    fn test_friendship_is_symmetric() {
        let repo = repo();

        let a = repo.create(&user("alice")).unwrap();
        let b = repo.create(&user("bob")).unwrap();

        assert!(repo.add_friend(a.id, b.id).unwrap());
        assert!(!repo.add_friend(a.id, b.id).unwrap());

        assert_eq!(repo.friends_of(a.id).unwrap()[0].id, b.id);
        assert_eq!(repo.friends_of(b.id).unwrap()[0].id, a.id);

        assert!(repo.remove_friend(b.id, a.id).unwrap());
        assert!(repo.friends_of(a.id).unwrap().is_empty());
        assert!(repo.friends_of(b.id).unwrap().is_empty());
    }

    #[test]
    fn test_common_friends_is_the_intersection() {
        let repo = repo();

        let a = repo.create(&user("alice")).unwrap();
        let b = repo.create(&user("bob")).unwrap();
        let c = repo.create(&user("carol")).unwrap();
        let d = repo.create(&user("dave")).unwrap();

        repo.add_friend(a.id, c.id).unwrap();
        repo.add_friend(a.id, d.id).unwrap();
        repo.add_friend(b.id, c.id).unwrap();

        let common = repo.common_friends(a.id, b.id).unwrap();
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].id, c.id);
    }

    #[test]
    fn test_delete_scrubs_friendships() {
        let repo = repo();

        let a = repo.create(&user("alice")).unwrap();
        let b = repo.create(&user("bob")).unwrap();
        repo.add_friend(a.id, b.id).unwrap();

        repo.delete(b.id).unwrap();

        assert!(repo.friends_of(a.id).unwrap().is_empty());
        assert!(repo.get_by_id(a.id).unwrap().unwrap().friends.is_empty());
    }

    #[test]
    fn test_update_preserves_friendships() {
        let repo = repo();

        let a = repo.create(&user("alice")).unwrap();
        let b = repo.create(&user("bob")).unwrap();
        repo.add_friend(a.id, b.id).unwrap();

        let mut changed = a.clone();
        changed.email = "new@example.com".to_string();
        let updated = repo.update(&changed).unwrap().unwrap();

        assert_eq!(updated.email, "new@example.com");
        assert!(updated.friends.contains(&b.id));
    }
}
