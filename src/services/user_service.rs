// src/services/user_service.rs
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::{validate_user, DomainError, User};
use crate::error::{AppError, AppResult};
use crate::repositories::UserRepository;

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub login: String,
    /// Display name; a blank or absent name falls back to the login.
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub user_id: i64,
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub fn get_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all()
    }

    pub fn get_user(&self, id: i64) -> AppResult<User> {
        self.repo.get_by_id(id)?.ok_or_else(|| user_not_found(id))
    }

    pub fn create_user(&self, request: CreateUserRequest) -> AppResult<User> {
        let name = display_name(request.name, &request.login);
        let user = User::new(name, request.email, request.login, request.birthday);
        validate_user(&user)?;

        let stored = self.repo.create(&user)?;
        log::info!("user {} created with id {}", stored.name, stored.id);
        Ok(stored)
    }

    pub fn update_user(&self, request: UpdateUserRequest) -> AppResult<User> {
        let name = display_name(request.name, &request.login);
        let mut user = User::new(name, request.email, request.login, request.birthday);
        user.id = request.user_id;
        validate_user(&user)?;

        match self.repo.update(&user)? {
            Some(stored) => {
                log::info!("user {} updated", stored.id);
                Ok(stored)
            }
            None => Err(user_not_found(request.user_id)),
        }
    }

    pub fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repo.delete(id)?;
        log::info!("user {} deleted", id);
        Ok(())
    }

    pub fn get_friends(&self, id: i64) -> AppResult<Vec<User>> {
        self.check_exists(id)?;
        self.repo.friends_of(id)
    }

    pub fn get_common_friends(&self, user_id: i64, other_id: i64) -> AppResult<Vec<User>> {
        self.check_exists(user_id)?;
        self.check_exists(other_id)?;
        self.repo.common_friends(user_id, other_id)
    }

    pub fn add_friend(&self, user_id: i64, friend_id: i64) -> AppResult<()> {
        self.check_not_self(user_id, friend_id, "befriend")?;
        self.check_exists(user_id)?;
        self.check_exists(friend_id)?;

        let newly = self.repo.add_friend(user_id, friend_id)?;
        if newly {
            log::info!("users {} and {} are now friends", user_id, friend_id);
        }
        Ok(())
    }

    pub fn remove_friend(&self, user_id: i64, friend_id: i64) -> AppResult<()> {
        self.check_not_self(user_id, friend_id, "unfriend")?;
        self.check_exists(user_id)?;
        self.check_exists(friend_id)?;

        let removed = self.repo.remove_friend(user_id, friend_id)?;
        if removed {
            log::info!("users {} and {} are no longer friends", user_id, friend_id);
        }
        Ok(())
    }

    /// Pairwise operations must fail fast on a self-reference, before
    /// any storage access.
    fn check_not_self(&self, user_id: i64, friend_id: i64, verb: &str) -> AppResult<()> {
        if user_id == friend_id {
            log::error!("user {} attempted to {} themselves", user_id, verb);
            return Err(AppError::Domain(DomainError::SelfReference(format!(
                "a user cannot {} themselves",
                verb
            ))));
        }
        Ok(())
    }

    fn check_exists(&self, id: i64) -> AppResult<()> {
        if self.repo.exists(id)? {
            Ok(())
        } else {
            Err(user_not_found(id))
        }
    }
}

fn display_name(name: Option<String>, login: &str) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => login.to_string(),
    }
}

fn user_not_found(id: i64) -> AppError {
    AppError::not_found(format!("user with id {} not found", id))
}
