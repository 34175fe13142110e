use super::entity::User;
use crate::domain::{DomainError, DomainResult};
use chrono::Utc;

/// Validates all User invariants.
///
/// Rules are checked in a fixed order so the first violated one is the
/// one reported: email presence, email contains '@', login shape,
/// birthday not in the future.
pub fn validate_user(user: &User) -> DomainResult<()> {
    validate_email(&user.email)?;
    validate_login(&user.login)?;
    validate_birthday(user)?;
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.trim().is_empty() {
        return Err(DomainError::Validation(
            "email must not be blank".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(DomainError::Validation(
            "email must contain the '@' character".to_string(),
        ));
    }
    Ok(())
}

fn validate_login(login: &str) -> DomainResult<()> {
    if login.trim().is_empty() || login.contains(char::is_whitespace) {
        return Err(DomainError::Validation(
            "login must not be blank or contain whitespace".to_string(),
        ));
    }
    Ok(())
}

fn validate_birthday(user: &User) -> DomainResult<()> {
    if user.birthday > Utc::now().date_naive() {
        return Err(DomainError::Validation(
            "birthday must not be in the future".to_string(),
        ));
    }
    Ok(())
}
