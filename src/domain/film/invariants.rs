use super::entity::Film;
use crate::domain::{DomainError, DomainResult};
use chrono::NaiveDate;

/// Longest description the catalog accepts, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// The first public film screening; no film can predate it.
pub fn earliest_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).expect("literal date is valid")
}

/// Validates all Film invariants.
///
/// Rules are checked in a fixed order so the first violated one is the
/// one reported: name, description, release date, duration.
pub fn validate_film(film: &Film) -> DomainResult<()> {
    validate_name(&film.name)?;
    validate_description(&film.description)?;
    validate_release_date(film)?;
    validate_duration(film)?;
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(
            "film name must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> DomainResult<()> {
    if description.trim().is_empty() {
        return Err(DomainError::Validation(
            "film description must not be blank".to_string(),
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::Validation(format!(
            "film description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

fn validate_release_date(film: &Film) -> DomainResult<()> {
    if film.release_date < earliest_release_date() {
        return Err(DomainError::Validation(format!(
            "release date must not be before {}",
            earliest_release_date()
        )));
    }
    Ok(())
}

fn validate_duration(film: &Film) -> DomainResult<()> {
    if film.duration < 0 {
        return Err(DomainError::Validation(
            "film duration must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mpa;
    use std::collections::BTreeSet;

    fn film() -> Film {
        Film::new(
            "Arrival".to_string(),
            "A linguist decodes an alien language.".to_string(),
            NaiveDate::from_ymd_opt(2016, 11, 11).unwrap(),
            116,
            Mpa {
                id: 3,
                name: "PG-13".to_string(),
            },
            BTreeSet::new(),
        )
    }

    #[test]
    fn test_valid_film() {
        assert!(validate_film(&film()).is_ok());
    }

    #[test]
    fn test_blank_name_fails() {
        let mut f = film();
        f.name = "   ".to_string();
        assert!(validate_film(&f).is_err());
    }

    #[test]
    fn test_description_at_limit_is_accepted() {
        let mut f = film();
        f.description = "d".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_film(&f).is_ok());
    }

    #[test]
    fn test_description_over_limit_fails() {
        let mut f = film();
        f.description = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_film(&f).is_err());
    }

    #[test]
    fn test_first_screening_date_is_accepted() {
        let mut f = film();
        f.release_date = NaiveDate::from_ymd_opt(1895, 12, 28).unwrap();
        assert!(validate_film(&f).is_ok());
    }

    #[test]
    fn test_day_before_first_screening_fails() {
        let mut f = film();
        f.release_date = NaiveDate::from_ymd_opt(1895, 12, 27).unwrap();
        assert!(validate_film(&f).is_err());
    }

    #[test]
    fn test_negative_duration_fails() {
        let mut f = film();
        f.duration = -1;
        assert!(validate_film(&f).is_err());
    }

    #[test]
    fn test_zero_duration_is_accepted() {
        let mut f = film();
        f.duration = 0;
        assert!(validate_film(&f).is_ok());
    }

    #[test]
    fn test_name_checked_before_duration() {
        // Both name and duration are invalid; the name rule is reported.
        let mut f = film();
        f.name = String::new();
        f.duration = -10;
        let err = validate_film(&f).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("name")));
    }
}
