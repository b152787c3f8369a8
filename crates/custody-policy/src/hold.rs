use crate::PolicyError;

/// Refuse any mutation of held evidence.
pub fn check_not_held(held: bool) -> Result<(), PolicyError> {
    if held {
        return Err(PolicyError::LegalHoldActive);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_is_refused() {
        assert_eq!(check_not_held(true), Err(PolicyError::LegalHoldActive));
        assert_eq!(check_not_held(false), Ok(()));
    }
}
