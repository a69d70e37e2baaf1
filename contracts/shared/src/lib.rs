//! Shared flip-sequence rules for Overmind contracts.
#![no_std]
#![allow(unexpected_cfgs)]

use soroban_sdk::Vec;

/// Number of flips in every prediction and every result.
pub const FLIP_COUNT: u32 = 10;

pub const HEADS: u32 = 0;
pub const TAILS: u32 = 1;

/// Reasons a flip sequence is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FlipError {
    InvalidFlipCount,
    InvalidFlipValue,
}

/// Checks length first, then that every entry is `HEADS` or `TAILS`.
pub fn validate_flips(flips: &Vec<u32>) -> Result<(), FlipError> {
    if flips.len() != FLIP_COUNT {
        return Err(FlipError::InvalidFlipCount);
    }
    if flips.iter().any(|flip| flip != HEADS && flip != TAILS) {
        return Err(FlipError::InvalidFlipValue);
    }
    Ok(())
}

/// Element-wise equality of a prediction and a result.
pub fn flips_match(predicted: &Vec<u32>, actual: &Vec<u32>) -> bool {
    predicted.len() == actual.len() && predicted.iter().zip(actual.iter()).all(|(p, a)| p == a)
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{vec, Env};

    #[test]
    fn test_validate_accepts_binary_sequence() {
        let env = Env::default();
        let flips = vec![&env, 0u32, 0, 0, 0, 0, 0, 0, 1, 1, 0];
        assert_eq!(validate_flips(&flips), Ok(()));
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        let env = Env::default();
        let short = vec![&env, 0u32, 1, 0];
        let long = vec![&env, 0u32, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
        let empty: Vec<u32> = Vec::new(&env);
        assert_eq!(validate_flips(&short), Err(FlipError::InvalidFlipCount));
        assert_eq!(validate_flips(&long), Err(FlipError::InvalidFlipCount));
        assert_eq!(validate_flips(&empty), Err(FlipError::InvalidFlipCount));
    }

    #[test]
    fn test_validate_rejects_non_binary_value() {
        let env = Env::default();
        let flips = vec![&env, 0u32, 0, 2, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(validate_flips(&flips), Err(FlipError::InvalidFlipValue));
    }

    #[test]
    fn test_length_checked_before_values() {
        let env = Env::default();
        let flips = vec![&env, 7u32, 7, 7];
        assert_eq!(validate_flips(&flips), Err(FlipError::InvalidFlipCount));
    }

    #[test]
    fn test_flips_match() {
        let env = Env::default();
        let a = vec![&env, 0u32, 0, 1, 0, 0, 1, 0, 0, 0, 0];
        let b = vec![&env, 0u32, 0, 1, 0, 0, 1, 0, 0, 0, 0];
        let c = vec![&env, 0u32, 0, 1, 1, 0, 1, 0, 0, 1, 1];
        assert!(flips_match(&a, &b));
        assert!(!flips_match(&a, &c));
        assert!(!flips_match(&a, &Vec::new(&env)));
    }
}
