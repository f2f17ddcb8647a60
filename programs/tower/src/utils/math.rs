// tower/utils/math.rs

use anchor_lang::prelude::*;

use crate::errors::TowerError;

/// `a * b / c`, rounded down, computed in u128.
pub fn mul_div(a: u64, b: u64, c: u64) -> Result<u64> {
    if c == 0 {
        return err!(TowerError::MathOverflow);
    }

    (a as u128)
        .checked_mul(b as u128)
        .map(|x| x / c as u128)
        .and_then(|x| u64::try_from(x).ok())
        .ok_or_else(|| error!(TowerError::MathOverflow))
}

/// `a * b / c`, rounded up.
pub fn mul_div_ceil(a: u64, b: u64, c: u64) -> Result<u64> {
    if c == 0 {
        return err!(TowerError::MathOverflow);
    }

    (a as u128)
        .checked_mul(b as u128)
        .map(|x| (x + c as u128 - 1) / c as u128)
        .and_then(|x| u64::try_from(x).ok())
        .ok_or_else(|| error!(TowerError::MathOverflow))
}

pub fn checked_add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or_else(|| error!(TowerError::MathOverflow))
}

pub fn checked_sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or_else(|| error!(TowerError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_directions() {
        assert_eq!(mul_div(10, 3, 4).unwrap(), 7);
        assert_eq!(mul_div_ceil(10, 3, 4).unwrap(), 8);
        assert_eq!(mul_div_ceil(8, 3, 4).unwrap(), 6);
    }

    #[test]
    fn overflow_and_zero_divisor_are_errors() {
        assert_eq!(mul_div(u64::MAX, u64::MAX, 1).unwrap_err(), TowerError::MathOverflow.into());
        assert_eq!(mul_div(1, 1, 0).unwrap_err(), TowerError::MathOverflow.into());
        assert_eq!(checked_sub(1, 2).unwrap_err(), TowerError::MathOverflow.into());
    }
}
