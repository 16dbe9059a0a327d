use ruint::aliases::U256;

use crate::errors::SaleError;

fn to_u256(value: i128) -> Result<U256, SaleError> {
    let value = u128::try_from(value).map_err(|_| SaleError::InvalidAmount)?;
    Ok(U256::from(value))
}

fn to_amount(value: U256) -> Result<i128, SaleError> {
    let value: u128 = value.try_into().map_err(|_| SaleError::MathOverflow)?;
    i128::try_from(value).map_err(|_| SaleError::MathOverflow)
}

// value * numerator / denominator, widened to 256 bits so wei-scale
// contributions times full token supplies cannot overflow.
fn product(value: i128, numerator: i128, denominator: i128) -> Result<(U256, U256), SaleError> {
    let denominator = to_u256(denominator)?;
    if denominator.is_zero() {
        return Err(SaleError::DivisionByZero);
    }
    let product = to_u256(value)?
        .checked_mul(to_u256(numerator)?)
        .ok_or(SaleError::MathOverflow)?;
    Ok((product, denominator))
}

/// `floor(value * numerator / denominator)` for non-negative amounts.
pub fn mul_div_floor(value: i128, numerator: i128, denominator: i128) -> Result<i128, SaleError> {
    let (product, denominator) = product(value, numerator, denominator)?;
    let quotient = product
        .checked_div(denominator)
        .ok_or(SaleError::DivisionByZero)?;
    to_amount(quotient)
}

/// `ceil(value * numerator / denominator)` for non-negative amounts.
pub fn mul_div_ceil(value: i128, numerator: i128, denominator: i128) -> Result<i128, SaleError> {
    let (product, denominator) = product(value, numerator, denominator)?;
    let bias = denominator
        .checked_sub(U256::from(1u128))
        .ok_or(SaleError::MathOverflow)?;
    let quotient = product
        .checked_add(bias)
        .ok_or(SaleError::MathOverflow)?
        .checked_div(denominator)
        .ok_or(SaleError::DivisionByZero)?;
    to_amount(quotient)
}
