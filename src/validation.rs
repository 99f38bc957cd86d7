//! Format checks for the fields of a new expense.

use crate::Error;

/// Check that `raw` is a non-negative real number.
///
/// Leading and trailing whitespace is ignored. Zero is allowed and there is no
/// upper bound. The number is only parsed to perform the check, callers should
/// keep the original string to avoid rounding.
///
/// # Errors
/// Returns:
/// - [Error::EmptyInput] if `raw` is empty or only whitespace,
/// - [Error::NotANumber] if `raw` is not a finite number,
/// - or [Error::NegativeAmount] if the number is less than zero.
pub fn validate_amount(raw: &str) -> Result<(), Error> {
    let amount = raw.trim();

    if amount.is_empty() {
        return Err(Error::EmptyInput("amount"));
    }

    let value: f64 = amount.parse().map_err(|_| Error::NotANumber)?;

    // `f64::from_str` also accepts "inf" and "NaN", neither of which is an amount.
    if !value.is_finite() {
        return Err(Error::NotANumber);
    }

    if value < 0.0 {
        return Err(Error::NegativeAmount);
    }

    Ok(())
}

/// Check that `raw` looks like a `YYYY-MM-DD` date.
///
/// This is a format check only: each segment must be made of digits and have
/// the right length, but a month of 13 or a day of 32 is accepted.
///
/// # Errors
/// Returns [Error::EmptyInput] if `raw` is empty or only whitespace, or
/// [Error::BadFormat] if it does not have the shape `YYYY-MM-DD`.
pub fn validate_date(raw: &str) -> Result<(), Error> {
    let date = raw.trim();

    if date.is_empty() {
        return Err(Error::EmptyInput("date"));
    }

    let segments: Vec<&str> = date.split('-').collect();

    let [year, month, day] = segments.as_slice() else {
        return Err(Error::BadFormat);
    };

    let well_formed = [(year, 4), (month, 2), (day, 2)]
        .into_iter()
        .all(|(segment, length)| is_digits_of_length(segment, length));

    if well_formed {
        Ok(())
    } else {
        Err(Error::BadFormat)
    }
}

fn is_digits_of_length(segment: &str, length: usize) -> bool {
    segment.len() == length && segment.bytes().all(|byte| byte.is_ascii_digit())
}
