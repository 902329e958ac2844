use crate::error::{AppError, AppResult};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Whether `rating` is within 1 through 5.
pub fn is_valid_rating(rating: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Parse a `rating` query parameter.
///
/// Anything that is not a base-10 integer (including an empty value or one
/// that overflows) is [`AppError::MalformedInput`]; a well-formed integer
/// outside 1–5 is [`AppError::InvalidRange`].
pub fn parse_rating(raw: &str) -> AppResult<i64> {
    let rating: i64 = raw
        .parse()
        .map_err(|_| AppError::MalformedInput(format!("Rating '{}' is not an integer", raw)))?;

    if !is_valid_rating(rating) {
        return Err(AppError::InvalidRange(rating));
    }
    Ok(rating)
}
