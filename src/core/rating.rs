//! Average rating computation

use crate::core::entity::Rating;

/// Arithmetic mean of all rating values, rounded to one decimal place.
///
/// An empty slice averages to `0.0`.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|r| u32::from(r.value.get())).sum();
    round_one_decimal(f64::from(sum) / ratings.len() as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
