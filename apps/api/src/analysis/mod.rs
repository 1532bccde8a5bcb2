// Resume fit analysis engine.
// Normalizes streamed per-dimension results and ranks improvement opportunities.
// The scoring functions are pure; only `session` and `handlers` hold state or do I/O.

pub mod dimension_map;
pub mod handlers;
pub mod impact;
pub mod normalizer;
pub mod session;
pub mod weights;

/// Rounds half up (`2.5 -> 3`, `-2.5 -> -2`), matching how the dashboard rounds scores.
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
