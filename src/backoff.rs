use std::time::Duration;

use rand::Rng;

use crate::ClientOptions;

/// Computes the jittered wait before the next attempt.
///
/// The raw interval is `base_wait · 2^(attempt − 1)`, falling back to
/// `base_wait` on overflow, and is clamped to `max_wait` when the ceiling
/// is non-zero. The clamped value is halved and a uniform random amount
/// below that half is added, so the result lands in `[raw/2, raw)` and
/// never exceeds the ceiling.
pub(crate) fn compute_wait(options: &ClientOptions, attempt: u32) -> Duration {
    let base = options.base_wait.as_millis() as u64;
    let exponent = attempt.saturating_sub(1);

    let raw = match 1u64
        .checked_shl(exponent)
        .and_then(|factor| base.checked_mul(factor))
    {
        Some(ms) if ms > 0 => ms,
        _ => base,
    };

    let max = options.max_wait.as_millis() as u64;
    let clamped = if max > 0 && raw > max { max } else { raw };

    let half = clamped / 2;
    if half == 0 {
        return Duration::from_millis(clamped);
    }

    let jitter = rand::thread_rng().gen_range(0..half);
    Duration::from_millis(half + jitter)
}
