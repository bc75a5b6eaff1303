//! Result limit and offset.

use tracing::debug;

use super::QueryParams;

pub const LIMIT_KEY: &str = "limit";
pub const OFFSET_KEY: &str = "offset";

/// Limit used when none (or garbage) is requested.
pub const DEFAULT_LIMIT: u32 = 100;
/// Largest page a client can request.
pub const MAX_LIMIT: u32 = 1000;
/// Largest offset a client can request.
pub const MAX_OFFSET: u32 = 100_000;

/// Parse an integer leniently: `"10"`, `" 10 "` and `"10.7"` all give 10.
fn parse_lenient(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    })
}

/// Result limit, always within `1..=MAX_LIMIT`.
pub fn build_limit(params: &QueryParams) -> u32 {
    let Some(raw) = params.get(LIMIT_KEY) else {
        return DEFAULT_LIMIT;
    };

    match parse_lenient(raw) {
        Some(limit) => limit.clamp(1, MAX_LIMIT as i64) as u32,
        None => {
            debug!(limit = %raw, "Non-numeric limit, using default");
            DEFAULT_LIMIT
        }
    }
}

/// Result offset, always within `0..=MAX_OFFSET`.
pub fn build_offset(params: &QueryParams) -> u32 {
    params
        .get(OFFSET_KEY)
        .and_then(|raw| parse_lenient(raw))
        .map(|offset| offset.clamp(0, MAX_OFFSET as i64) as u32)
        .unwrap_or(0)
}
