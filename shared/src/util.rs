/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at restaurant scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// UTC day bounds `[start, end)` in milliseconds for the day containing `ts`.
///
/// Used by the revenue reports to select "today's" orders.
pub fn utc_day_bounds(ts: i64) -> (i64, i64) {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let start = ts.div_euclid(DAY_MS) * DAY_MS;
    (start, start + DAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_fits_in_53_bits() {
        for _ in 0..100 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id < (1_i64 << 53), "id {id} exceeds JS safe integer range");
        }
    }

    #[test]
    fn snowflake_ids_are_distinct() {
        let ids: std::collections::HashSet<i64> = (0..64).map(|_| snowflake_id()).collect();
        // 12 random bits per millisecond make collisions in a small batch unlikely
        assert!(ids.len() > 60);
    }

    #[test]
    fn utc_day_bounds_covers_exactly_one_day() {
        let ts = now_millis();
        let (start, end) = utc_day_bounds(ts);
        assert!(start <= ts && ts < end);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }
}
