// src/utils/id.rs

use rand::{Rng, distributions::Alphanumeric};

const SUFFIX_LEN: usize = 9;

/// Generates a notification id: `{unix millis}-{random base36 suffix}`.
///
/// The suffix keeps ids distinct when several are minted within the same
/// millisecond.
pub fn notification_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}", millis, suffix)
}
