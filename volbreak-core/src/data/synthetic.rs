//! Synthetic series for offline development.
//!
//! A weekday-only random walk seeded from the symbol name, so the same symbol
//! and range always produce the same bars. Roughly one day in forty gets a
//! volume surge with a strong up move, which gives the classifier something
//! to find. Results built on this data are tagged as synthetic.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::RawBar;

/// Generate weekday bars from `start` to `end` inclusive.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;

    for date in start.iter_days().take_while(|d| *d <= end) {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let surge = rng.gen_bool(0.025);
        let daily_return: f64 = if surge {
            rng.gen_range(0.025..0.07)
        } else {
            rng.gen_range(-0.02..0.02)
        };
        let base_volume = rng.gen_range(800_000..1_200_000u64);
        let volume = if surge {
            base_volume * rng.gen_range(3..6u64)
        } else {
            base_volume
        };

        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));

        bars.push(RawBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }

    bars
}
