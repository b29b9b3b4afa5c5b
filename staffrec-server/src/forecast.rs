//! Growth forecasting
//!
//! Extrapolates a per-year count series one year at a time by averaging
//! the most recent known values. Non-parametric and intentionally simple:
//! the series are short and noisy, so no linearity or seasonality is
//! assumed.

/// Maximum number of most-recent years averaged per forecast step
pub const WINDOW_CAP: usize = 5;

use std::collections::BTreeMap;

/// Forecast `years` consecutive yearly counts following the latest year
/// in `history`.
///
/// Each step takes the union of the history and all forecasts produced so
/// far, averages the counts of the `min(WINDOW_CAP, len)` most recent
/// years and appends the result at `max year + 1`. Forecast values feed
/// later steps, so the window slides over synthetic years once it passes
/// the end of the history.
///
/// Averages are rounded half up (2.5 -> 3). The result has exactly
/// `years` contiguous entries starting at `max(history) + 1`, or is empty
/// when `history` is empty.
pub fn forecast(history: &BTreeMap<i32, i64>, years: u32) -> BTreeMap<i32, i64> {
    let mut result = BTreeMap::new();
    if history.is_empty() {
        return result;
    }

    let mut combined = history.clone();
    for _ in 0..years {
        let window = combined.len().min(WINDOW_CAP);
        let sum: i64 = combined.values().rev().take(window).sum();
        let next_value = div_round_half_up(sum, window as i64);

        // combined is non-empty here
        let max_year = *combined.keys().next_back().unwrap();
        combined.insert(max_year + 1, next_value);
        result.insert(max_year + 1, next_value);
    }

    result
}

/// Integer division rounding half up; counts are never negative
fn div_round_half_up(sum: i64, divisor: i64) -> i64 {
    debug_assert!(sum >= 0 && divisor > 0);
    (sum * 2 + divisor) / (2 * divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(i32, i64)]) -> BTreeMap<i32, i64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn empty_history_forecasts_nothing() {
        assert!(forecast(&BTreeMap::new(), 1).is_empty());
        assert!(forecast(&BTreeMap::new(), 10).is_empty());
    }

    #[test]
    fn single_point_repeats_itself() {
        let result = forecast(&series(&[(2020, 10)]), 1);
        assert_eq!(result, series(&[(2021, 10)]));
    }

    #[test]
    fn averages_most_recent_years() {
        let result = forecast(&series(&[(2020, 10), (2021, 20), (2022, 30)]), 1);
        assert_eq!(result, series(&[(2023, 20)]));
    }

    #[test]
    fn stable_series_stays_stable() {
        let history = series(&[(2010, 1), (2011, 1), (2012, 1), (2013, 1), (2014, 1)]);
        let result = forecast(&history, 3);
        assert_eq!(result, series(&[(2015, 1), (2016, 1), (2017, 1)]));
    }

    #[test]
    fn forecast_values_feed_later_steps() {
        // 2023 forecast (20) participates in the 2024 window
        let result = forecast(&series(&[(2020, 10), (2021, 20), (2022, 30)]), 2);
        assert_eq!(result, series(&[(2023, 20), (2024, 20)]));
    }

    #[test]
    fn window_is_capped_at_five() {
        // Six historical years; 2014 (100) must not enter the window
        let history = series(&[
            (2014, 100),
            (2015, 5),
            (2016, 5),
            (2017, 5),
            (2018, 5),
            (2019, 5),
        ]);
        let result = forecast(&history, 1);
        assert_eq!(result, series(&[(2020, 5)]));
    }

    #[test]
    fn halves_round_up() {
        // (1 + 2) / 2 = 1.5 -> 2
        let result = forecast(&series(&[(2020, 1), (2021, 2)]), 1);
        assert_eq!(result, series(&[(2022, 2)]));
    }

    #[test]
    fn contiguous_years_no_gaps() {
        let result = forecast(&series(&[(1999, 3), (2004, 9)]), 4);
        let years: Vec<i32> = result.keys().copied().collect();
        assert_eq!(years, vec![2005, 2006, 2007, 2008]);
    }
}
