//! Time-window resolution.
//!
//! Translates the user's time selection into the bound expressions the
//! backend understands. Live mode produces a rolling `now() - window`
//! expression; a pivot time produces an absolute window centered on the
//! pivot and clipped to the extent of the loaded histogram data.

use anyhow::Result;
use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::logs::types::{
    HistogramDatum, SearchStatus, TableTime, TimeBounds, TimeWindow, RELATIVE_NOW, TIME_OPTION_NOW,
};

use super::LogExplorer;

/// Span used when a pivot is chosen before any window has been picked.
const DEFAULT_WINDOW_SECONDS: i64 = 300;

/// Resolve query bounds from the time selection and the loaded extent.
pub fn resolve(
    time_option: &str,
    window_option: &str,
    seconds: Option<i64>,
    extent_times: &[DateTime<Utc>],
) -> TimeBounds {
    if time_option == TIME_OPTION_NOW {
        return TimeBounds {
            lower: format!("now() - {window_option}"),
            upper: None,
        };
    }
    compute_time_bounds(extent_times, time_option, seconds)
}

/// Window `[pivot - s/2, pivot + s/2]` clipped to the loaded data extent.
/// Malformed pivots are not validated here; they pass through verbatim for
/// the backend to reject.
pub fn compute_time_bounds(
    extent_times: &[DateTime<Utc>],
    time_option: &str,
    seconds: Option<i64>,
) -> TimeBounds {
    let pivot = match DateTime::parse_from_rfc3339(time_option) {
        Ok(time) => time.with_timezone(&Utc),
        Err(_) => {
            return TimeBounds {
                lower: time_option.to_string(),
                upper: None,
            }
        }
    };

    let half = Duration::seconds(seconds.unwrap_or(DEFAULT_WINDOW_SECONDS) / 2);
    let mut lower = pivot - half;
    let mut upper = pivot + half;

    if let (Some(min), Some(max)) = (extent_times.iter().min(), extent_times.iter().max()) {
        lower = lower.max(*min);
        upper = upper.min(*max);
    }

    TimeBounds {
        lower: lower.to_rfc3339_opts(SecondsFormat::Millis, true),
        upper: Some(upper.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}

/// Min/max times observed in the loaded histogram data.
pub fn extent_times(histogram: &[HistogramDatum]) -> Vec<DateTime<Utc>> {
    let min = histogram.iter().map(|d| d.time).min();
    let max = histogram.iter().map(|d| d.time).max();
    match (min, max) {
        (Some(min), Some(max)) => vec![min, max],
        _ => Vec::new(),
    }
}

impl LogExplorer {
    /// Recompute bounds from the current selection, then reload.
    pub async fn handle_set_time_bounds(&self) -> Result<()> {
        let bounds = self.state.write(|s| {
            let extent = extent_times(&s.histogram_data);
            let bounds = resolve(
                &s.time_range.time_option,
                &s.time_range.window_option,
                s.time_range.seconds,
                &extent,
            );
            s.time_bounds = bounds.clone();
            bounds
        });
        log::debug!(
            "[TIME] bounds resolved: lower={} upper={:?}",
            bounds.lower,
            bounds.upper
        );
        self.update_table_data(SearchStatus::UpdatingTimeBounds).await
    }

    /// Pin the table to a fixed pivot timestamp. Leaves live mode.
    pub async fn choose_custom_time(&self, time: &str) -> Result<()> {
        self.stop_live_tail();
        self.state.write(|s| {
            s.clear_bounds();
            s.table_time = TableTime::Custom {
                time: time.to_string(),
            };
            s.has_scrolled = false;
            s.time_range.time_option = time.to_string();
        });
        self.handle_set_time_bounds().await
    }

    /// Anchor the table a relative offset from now; zero re-enters live
    /// mode (the tail is re-armed by the reload that follows).
    pub async fn choose_relative_time(&self, seconds: i64) -> Result<()> {
        if seconds == RELATIVE_NOW {
            self.state.write(|s| {
                s.clear_bounds();
                s.table_time = TableTime::Relative { seconds };
                s.has_scrolled = false;
                s.time_range.time_option = TIME_OPTION_NOW.to_string();
                s.live_updating = true;
            });
        } else {
            self.stop_live_tail();
            let pivot =
                (Utc::now() - Duration::seconds(seconds)).to_rfc3339_opts(SecondsFormat::Millis, true);
            self.state.write(|s| {
                s.clear_bounds();
                s.table_time = TableTime::Relative { seconds };
                s.has_scrolled = false;
                s.time_range.time_option = pivot;
            });
        }
        self.handle_set_time_bounds().await
    }

    /// Change the window span around the current pivot.
    pub async fn set_time_window(&self, window: TimeWindow) -> Result<()> {
        self.state.write(|s| {
            s.time_range.window_option = window.window_option;
            s.time_range.seconds = Some(window.seconds);
        });
        self.handle_set_time_bounds().await
    }

    /// A histogram bar click pivots the view to that bucket's time.
    pub async fn handle_bar_click(&self, time: DateTime<Utc>) -> Result<()> {
        self.choose_custom_time(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_live_mode_produces_rolling_window() {
        let bounds = resolve(TIME_OPTION_NOW, "5m", None, &[]);
        assert_eq!(bounds.lower, "now() - 5m");
        assert_eq!(bounds.upper, None);
    }

    #[test]
    fn test_pivot_window_centers_on_pivot() {
        let pivot = at(10_000);
        let bounds = compute_time_bounds(&[], &pivot.to_rfc3339(), Some(600));
        assert_eq!(bounds.lower, at(9_700).to_rfc3339_opts(SecondsFormat::Millis, true));
        assert_eq!(
            bounds.upper,
            Some(at(10_300).to_rfc3339_opts(SecondsFormat::Millis, true))
        );
    }

    #[test]
    fn test_pivot_window_clips_to_extent() {
        let pivot = at(10_000);
        let extent = vec![at(9_900), at(10_050)];
        let bounds = compute_time_bounds(&extent, &pivot.to_rfc3339(), Some(600));
        assert_eq!(bounds.lower, at(9_900).to_rfc3339_opts(SecondsFormat::Millis, true));
        assert_eq!(
            bounds.upper,
            Some(at(10_050).to_rfc3339_opts(SecondsFormat::Millis, true))
        );
    }

    #[test]
    fn test_malformed_pivot_passes_through() {
        let bounds = compute_time_bounds(&[], "not-a-time", Some(600));
        assert_eq!(bounds.lower, "not-a-time");
        assert_eq!(bounds.upper, None);
    }

    #[test]
    fn test_extent_of_histogram_data() {
        let data = vec![
            HistogramDatum {
                time: at(50),
                value: 1,
                group: "info".into(),
            },
            HistogramDatum {
                time: at(10),
                value: 2,
                group: "err".into(),
            },
            HistogramDatum {
                time: at(30),
                value: 3,
                group: "info".into(),
            },
        ];
        assert_eq!(extent_times(&data), vec![at(10), at(50)]);
        assert!(extent_times(&[]).is_empty());
    }
}
