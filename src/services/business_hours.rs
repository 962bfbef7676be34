//! Business-window expansion.
//!
//! For one store, one calendar day and one reporting window, produces the
//! UTC sub-intervals during which the store counts as open. A weekday with
//! no recorded rule is open all day; this is deliberately the opposite of
//! "closed all day" and easy to invert by mistake.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::api::BusinessHourRule;
use crate::models::time::{local_to_utc, TimeError};

/// Expand the business hours of a single local calendar day into UTC
/// sub-intervals clipped to `[window_start, window_end)`.
///
/// `rules` must already be filtered to the day's weekday. Rules are assumed
/// to lie within one calendar day; a rule whose end does not exceed its
/// start clips to empty and contributes nothing.
pub fn business_windows_for_day(
    rules: &[BusinessHourRule],
    day: NaiveDate,
    tz_name: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, TimeError> {
    let spans: Vec<(NaiveTime, NaiveTime)> = if rules.is_empty() {
        // No recorded hours means always open.
        let day_end = NaiveTime::from_hms_opt(23, 59, 59).expect("23:59:59 is a valid time");
        vec![(NaiveTime::MIN, day_end)]
    } else {
        rules
            .iter()
            .map(|r| (r.start_time_local, r.end_time_local))
            .collect()
    };

    let mut windows = Vec::with_capacity(spans.len());
    for (start_local, end_local) in spans {
        let bh_start = local_to_utc(day.and_time(start_local), tz_name)?;
        let bh_end = local_to_utc(day.and_time(end_local), tz_name)?;

        let clipped_start = bh_start.max(window_start);
        let clipped_end = bh_end.min(window_end);
        if clipped_start >= clipped_end {
            continue;
        }
        windows.push((clipped_start, clipped_end));
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StoreId;
    use chrono::TimeZone;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 25).unwrap()
    }

    fn rule(start: (u32, u32), end: (u32, u32)) -> BusinessHourRule {
        BusinessHourRule {
            store_id: StoreId::new("s1"),
            day_of_week: 2,
            start_time_local: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time_local: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    fn wide_window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2023, 1, 24, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 27, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_no_rules_means_open_all_day() {
        let (ws, we) = wide_window();
        let windows = business_windows_for_day(&[], day(), "UTC", ws, we).unwrap();
        assert_eq!(windows.len(), 1);
        let (start, end) = windows[0];
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 1, 25, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2023, 1, 25, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_explicit_rule_converted_to_utc() {
        // 09:00-17:00 Chicago (CST, UTC-6) = 15:00-23:00 UTC
        let (ws, we) = wide_window();
        let windows =
            business_windows_for_day(&[rule((9, 0), (17, 0))], day(), "America/Chicago", ws, we)
                .unwrap();
        assert_eq!(windows.len(), 1);
        let (start, end) = windows[0];
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 1, 25, 15, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2023, 1, 25, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_rule_clipped_to_report_window() {
        let ws = Utc.with_ymd_and_hms(2023, 1, 25, 10, 0, 0).unwrap();
        let we = Utc.with_ymd_and_hms(2023, 1, 25, 12, 0, 0).unwrap();
        let windows =
            business_windows_for_day(&[rule((9, 0), (17, 0))], day(), "UTC", ws, we).unwrap();
        assert_eq!(windows, vec![(ws, we)]);
    }

    #[test]
    fn test_rule_outside_window_is_discarded() {
        let ws = Utc.with_ymd_and_hms(2023, 1, 25, 20, 0, 0).unwrap();
        let we = Utc.with_ymd_and_hms(2023, 1, 25, 22, 0, 0).unwrap();
        let windows =
            business_windows_for_day(&[rule((9, 0), (17, 0))], day(), "UTC", ws, we).unwrap();
        assert!(windows.is_empty());
    }

    #[test]
    fn test_split_shift_produces_two_windows() {
        let (ws, we) = wide_window();
        let rules = [rule((8, 0), (12, 0)), rule((14, 0), (18, 0))];
        let windows = business_windows_for_day(&rules, day(), "UTC", ws, we).unwrap();
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn test_inverted_rule_contributes_nothing() {
        let (ws, we) = wide_window();
        let windows =
            business_windows_for_day(&[rule((22, 0), (2, 0))], day(), "UTC", ws, we).unwrap();
        assert!(windows.is_empty());
    }

    #[test]
    fn test_unknown_zone_is_an_error() {
        let (ws, we) = wide_window();
        let result = business_windows_for_day(&[], day(), "Not/A_Zone", ws, we);
        assert!(matches!(result, Err(TimeError::InvalidTimezone(_))));
    }
}
