use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::{ConsistencyError, Numeric, Text};
use crate::entities::SubscriptionStatus;

const DAY_MS: i64 = 86_400_000;

/// Raw subscription registration payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubscriptionInput {
    pub customer_id: Numeric,
    pub building_id: Numeric,
    pub start_date: Text,
    pub end_date: Text,
    pub days_of_subscription: Numeric,
    pub subscription_status: Text,
}

/// A subscription that passed every field-level rule. Parent existence and
/// duplicate checks still happen in the service, against the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubscription {
    pub customer_id: i32,
    pub building_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_subscription: i32,
    pub status: SubscriptionStatus,
}

/// Inclusive day count between two instants: partial days round up, and the
/// start day itself counts.
pub fn expected_subscription_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let elapsed_ms = (end - start).num_milliseconds();
    elapsed_ms.div_euclid(DAY_MS) + i64::from(elapsed_ms.rem_euclid(DAY_MS) != 0) + 1
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
fn parse_instant(field: &'static str, value: &str) -> Result<NaiveDateTime, ConsistencyError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.naive_utc());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    Err(ConsistencyError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn required_id(value: &Numeric, field: &'static str) -> Result<i32, ConsistencyError> {
    if !value.is_present() {
        return Err(ConsistencyError::MissingField(field));
    }
    value
        .positive_id()
        .ok_or(ConsistencyError::NonPositiveNumber(field))
}

/// Applies the subscription rules in order, stopping at the first failure.
pub fn validate_subscription(input: &SubscriptionInput) -> Result<ValidSubscription, ConsistencyError> {
    let customer_id = required_id(&input.customer_id, "customer_id")?;
    let building_id = required_id(&input.building_id, "building_id")?;

    let start_raw = input
        .start_date
        .as_deref()
        .ok_or(ConsistencyError::MissingField("start_date"))?;
    let end_raw = input
        .end_date
        .as_deref()
        .ok_or(ConsistencyError::MissingField("end_date"))?;

    let start = parse_instant("start_date", start_raw)?;
    let end = parse_instant("end_date", end_raw)?;
    if end < start {
        return Err(ConsistencyError::DateRangeInverted);
    }

    let provided = input
        .days_of_subscription
        .value()
        .ok_or(ConsistencyError::MissingField("days_of_subscription"))?;
    let expected = expected_subscription_days(start, end);
    if provided != expected as f64 {
        return Err(ConsistencyError::SubscriptionDaysMismatch { expected, provided });
    }
    let days_of_subscription =
        i32::try_from(expected).map_err(|_| ConsistencyError::NonPositiveNumber("days_of_subscription"))?;

    let status = match input.subscription_status.as_deref() {
        None => SubscriptionStatus::default(),
        Some(raw) => SubscriptionStatus::from_str(raw).map_err(|_| ConsistencyError::InvalidEnum {
            field: "subscription_status",
            allowed: SubscriptionStatus::ALLOWED,
        })?,
    };

    Ok(ValidSubscription {
        customer_id,
        building_id,
        start_date: start.date(),
        end_date: end.date(),
        days_of_subscription,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use proptest::prelude::*;

    fn input(start: &str, end: &str, days: f64) -> SubscriptionInput {
        SubscriptionInput {
            customer_id: Numeric::new(1.0),
            building_id: Numeric::new(2.0),
            start_date: Text::new(start),
            end_date: Text::new(end),
            days_of_subscription: Numeric::new(days),
            subscription_status: Text::default(),
        }
    }

    #[test]
    fn ten_day_range_is_accepted_with_ten_days() {
        let valid = validate_subscription(&input("2024-01-01", "2024-01-10", 10.0)).unwrap();
        assert_eq!(valid.days_of_subscription, 10);
        assert_eq!(valid.status, SubscriptionStatus::Inactive);
        assert_eq!(valid.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn ten_day_range_is_rejected_with_nine_days() {
        let err = validate_subscription(&input("2024-01-01", "2024-01-10", 9.0)).unwrap_err();
        assert_matches!(
            err,
            ConsistencyError::SubscriptionDaysMismatch { expected: 10, .. }
        );
    }

    #[test]
    fn same_day_counts_as_one() {
        let valid = validate_subscription(&input("2024-03-05", "2024-03-05", 1.0)).unwrap();
        assert_eq!(valid.days_of_subscription, 1);
    }

    #[test]
    fn partial_days_round_up() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(expected_subscription_days(start, start + Duration::hours(1)), 2);
        assert_eq!(expected_subscription_days(start, start + Duration::hours(24)), 2);
        assert_eq!(expected_subscription_days(start, start + Duration::hours(25)), 3);
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let valid = validate_subscription(&input(
            "2024-01-01T00:00:00.000Z",
            "2024-01-10T00:00:00.000Z",
            10.0,
        ))
        .unwrap();
        assert_eq!(valid.end_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn inverted_range_is_rejected_before_day_check() {
        let err = validate_subscription(&input("2024-02-10", "2024-02-01", 10.0)).unwrap_err();
        assert_eq!(err, ConsistencyError::DateRangeInverted);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = validate_subscription(&input("2024-13-45", "2024-02-01", 10.0)).unwrap_err();
        assert_matches!(err, ConsistencyError::InvalidDate { field: "start_date", .. });
    }

    #[test]
    fn missing_ids_are_reported_first() {
        let mut body = input("2024-01-01", "2024-01-10", 10.0);
        body.customer_id = Numeric::absent();
        assert_eq!(
            validate_subscription(&body).unwrap_err(),
            ConsistencyError::MissingField("customer_id")
        );

        body.customer_id = Numeric::new(-3.0);
        assert_eq!(
            validate_subscription(&body).unwrap_err(),
            ConsistencyError::NonPositiveNumber("customer_id")
        );
    }

    #[test]
    fn status_is_parsed_case_insensitively_and_unknown_values_rejected() {
        let mut body = input("2024-01-01", "2024-01-10", 10.0);
        body.subscription_status = Text::new("Active");
        assert_eq!(
            validate_subscription(&body).unwrap().status,
            SubscriptionStatus::Active
        );

        body.subscription_status = Text::new("paused");
        assert_matches!(
            validate_subscription(&body).unwrap_err(),
            ConsistencyError::InvalidEnum { field: "subscription_status", .. }
        );
    }

    proptest! {
        #[test]
        fn accepted_iff_days_match(offset in 0i64..3650, span in 0i64..730, delta in -2i64..=2) {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            let start = base + Duration::days(offset);
            let end = start + Duration::days(span);
            let days = span + 1 + delta;

            let result = validate_subscription(&input(
                &start.format("%Y-%m-%d").to_string(),
                &end.format("%Y-%m-%d").to_string(),
                days as f64,
            ));

            if delta == 0 {
                prop_assert!(result.is_ok());
            } else {
                let is_mismatch = matches!(
                    result,
                    Err(ConsistencyError::SubscriptionDaysMismatch { .. })
                );
                prop_assert!(is_mismatch);
            }
        }

        #[test]
        fn inverted_ranges_never_pass(offset in 1i64..3650, days in 0i64..400) {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            let end = base;
            let start = base + Duration::days(offset);
            let result = validate_subscription(&input(
                &start.format("%Y-%m-%d").to_string(),
                &end.format("%Y-%m-%d").to_string(),
                days as f64,
            ));
            prop_assert_eq!(result.unwrap_err(), ConsistencyError::DateRangeInverted);
        }
    }
}
