//! Notification Cadence
//!
//! A small heuristic deriving how often to remind an owner about a product
//! from its days-to-expiry and remaining quantity.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// How often to send product reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    /// No reminders; assigned once a product has expired.
    Never,

    /// Daily reminders for products running out or expiring within a week.
    Daily,

    /// Weekly reminders for products expiring within a month.
    Weekly,

    /// The default cadence, also the fallback when dates are missing.
    Monthly,

    /// Reachable only through a manual override, never produced by the
    /// heuristic.
    Quarterly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Never => "NEVER",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
        };

        f.write_str(name)
    }
}

/// Remaining quantity at or below which daily reminders kick in.
const LOW_QUANTITY: f64 = 2.0;
/// Days-to-expiry at or below which daily reminders kick in.
const DAILY_WINDOW_DAYS: i64 = 7;
/// Days-to-expiry at or below which weekly reminders kick in.
const WEEKLY_WINDOW_DAYS: i64 = 30;

/// Derive the reminder cadence for a product.
///
/// Missing dates fall back to [`Frequency::Monthly`] rather than failing.
/// The first matching rule wins: expired products get no reminders; nearly
/// empty or soon-expiring products get daily ones; a moderate horizon gets
/// weekly; everything else monthly.
#[must_use]
pub fn calculate_cadence(
    purchase: Option<Date>,
    expiration: Option<Date>,
    bought: f64,
    consumed: f64,
    today: Date,
) -> Frequency {
    let (Some(_), Some(expiration)) = (purchase, expiration) else {
        return Frequency::Monthly;
    };

    let days_to_expiry = i64::from((expiration - today).get_days());
    let remaining = (bought - consumed).max(0.0);

    if days_to_expiry <= 0 {
        return Frequency::Never;
    }

    if remaining <= LOW_QUANTITY || days_to_expiry <= DAILY_WINDOW_DAYS {
        return Frequency::Daily;
    }

    if days_to_expiry <= WEEKLY_WINDOW_DAYS {
        return Frequency::Weekly;
    }

    Frequency::Monthly
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    const TODAY: fn() -> Date = || date(2024, 6, 15);

    #[test]
    fn missing_dates_fall_back_to_monthly() {
        assert_eq!(
            calculate_cadence(None, Some(date(2024, 7, 1)), 10.0, 0.0, TODAY()),
            Frequency::Monthly
        );
        assert_eq!(
            calculate_cadence(Some(date(2024, 6, 1)), None, 10.0, 0.0, TODAY()),
            Frequency::Monthly
        );
    }

    #[test]
    fn expired_products_are_never_reminded() {
        // Expiration long past relative to `today`.
        assert_eq!(
            calculate_cadence(
                Some(date(2024, 1, 1)),
                Some(date(2024, 1, 2)),
                10.0,
                0.0,
                TODAY()
            ),
            Frequency::Never
        );
        // Expiring today also stops reminders.
        assert_eq!(
            calculate_cadence(Some(date(2024, 6, 1)), Some(TODAY()), 10.0, 0.0, TODAY()),
            Frequency::Never
        );
    }

    #[test]
    fn expiring_within_a_week_is_daily() {
        assert_eq!(
            calculate_cadence(
                Some(date(2024, 6, 1)),
                Some(date(2024, 6, 18)),
                10.0,
                0.0,
                TODAY()
            ),
            Frequency::Daily
        );
    }

    #[test]
    fn low_remaining_quantity_is_daily_regardless_of_horizon() {
        assert_eq!(
            calculate_cadence(
                Some(date(2024, 6, 1)),
                Some(date(2024, 12, 1)),
                10.0,
                8.5,
                TODAY()
            ),
            Frequency::Daily
        );
    }

    #[test]
    fn moderate_horizon_is_weekly() {
        assert_eq!(
            calculate_cadence(
                Some(date(2024, 6, 1)),
                Some(date(2024, 7, 5)),
                10.0,
                0.0,
                TODAY()
            ),
            Frequency::Weekly
        );
    }

    #[test]
    fn long_horizon_is_monthly() {
        assert_eq!(
            calculate_cadence(
                Some(date(2024, 6, 1)),
                Some(date(2024, 9, 13)),
                10.0,
                0.0,
                TODAY()
            ),
            Frequency::Monthly
        );
    }
}
