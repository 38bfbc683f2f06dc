//! Consumption Analytics
//!
//! Read-only analysis of a product's consumption pace against its expiration
//! date. The engine never persists anything; it produces a [`Report`] with
//! explicit `None` for every metric it cannot compute, paired with a warning
//! explaining why. Only a non-positive bought quantity is a hard failure —
//! every other input irregularity is sanitized and reported as a warning.
//!
//! Date arithmetic deliberately follows the same conventions as
//! [`crate::status`]: a product counts as expired on the expiration day
//! itself.

use jiff::{Span, Unit, civil::Date};
use serde::Serialize;
use thiserror::Error;

use crate::{rounding::round_to, status::Status};

/// Pace ratio below which consumption counts as too slow.
const PACE_TOO_SLOW: f64 = 0.7;
/// Pace ratio above which consumption counts as too fast.
const PACE_TOO_FAST: f64 = 1.5;
/// Remaining quantity at or below which the product counts as finished,
/// tolerating floating-point dust.
const FINISHED_EPSILON: f64 = 0.001;
/// Days-to-expiry threshold for the urgent warning.
const URGENT_DAYS: i64 = 3;
/// Days-to-expiry threshold for the expiring-soon warning.
const SOON_DAYS: i64 = 7;
/// Finishing this many days before expiration earns a comfortable-margin note.
const EARLY_MARGIN_DAYS: i64 = 7;
/// Days without any consumption before nudging the owner to start.
const START_NUDGE_DAYS: i64 = 2;

/// Analytics failure.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The engine cannot produce a report without a positive bought quantity.
    #[error("quantity bought must be greater than zero")]
    NonPositiveQuantityBought,

    /// Calendar arithmetic failed while deriving a date-based metric.
    #[error("date arithmetic failed")]
    Date(#[from] jiff::Error),
}

/// Consumption analytics report.
///
/// Every field that cannot be computed is `None` (serialised as JSON `null`)
/// and explained by an entry in `warnings` — never silently omitted.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Quantity still unconsumed, clamped at zero. Rounded to 4 places.
    pub remaining_quantity: f64,

    /// Share of the bought quantity consumed, 0–100, rounded to 2 places.
    pub percent_consumed: f64,

    /// `100 - percent_consumed`, rounded to 2 places.
    pub percent_remaining: f64,

    /// Calendar days until expiration; negative once past.
    pub days_until_expiration: Option<i64>,

    /// Whole calendar months until expiration.
    pub months_until_expiration: Option<i64>,

    /// Whole calendar years until expiration.
    pub years_until_expiration: Option<i64>,

    /// Whether today is on or after the expiration date.
    pub is_expired: bool,

    /// Calendar days since purchase; `None` for missing or future dates.
    pub days_since_purchase: Option<i64>,

    /// Average units consumed per day since purchase, rounded to 6 places.
    pub current_avg_daily_consumption: Option<f64>,

    /// Units per day needed to finish before expiration, rounded to 6 places.
    pub recommended_daily_to_finish: Option<f64>,

    /// Units per month needed to finish before expiration; only present when
    /// at least one full month remains. Rounded to 6 places.
    pub recommended_monthly_to_finish: Option<f64>,

    /// Projected date the product runs out at the current pace.
    pub estimated_finish_date: Option<Date>,

    /// Projected days from today until the product runs out.
    pub estimated_days_to_finish: Option<i64>,

    /// Status the resolver is expected to agree with for well-formed input.
    pub status_suggestion: Status,

    /// One-line human-readable digest of the report.
    pub summary: String,

    /// Soft anomalies and advisories, in the order they were detected.
    pub warnings: Vec<String>,
}

/// Analyze a product's consumption against its dates.
///
/// `bought` must be strictly positive; a missing or negative `consumed` is
/// treated as zero with a warning. `today` is injected so the engine stays a
/// pure function.
pub fn analyze(
    bought: f64,
    consumed: Option<f64>,
    purchase: Option<Date>,
    expiration: Option<Date>,
    today: Date,
) -> Result<Report, AnalysisError> {
    if bought.is_nan() || bought <= 0.0 {
        return Err(AnalysisError::NonPositiveQuantityBought);
    }

    let mut warnings = Vec::new();

    let mut consumed = consumed.unwrap_or(0.0);
    if consumed.is_nan() || consumed < 0.0 {
        warnings.push(
            "Consumed quantity cannot be negative. Treating as 0 for calculations.".to_string(),
        );
        consumed = 0.0;
    }

    let mut remaining = bought - consumed;
    if remaining < 0.0 {
        warnings.push(
            "Consumed quantity exceeds purchased quantity. The product appears to be fully \
             consumed."
                .to_string(),
        );
        remaining = 0.0;
    }

    let percent_consumed = ((consumed / bought) * 100.0).clamp(0.0, 100.0);

    // Expiration horizon.
    let mut days_until_expiration = None;
    let mut months_until_expiration = None;
    let mut years_until_expiration = None;
    let mut is_expired = false;

    if let Some(expiration) = expiration {
        let days = i64::from((expiration - today).get_days());

        days_until_expiration = Some(days);
        months_until_expiration = Some(i64::from(
            today.until((Unit::Month, expiration))?.get_months(),
        ));
        years_until_expiration = Some(i64::from(today.until((Unit::Year, expiration))?.get_years()));
        is_expired = today >= expiration;

        if is_expired && remaining > 0.0 {
            warnings.push(format!(
                "This product has expired with {} units remaining. Consider discarding it.",
                round_to(remaining, 2)
            ));
        } else if days <= URGENT_DAYS && remaining > 0.0 {
            warnings.push(format!("URGENT: Only {days} days until expiration!"));
        } else if days <= SOON_DAYS && remaining > 0.0 {
            warnings.push(format!("Expiring soon: {days} days left."));
        }
    } else {
        warnings.push("No expiration date set. Expiration-related metrics unavailable.".to_string());
    }

    // Current consumption rate.
    let mut days_since_purchase = None;
    let mut current_rate = None;

    if let Some(purchase) = purchase {
        let days = i64::from((today - purchase).get_days());

        if days < 0 {
            warnings
                .push("Purchase date is in the future. Cannot calculate consumption rate.".to_string());
        } else if days == 0 {
            // Purchased today: treat today's consumption as the rate, if any.
            days_since_purchase = Some(0);

            if consumed > 0.0 {
                current_rate = Some(consumed);
            }
        } else {
            days_since_purchase = Some(days);
            current_rate = Some(consumed / days as f64);
        }
    } else {
        warnings.push("No purchase date set. Cannot calculate consumption rate.".to_string());
    }

    // Recommended pace to finish before expiration.
    let mut recommended_daily = None;
    let mut recommended_monthly = None;

    if let Some(expiration) = expiration.filter(|_| !is_expired && remaining > 0.0) {
        let days_left = i64::from((expiration - today).get_days());

        if days_left > 0 {
            let daily = remaining / days_left as f64;
            recommended_daily = Some(daily);

            let months_left = i64::from(today.until((Unit::Month, expiration))?.get_months());
            if months_left > 0 {
                recommended_monthly = Some(remaining / months_left as f64);
            }

            match current_rate {
                Some(rate) if rate > 0.0 => {
                    let pace = rate / daily;

                    if pace < PACE_TOO_SLOW {
                        warnings.push(format!(
                            "Current pace ({}/day) is below recommended ({}/day). Increase usage \
                             to finish before expiration.",
                            round_to(rate, 2),
                            round_to(daily, 2)
                        ));
                    } else if pace > PACE_TOO_FAST {
                        warnings.push(format!(
                            "Current pace ({}/day) is faster than needed ({}/day). You can slow \
                             down.",
                            round_to(rate, 2),
                            round_to(daily, 2)
                        ));
                    } else {
                        warnings.push(
                            "You're on track! Current pace will finish the product before \
                             expiration."
                                .to_string(),
                        );
                    }
                }
                _ => {
                    if consumed == 0.0
                        && days_since_purchase.is_some_and(|days| days > START_NUDGE_DAYS)
                    {
                        warnings.push(format!(
                            "Haven't started consuming yet. Begin using {} units per day to \
                             finish before expiration.",
                            round_to(daily, 2)
                        ));
                    }
                }
            }
        }
    }

    // Projected finish date at the current pace.
    let mut estimated_finish_date = None;
    let mut estimated_days_to_finish = None;

    if let Some(rate) = current_rate.filter(|rate| *rate > 0.0 && remaining > 0.0) {
        let days_to_finish = (remaining / rate).ceil() as i64;

        // A glacial pace can project a finish date beyond the calendar range;
        // the estimate is then omitted rather than failing the whole report.
        let finish = Span::new()
            .try_days(days_to_finish)
            .ok()
            .and_then(|span| today.checked_add(span).ok());

        if let Some(finish) = finish {
            estimated_finish_date = Some(finish);
            estimated_days_to_finish = Some(days_to_finish);
        }

        if let Some((finish, expiration)) = finish.zip(expiration) {
            if finish > expiration {
                let days_late = i64::from((finish - expiration).get_days());
                warnings.push(format!(
                    "At current pace, you'll finish {days_late} days after expiration. Increase \
                     consumption to finish on time."
                ));
            } else if !is_expired {
                let days_early = i64::from((expiration - finish).get_days());

                if days_early > EARLY_MARGIN_DAYS {
                    warnings.push(format!(
                        "At current pace, you'll finish {days_early} days before expiration. \
                         Well done!"
                    ));
                }
            }
        }
    }

    let status_suggestion = Status::from_flags(remaining <= FINISHED_EPSILON, is_expired);
    let summary = build_summary(
        bought,
        consumed,
        remaining,
        days_until_expiration,
        status_suggestion,
    );

    Ok(Report {
        remaining_quantity: round_to(remaining, 4),
        percent_consumed: round_to(percent_consumed, 2),
        percent_remaining: round_to(100.0 - percent_consumed, 2),
        days_until_expiration,
        months_until_expiration,
        years_until_expiration,
        is_expired,
        days_since_purchase,
        current_avg_daily_consumption: current_rate.map(|rate| round_to(rate, 6)),
        recommended_daily_to_finish: recommended_daily.map(|rate| round_to(rate, 6)),
        recommended_monthly_to_finish: recommended_monthly.map(|rate| round_to(rate, 6)),
        estimated_finish_date,
        estimated_days_to_finish,
        status_suggestion,
        summary,
        warnings,
    })
}

fn build_summary(
    bought: f64,
    consumed: f64,
    remaining: f64,
    days_until_expiration: Option<i64>,
    status: Status,
) -> String {
    let mut summary = format!(
        "Bought: {} | Consumed: {} ({}%) | Remaining: {}",
        round_to(bought, 2),
        round_to(consumed, 2),
        round_to((consumed / bought) * 100.0, 1),
        round_to(remaining, 2),
    );

    match days_until_expiration {
        Some(days) if days < 0 => {
            summary.push_str(&format!(" | Expired {} days ago", days.abs()));
        }
        Some(0) => summary.push_str(" | Expires TODAY"),
        Some(days) => summary.push_str(&format!(" | Expires in {days} days")),
        None => summary.push_str(" | No expiration date"),
    }

    summary.push_str(&format!(" | Status: {status}"));

    summary
}
