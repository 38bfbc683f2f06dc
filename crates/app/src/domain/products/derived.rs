//! Derived Product Fields
//!
//! Every stored field that is a pure function of the record's facts is
//! recomputed here, in one place, so no mutation path can forget to refresh
//! one of them.

use jiff::civil::Date;
use larder::{cadence::calculate_cadence, search, status::resolve_status};

use crate::domain::products::models::Product;

/// Refresh `name_normalized` and `search_tokens` after a name or tag change.
pub fn refresh_search_fields(product: &mut Product) {
    product.name_normalized = search::normalize(&product.name);
    product.search_tokens = search::search_tokens(&product.name_normalized, &product.tags);
}

/// Refresh the lifecycle status after a quantity or date change.
pub fn refresh_status(product: &mut Product, today: Date) {
    product.status = resolve_status(
        product.quantity_bought,
        product.quantity_consumed,
        Some(product.expiration_date),
        today,
    );
}

/// Refresh the reminder cadence.
///
/// Only creation and full updates call this, so a manual cadence override
/// survives targeted updates until the next full update.
pub fn refresh_cadence(product: &mut Product, today: Date) {
    product.notification_frequency = calculate_cadence(
        Some(product.purchase_date),
        Some(product.expiration_date),
        product.quantity_bought,
        product.quantity_consumed,
        today,
    );
}

/// Full derive pass used at creation and on full updates.
pub fn refresh_all(product: &mut Product, today: Date) {
    refresh_search_fields(product);
    refresh_status(product, today);
    refresh_cadence(product, today);
}
