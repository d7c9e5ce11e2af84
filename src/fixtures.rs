use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::aggregation::DateRangeExpression;
use crate::client::SearchClient;
use crate::models::ProductDetails;

/// Document field carrying the expiration timestamp.
pub const EXPIRY_FIELD: &str = "expDate";

/// The security plugin's own index; cleanup must never touch it.
pub const SECURITY_INDEX: &str = ".opendistro_security";

// Each range's upper bound sits one second below the next range's lower
// bound, keeping the ranges exclusive-open.
const RANGE_TRIM_MS: i64 = 1_000;

pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 2, 20, 0, 0, 0).unwrap()
}

pub fn date_plus_days(days: i64) -> DateTime<Utc> {
    base_date() + Duration::days(days)
}

/// Six products expiring on consecutive days, keyed by document id.
pub fn products() -> Vec<(&'static str, ProductDetails)> {
    vec![
        ("1", ProductDetails::new("egg", 2, date_plus_days(1))),
        ("2", ProductDetails::new("meat", 15, date_plus_days(2))),
        ("3", ProductDetails::new("ham", 30, date_plus_days(3))),
        ("4", ProductDetails::new("cheese", 25, date_plus_days(4))),
        ("5", ProductDetails::new("pasta", 8, date_plus_days(5))),
        ("6", ProductDetails::new("oil", 50, date_plus_days(6))),
    ]
}

/// Indexes all fixture products with synchronous refresh, so the aggregation
/// issued right after sees every document.
pub fn seed_products(client: &SearchClient, index: &str) -> Result<()> {
    for (id, product) in products() {
        client.create_document(index, id, &product, true)?;
    }
    Ok(())
}

/// Three two-day ranges covering the six expiration dates.
pub fn expiry_ranges() -> Vec<DateRangeExpression> {
    vec![
        DateRangeExpression::new("from-1-to-2-days", millis_plus_days(1), millis_plus_days(3) - RANGE_TRIM_MS),
        DateRangeExpression::new("from-3-to-4-days", millis_plus_days(3), millis_plus_days(5) - RANGE_TRIM_MS),
        DateRangeExpression::new("from-5-to-6-days", millis_plus_days(5), millis_plus_days(7) - RANGE_TRIM_MS),
    ]
}

fn millis_plus_days(days: i64) -> i64 {
    date_plus_days(days).timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_expire_on_consecutive_days() {
        let products = products();

        assert_eq!(products.len(), 6);
        for (position, (id, product)) in products.iter().enumerate() {
            let days = position as i64 + 1;
            assert_eq!(*id, (days).to_string());
            assert_eq!(product.exp_date, date_plus_days(days));
        }
    }

    #[test]
    fn ranges_are_contiguous_and_second_trimmed() {
        let ranges = expiry_ranges();

        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].key, "from-1-to-2-days");
        assert_eq!(ranges[1].key, "from-3-to-4-days");
        assert_eq!(ranges[2].key, "from-5-to-6-days");

        for window in ranges.windows(2) {
            assert_eq!(window[0].to + RANGE_TRIM_MS, window[1].from);
        }
        for range in &ranges {
            assert_eq!((range.to + RANGE_TRIM_MS - range.from) / 86_400_000, 2);
        }
    }

    #[test]
    fn base_date_is_fixed_epoch() {
        assert_eq!(base_date().timestamp_millis(), 1_676_851_200_000);
        assert_eq!(date_plus_days(1).timestamp_millis(), 1_676_937_600_000);
    }
}
