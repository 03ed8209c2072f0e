use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::model::payroll::{DailyRevenue, PayPeriod};
use crate::model::sale::{ItemCategory, SalesTransaction};

/// Daily revenue for a period plus full-precision period totals.
/// Days without sales carry no entry.
#[derive(Debug, Clone, Default)]
pub struct RevenueBook {
    pub days: BTreeMap<NaiveDate, DailyRevenue>,
    pub service_total: f64,
    pub retail_total: f64,
}

impl RevenueBook {
    pub fn day(&self, date: NaiveDate) -> DailyRevenue {
        self.days.get(&date).copied().unwrap_or_default()
    }

    pub fn grand_total(&self) -> f64 {
        self.service_total + self.retail_total
    }
}

/// Collapse raw transactions onto business-local calendar days.
///
/// Transactions arrive over-fetched (the load window is padded, since POS
/// timestamps are UTC while the business day follows `tz`); everything
/// whose local day falls outside the period is discarded here. Amounts
/// accumulate at full precision; rounding happens at the presentation
/// boundary only.
pub fn aggregate(transactions: &[SalesTransaction], period: &PayPeriod, tz: Tz) -> RevenueBook {
    let mut book = RevenueBook::default();

    for tx in transactions {
        let local_day = tx.sold_at.with_timezone(&tz).date_naive();
        if !period.contains(local_day) {
            continue;
        }

        let (service, retail) = split_amounts(tx);
        let entry = book.days.entry(local_day).or_default();
        entry.service_revenue += service;
        entry.retail_revenue += retail;
        book.service_total += service;
        book.retail_total += retail;
    }

    book
}

/// Service/retail split for one ticket. Line items are classified
/// individually, falling back to the ticket-level flag when an item has
/// no category; tickets without line items are classified wholesale.
fn split_amounts(tx: &SalesTransaction) -> (f64, f64) {
    if tx.items.is_empty() {
        return if tx.is_service {
            (tx.total_amount, 0.0)
        } else {
            (0.0, tx.total_amount)
        };
    }

    let mut service = 0.0;
    let mut retail = 0.0;
    for item in &tx.items {
        let is_service = match item.category {
            Some(ItemCategory::Service) => true,
            Some(ItemCategory::Retail) => false,
            None => tx.is_service,
        };
        if is_service {
            service += item.amount();
        } else {
            retail += item.amount();
        }
    }
    (service, retail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    use crate::model::sale::SaleItem;

    const TZ: Tz = chrono_tz::America::Santiago;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(id: u64, utc: (i32, u32, u32, u32, u32), amount: f64, is_service: bool) -> SalesTransaction {
        let (y, m, d, h, min) = utc;
        SalesTransaction {
            id,
            sold_at: Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap(),
            total_amount: amount,
            is_service,
            items: vec![],
        }
    }

    #[test]
    fn utc_timestamp_lands_on_local_day() {
        // 2026-01-06 01:30 UTC is still the evening of Jan 5 in Santiago
        // (UTC-3 in January).
        let period = PayPeriod::new(date(2026, 1, 5), date(2026, 1, 11));
        let book = aggregate(&[tx(1, (2026, 1, 6, 1, 30), 100.0, true)], &period, TZ);
        assert_eq!(book.day(date(2026, 1, 5)).service_revenue, 100.0);
        assert!(book.days.get(&date(2026, 1, 6)).is_none());
    }

    #[test]
    fn out_of_period_days_are_discarded() {
        let period = PayPeriod::new(date(2026, 1, 5), date(2026, 1, 11));
        let book = aggregate(
            &[
                tx(1, (2026, 1, 4, 15, 0), 50.0, true),
                tx(2, (2026, 1, 12, 15, 0), 60.0, true),
            ],
            &period,
            TZ,
        );
        assert!(book.days.is_empty());
        assert_eq!(book.service_total, 0.0);
    }

    #[test]
    fn items_classified_individually_with_flag_fallback() {
        let period = PayPeriod::new(date(2026, 1, 5), date(2026, 1, 11));
        let mut t = tx(1, (2026, 1, 5, 18, 0), 95.0, true);
        t.items = vec![
            SaleItem {
                name: "Full groom".into(),
                quantity: 1.0,
                unit_price: 60.0,
                category: Some(ItemCategory::Service),
            },
            SaleItem {
                name: "Shampoo bottle".into(),
                quantity: 2.0,
                unit_price: 10.0,
                category: Some(ItemCategory::Retail),
            },
            // no category: ticket-level flag says service
            SaleItem {
                name: "Nail trim".into(),
                quantity: 1.0,
                unit_price: 15.0,
                category: None,
            },
        ];
        let book = aggregate(&[t], &period, TZ);
        let day = book.day(date(2026, 1, 5));
        assert_eq!(day.service_revenue, 75.0);
        assert_eq!(day.retail_revenue, 20.0);
    }

    #[test]
    fn ticket_without_items_uses_flag_only() {
        let period = PayPeriod::new(date(2026, 1, 5), date(2026, 1, 11));
        let book = aggregate(
            &[
                tx(1, (2026, 1, 5, 18, 0), 120.0, true),
                tx(2, (2026, 1, 5, 19, 0), 30.0, false),
            ],
            &period,
            TZ,
        );
        let day = book.day(date(2026, 1, 5));
        assert_eq!(day.service_revenue, 120.0);
        assert_eq!(day.retail_revenue, 30.0);
        assert_eq!(book.grand_total(), 150.0);
    }

    #[test]
    fn multiple_transactions_accumulate_per_day() {
        let period = PayPeriod::new(date(2026, 1, 5), date(2026, 1, 11));
        let book = aggregate(
            &[
                tx(1, (2026, 1, 5, 14, 0), 40.0, true),
                tx(2, (2026, 1, 5, 16, 0), 25.5, true),
                tx(3, (2026, 1, 7, 16, 0), 10.0, false),
            ],
            &period,
            TZ,
        );
        assert_eq!(book.day(date(2026, 1, 5)).service_revenue, 65.5);
        assert_eq!(book.day(date(2026, 1, 7)).retail_revenue, 10.0);
        assert_eq!(book.days.len(), 2);
    }
}
