use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::customer::Customer;

pub const DEFAULT_REPORT_DAYS: u32 = 7;
pub const DEFAULT_TOP_CUSTOMERS: usize = 5;

/// Revenue booked on one calendar day (UTC).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerSpend {
    pub customer_id: String,
    pub name: String,
    pub total_spent_cents: i64,
    pub purchases: usize,
}

/// Sales figures derived from customer purchase histories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesReport {
    /// Oldest day first, one entry per day even when nothing sold.
    pub daily: Vec<DailySales>,
    pub top_customers: Vec<CustomerSpend>,
}

impl SalesReport {
    /// Build the report for the `days` days ending on `today`, inclusive.
    ///
    /// Purchases outside that window are left out of `daily` but still count
    /// toward each customer's lifetime spend.
    pub fn build(customers: &[Customer], today: NaiveDate, days: u32, top: usize) -> Self {
        Self {
            daily: daily_sales(customers, today, days),
            top_customers: top_customers(customers, top),
        }
    }
}

fn daily_sales(customers: &[Customer], today: NaiveDate, days: u32) -> Vec<DailySales> {
    let mut daily: Vec<DailySales> = (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .map(|date| DailySales {
            date,
            total_cents: 0,
        })
        .collect();

    let purchases = customers.iter().flat_map(|c| c.purchase_history.iter());
    for purchase in purchases {
        let date = purchase.timestamp.date_naive();
        if let Some(day) = daily.iter_mut().find(|d| d.date == date) {
            day.total_cents = day.total_cents.saturating_add(purchase.total_cents);
        }
    }
    daily
}

fn top_customers(customers: &[Customer], top: usize) -> Vec<CustomerSpend> {
    let mut spend: Vec<CustomerSpend> = customers
        .iter()
        .map(|c| CustomerSpend {
            customer_id: c.id.clone(),
            name: c.name.clone(),
            total_spent_cents: c.lifetime_spend_cents(),
            purchases: c.purchase_history.len(),
        })
        .collect();

    // stable: ties keep repository order
    spend.sort_by(|a, b| b.total_spent_cents.cmp(&a.total_spent_cents));
    spend.truncate(top);
    spend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::TransactionSummary;
    use chrono::{TimeZone, Utc};

    fn purchase(id: &str, day: u32, hour: u32, total_cents: i64) -> TransactionSummary {
        TransactionSummary {
            transaction_id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            total_cents,
        }
    }

    fn customer(id: &str, name: &str, history: Vec<TransactionSummary>) -> Customer {
        let mut customer = Customer::new(id, name, format!("{}@example.com", id.to_lowercase()));
        customer.purchase_history = history;
        customer
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_daily_sales_zero_filled() {
        let customers = vec![
            customer(
                "CUST-001-AB",
                "Alice Wonderland",
                vec![purchase("TXN-1", 10, 9, 3500), purchase("TXN-2", 8, 23, 1099)],
            ),
            customer("CUST-002-CD", "Bob The Builder", vec![purchase("TXN-3", 10, 17, 500)]),
        ];

        let report = SalesReport::build(&customers, today(), DEFAULT_REPORT_DAYS, DEFAULT_TOP_CUSTOMERS);

        assert_eq!(report.daily.len(), 7);
        assert_eq!(report.daily[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(report.daily[6].date, today());
        assert_eq!(report.daily[6].total_cents, 4000);
        assert_eq!(report.daily[4].total_cents, 1099);
        assert_eq!(report.daily[5].total_cents, 0);
        assert_eq!(report.daily.iter().map(|d| d.total_cents).sum::<i64>(), 5099);
    }

    #[test]
    fn test_purchases_outside_window_only_count_toward_spend() {
        let customers = vec![customer(
            "CUST-001-AB",
            "Alice Wonderland",
            vec![purchase("TXN-OLD", 1, 12, 2000), purchase("TXN-NEW", 9, 12, 100)],
        )];

        let report = SalesReport::build(&customers, today(), 7, 5);

        assert_eq!(report.daily.iter().map(|d| d.total_cents).sum::<i64>(), 100);
        assert_eq!(report.top_customers[0].total_spent_cents, 2100);
        assert_eq!(report.top_customers[0].purchases, 2);
    }

    #[test]
    fn test_top_customers_ranked_and_capped() {
        let customers: Vec<Customer> = (1..=7)
            .map(|n| {
                customer(
                    &format!("CUST-{}", n),
                    &format!("Customer {}", n),
                    vec![purchase(&format!("TXN-{}", n), 5, 10, i64::from(n) * 100)],
                )
            })
            .chain(std::iter::once(customer("CUST-NEW", "No Purchases", Vec::new())))
            .collect();

        let report = SalesReport::build(&customers, today(), 7, 5);

        let ids: Vec<&str> = report.top_customers.iter().map(|c| c.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["CUST-7", "CUST-6", "CUST-5", "CUST-4", "CUST-3"]);
    }

    #[test]
    fn test_empty_window() {
        let report = SalesReport::build(&[], today(), 0, 5);
        assert!(report.daily.is_empty());
        assert!(report.top_customers.is_empty());
    }
}
