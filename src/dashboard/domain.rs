//! The reports shown on the dashboard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Total income, total expenses and their difference over all of a user's
/// transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
}

/// The total amount for one type of transaction in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// The month in the format "YYYY-MM".
    pub month: String,
    pub total_amount: f64,
}

/// Monthly totals for income and for expenses, each ordered by month.
///
/// A month only appears in a series if the user has a transaction of that
/// type in that month.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrends {
    pub income_trends: Vec<MonthlyTotal>,
    pub expense_trends: Vec<MonthlyTotal>,
}

/// Income and expenses side by side for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    /// The month in the format "YYYY-MM".
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTrends {
    /// Merge the two series into one entry per month in ascending order.
    ///
    /// Months that only have income get an expense of zero, and vice versa.
    pub fn merged(&self) -> Vec<MonthlyComparison> {
        let mut months: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

        for total in &self.income_trends {
            months.entry(&total.month).or_default().0 += total.total_amount;
        }

        for total in &self.expense_trends {
            months.entry(&total.month).or_default().1 += total.total_amount;
        }

        months
            .into_iter()
            .map(|(month, (income, expense))| MonthlyComparison {
                month: month.to_owned(),
                income,
                expense,
            })
            .collect()
    }
}

/// The total spent in one expense category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category_name: String,
    pub total_spent: f64,
}

#[cfg(test)]
mod monthly_trends_tests {
    use super::{MonthlyComparison, MonthlyTotal, MonthlyTrends};

    fn total(month: &str, total_amount: f64) -> MonthlyTotal {
        MonthlyTotal {
            month: month.to_owned(),
            total_amount,
        }
    }

    #[test]
    fn merged_zero_fills_missing_months() {
        let trends = MonthlyTrends {
            income_trends: vec![total("2024-01", 1000.0), total("2024-03", 1200.0)],
            expense_trends: vec![total("2024-02", 50.0), total("2024-03", 300.0)],
        };

        let got = trends.merged();

        assert_eq!(
            got,
            vec![
                MonthlyComparison {
                    month: "2024-01".to_owned(),
                    income: 1000.0,
                    expense: 0.0,
                },
                MonthlyComparison {
                    month: "2024-02".to_owned(),
                    income: 0.0,
                    expense: 50.0,
                },
                MonthlyComparison {
                    month: "2024-03".to_owned(),
                    income: 1200.0,
                    expense: 300.0,
                },
            ]
        );
    }

    #[test]
    fn merged_orders_months_across_years() {
        let trends = MonthlyTrends {
            income_trends: vec![total("2024-01", 1.0)],
            expense_trends: vec![total("2023-12", 2.0)],
        };

        let months: Vec<_> = trends.merged().into_iter().map(|m| m.month).collect();

        assert_eq!(months, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn merged_is_empty_without_transactions() {
        assert!(MonthlyTrends::default().merged().is_empty());
    }

    #[test]
    fn serializes_with_camel_case_series_names() {
        let json = serde_json::to_value(MonthlyTrends {
            income_trends: vec![total("2024-01", 1.0)],
            expense_trends: vec![],
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "incomeTrends": [{ "month": "2024-01", "total_amount": 1.0 }],
                "expenseTrends": [],
            })
        );
    }
}
