//! Dashboard reports: the summary, monthly trends and spending per category.

mod db;
mod domain;
mod handlers;

pub use db::{get_category_spending, get_monthly_trends, get_summary};
pub use domain::{CategorySpending, MonthlyComparison, MonthlyTotal, MonthlyTrends, Summary};
pub use handlers::{
    get_category_spending_endpoint, get_monthly_trends_endpoint, get_summary_endpoint,
};
