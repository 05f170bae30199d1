//! Defines the core data models for transactions.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    auth::UserID, category::CategoryId, ownership::OwnedResource,
    transaction_type::TransactionType,
};

time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub transaction_date: Date,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<CategoryId>,
    /// When the transaction was recorded, used to order transactions on the
    /// same date.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The name of the category, read from the category at query time.
    ///
    /// `None` means the transaction is uncategorized.
    pub category_name: Option<String>,
}

impl OwnedResource for Transaction {
    const TABLE: &'static str = "transactions";
}

/// The validated fields of a transaction to insert or update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub category_id: Option<CategoryId>,
}

#[cfg(test)]
mod transaction_serialization_tests {
    use serde_json::json;
    use time::macros::{date, datetime};

    use crate::{auth::UserID, transaction_type::TransactionType};

    use super::Transaction;

    #[test]
    fn serializes_with_plain_date_and_rfc3339_timestamp() {
        let transaction = Transaction {
            id: 3,
            user_id: UserID::new(1),
            amount: 1000.0,
            transaction_type: TransactionType::Income,
            description: Some("January pay".to_owned()),
            transaction_date: date!(2024 - 01 - 15),
            category_id: Some(2),
            created_at: datetime!(2024-01-15 09:30:00 UTC),
            category_name: Some("Salary".to_owned()),
        };

        let got = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            got,
            json!({
                "id": 3,
                "user_id": 1,
                "amount": 1000.0,
                "type": "income",
                "description": "January pay",
                "transaction_date": "2024-01-15",
                "category_id": 2,
                "created_at": "2024-01-15T09:30:00Z",
                "category_name": "Salary",
            })
        );
    }
}
