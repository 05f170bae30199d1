//! The transaction form sent by clients and its validation.
//!
//! Browser clients often send numbers as strings (e.g. `"12.50"`) and an
//! empty string for an unselected category, so the form accepts both.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::CategoryId,
    transaction::NewTransaction,
    transaction_type::TransactionType,
};

const MISSING_FIELDS_MESSAGE: &str = "Amount, type, and date are required.";

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A JSON value that may be a number or a string holding a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

impl From<f64> for NumberOrString {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => NumberOrString::Number(number),
            None => NumberOrString::String(value.to_string()),
        }
    }
}

impl From<i64> for NumberOrString {
    fn from(value: i64) -> Self {
        NumberOrString::Number(value.into())
    }
}

/// Form data for transaction creation and editing.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    pub amount: Option<NumberOrString>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub description: Option<String>,
    /// A date in the format `YYYY-MM-DD`. A time after a `T` is ignored.
    pub transaction_date: Option<String>,
    /// `null` and `""` both mean uncategorized.
    pub category_id: Option<NumberOrString>,
}

impl TransactionForm {
    /// Check the form and convert it into a [NewTransaction].
    ///
    /// This does not check that the category belongs to the user, that needs
    /// the database.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if the amount, type or date is missing
    /// or invalid, and [Error::InvalidCategory] if the category ID is not an
    /// integer.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        let raw_type = non_empty_str(self.transaction_type.as_deref());
        let raw_date = non_empty_str(self.transaction_date.as_deref());

        let (Some(raw_amount), Some(raw_type), Some(raw_date)) =
            (self.amount.as_ref(), raw_type, raw_date)
        else {
            return Err(Error::Validation(MISSING_FIELDS_MESSAGE.to_owned()));
        };

        let amount = parse_amount(raw_amount)?;

        let transaction_type = raw_type.parse::<TransactionType>().map_err(|_| {
            Error::Validation("Transaction type must be \"income\" or \"expense\".".to_owned())
        })?;

        let transaction_date = parse_date(raw_date)?;

        let description = non_empty_str(self.description.as_deref()).map(str::to_owned);

        let category_id = parse_category_id(self.category_id.as_ref())?;

        Ok(NewTransaction {
            amount,
            transaction_type,
            description,
            transaction_date,
            category_id,
        })
    }
}

fn non_empty_str(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_amount(raw_amount: &NumberOrString) -> Result<f64, Error> {
    let amount = match raw_amount {
        NumberOrString::Number(number) => number.as_f64(),
        NumberOrString::String(text) => {
            let text = text.trim();

            if text.is_empty() {
                return Err(Error::Validation(MISSING_FIELDS_MESSAGE.to_owned()));
            }

            text.parse::<f64>().ok()
        }
    };

    match amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::Validation(
            "Amount must be a positive number.".to_owned(),
        )),
    }
}

fn parse_date(raw_date: &str) -> Result<Date, Error> {
    let date_part = raw_date.split('T').next().unwrap_or(raw_date);

    Date::parse(date_part, DATE_FORMAT).map_err(|_| {
        Error::Validation("Transaction date must be a valid date (YYYY-MM-DD).".to_owned())
    })
}

fn parse_category_id(raw_id: Option<&NumberOrString>) -> Result<Option<CategoryId>, Error> {
    match raw_id {
        None => Ok(None),
        Some(NumberOrString::Number(number)) => {
            number.as_i64().map(Some).ok_or(Error::InvalidCategory)
        }
        Some(NumberOrString::String(text)) => {
            let text = text.trim();

            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(|_| Error::InvalidCategory)
            }
        }
    }
}
