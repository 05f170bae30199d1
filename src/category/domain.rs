//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID, ownership::OwnedResource, transaction_type::TransactionType};

const MISSING_FIELDS_MESSAGE: &str = "Category name and type are required.";

/// A validated, non-empty category name with surrounding whitespace removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::Validation] if `name` is empty or
    /// only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::Validation(MISSING_FIELDS_MESSAGE.to_owned()))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A user's label for grouping income or expenses (e.g., 'Salary', 'Groceries').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserID,
    pub name: CategoryName,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

impl OwnedResource for Category {
    const TABLE: &'static str = "categories";
}

/// Form data for category creation and editing.
///
/// Fields are kept raw so that missing and invalid values are reported with
/// the right message by [CategoryForm::validate].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

impl CategoryForm {
    /// Check the form has a non-empty name and a valid type.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if the name or type is missing, or the
    /// type is neither "income" nor "expense".
    pub fn validate(&self) -> Result<(CategoryName, TransactionType), Error> {
        let raw_type = self
            .category_type
            .as_deref()
            .map(str::trim)
            .filter(|raw_type| !raw_type.is_empty())
            .ok_or_else(|| Error::Validation(MISSING_FIELDS_MESSAGE.to_owned()))?;
        let name = CategoryName::new(self.name.as_deref().unwrap_or_default())?;

        let category_type = raw_type.parse().map_err(|_| {
            Error::Validation("Category type must be \"income\" or \"expense\".".to_owned())
        })?;

        Ok((name, category_type))
    }
}
