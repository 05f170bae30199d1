//! Income and expense categories for grouping a user's transactions.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{CreateCategoryResponse, create_category_endpoint};
pub use db::{
    create_category, create_category_table, get_categories, get_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryForm, CategoryId, CategoryName};
pub use edit::update_category_endpoint;
pub use list::list_categories_endpoint;
