//! A client for the REST API that keeps track of the logged in session.
//!
//! Protected calls need a [Session], created by [ApiClient::log_in]. A session
//! is dropped as soon as it is known to be invalid: when its expiry time has
//! passed, or when the server rejects its token.

mod error;
mod session;

pub use error::ClientError;
pub use session::Session;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

use crate::{
    Category, CategoryForm, CategoryId, CategorySpending, CreateCategoryResponse,
    CreateTransactionResponse, LogInForm, LogInResponse, MessageResponse, MonthlyTrends,
    RegisterForm, RegisterResponse, Summary, Transaction, TransactionForm, TransactionId,
    endpoints::{self, format_endpoint},
};

/// Calls the API at a base URL, e.g. `http://localhost:5000`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    /// Create a client that is not logged in.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            session: None,
        }
    }

    /// The current session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Check that the server can reach its database.
    pub async fn test_db(&self) -> Result<MessageResponse, ClientError> {
        let response = self.http.get(self.url(endpoints::TEST_DB)).send().await?;

        parse_response(response).await
    }

    /// Register a new user. This does not log the user in.
    pub async fn register(&self, form: &RegisterForm) -> Result<RegisterResponse, ClientError> {
        let response = self
            .http
            .post(self.url(endpoints::REGISTER))
            .json(form)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Log in and keep the session for later calls.
    ///
    /// A failed log in leaves the previous session, if any, untouched.
    pub async fn log_in(&mut self, form: &LogInForm) -> Result<&Session, ClientError> {
        let response = self
            .http
            .post(self.url(endpoints::LOG_IN))
            .json(form)
            .send()
            .await?;
        let response: LogInResponse = parse_response(response).await?;

        tracing::debug!("logged in as {}", response.user.email);

        Ok(self.session.insert(response.into()))
    }

    /// Forget the session.
    pub fn log_out(&mut self) {
        self.session = None;
    }

    /// The logged in user's categories.
    pub async fn list_categories(&mut self) -> Result<Vec<Category>, ClientError> {
        let request = self.http.get(self.url(endpoints::CATEGORIES));

        self.send_protected(request).await
    }

    /// Create a category for the logged in user.
    pub async fn create_category(
        &mut self,
        form: &CategoryForm,
    ) -> Result<CreateCategoryResponse, ClientError> {
        let request = self.http.post(self.url(endpoints::CATEGORIES)).json(form);

        self.send_protected(request).await
    }

    /// Rename or retype one of the logged in user's categories.
    pub async fn update_category(
        &mut self,
        category_id: CategoryId,
        form: &CategoryForm,
    ) -> Result<MessageResponse, ClientError> {
        let path = format_endpoint(endpoints::CATEGORY, category_id);
        let request = self.http.put(self.url(&path)).json(form);

        self.send_protected(request).await
    }

    /// Delete one of the logged in user's categories.
    ///
    /// Transactions in the category become uncategorized.
    pub async fn delete_category(
        &mut self,
        category_id: CategoryId,
    ) -> Result<MessageResponse, ClientError> {
        let path = format_endpoint(endpoints::CATEGORY, category_id);
        let request = self.http.delete(self.url(&path));

        self.send_protected(request).await
    }

    /// The logged in user's transactions, newest first.
    pub async fn list_transactions(&mut self) -> Result<Vec<Transaction>, ClientError> {
        let request = self.http.get(self.url(endpoints::TRANSACTIONS));

        self.send_protected(request).await
    }

    /// Record a transaction for the logged in user.
    pub async fn create_transaction(
        &mut self,
        form: &TransactionForm,
    ) -> Result<CreateTransactionResponse, ClientError> {
        let request = self.http.post(self.url(endpoints::TRANSACTIONS)).json(form);

        self.send_protected(request).await
    }

    /// Replace one of the logged in user's transactions.
    pub async fn update_transaction(
        &mut self,
        transaction_id: TransactionId,
        form: &TransactionForm,
    ) -> Result<MessageResponse, ClientError> {
        let path = format_endpoint(endpoints::TRANSACTION, transaction_id);
        let request = self.http.put(self.url(&path)).json(form);

        self.send_protected(request).await
    }

    /// Delete one of the logged in user's transactions.
    pub async fn delete_transaction(
        &mut self,
        transaction_id: TransactionId,
    ) -> Result<MessageResponse, ClientError> {
        let path = format_endpoint(endpoints::TRANSACTION, transaction_id);
        let request = self.http.delete(self.url(&path));

        self.send_protected(request).await
    }

    /// Total income, total expenses and net balance.
    pub async fn summary(&mut self) -> Result<Summary, ClientError> {
        let request = self.http.get(self.url(endpoints::DASHBOARD_SUMMARY));

        self.send_protected(request).await
    }

    /// Income and expense totals per month.
    ///
    /// Use [MonthlyTrends::merged] to line the two series up by month.
    pub async fn monthly_trends(&mut self) -> Result<MonthlyTrends, ClientError> {
        let request = self.http.get(self.url(endpoints::DASHBOARD_MONTHLY_TRENDS));

        self.send_protected(request).await
    }

    /// Expense totals per category, largest first.
    pub async fn category_spending(&mut self) -> Result<Vec<CategorySpending>, ClientError> {
        let request = self
            .http
            .get(self.url(endpoints::DASHBOARD_CATEGORY_SPENDING));

        self.send_protected(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The token of a session that has not expired at `now`.
    ///
    /// An expired session is cleared.
    fn current_token(&mut self, now: OffsetDateTime) -> Result<String, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotLoggedIn)?;

        if session.is_expired(now) {
            tracing::debug!("session for {} expired", session.user.email);
            self.session = None;
            return Err(ClientError::SessionExpired);
        }

        Ok(session.token.clone())
    }

    async fn send_protected<T: DeserializeOwned>(
        &mut self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let token = self.current_token(OffsetDateTime::now_utc())?;
        let response = request.bearer_auth(token).send().await?;

        if response.status() == StatusCode::FORBIDDEN {
            tracing::debug!("server rejected the session token");
            self.session = None;
            return Err(ClientError::SessionExpired);
        }

        parse_response(response).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
    };

    Err(ClientError::Api { status, message })
}
