use time::OffsetDateTime;

use crate::{LogInResponse, PublicUser};

/// A logged in user and the token that authenticates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The bearer token sent with protected requests.
    pub token: String,
    /// The logged in user.
    pub user: PublicUser,
    /// When the server stops accepting `token`.
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Whether the token has expired at `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

impl From<LogInResponse> for Session {
    fn from(response: LogInResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
            expires_at: response.expires_at,
        }
    }
}

#[cfg(test)]
mod session_tests {
    use time::{Duration, OffsetDateTime};

    use crate::{PublicUser, UserID};

    use super::Session;

    fn session_expiring_at(expires_at: OffsetDateTime) -> Session {
        Session {
            token: "token".to_owned(),
            user: PublicUser {
                id: UserID::new(1),
                username: "alice".to_owned(),
                email: "alice@x.com".to_owned(),
            },
            expires_at,
        }
    }

    #[test]
    fn session_is_valid_before_expiry() {
        let now = OffsetDateTime::now_utc();
        let session = session_expiring_at(now + Duration::minutes(5));

        assert!(!session.is_expired(now));
    }

    #[test]
    fn session_is_expired_at_and_after_expiry() {
        let now = OffsetDateTime::now_utc();
        let session = session_expiring_at(now);

        assert!(session.is_expired(now));
        assert!(session.is_expired(now + Duration::seconds(1)));
    }
}
