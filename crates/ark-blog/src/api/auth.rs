//! Account routes and the login/logout workflow

use ark_http_client::HttpClient;
use tracing::instrument;

use super::{route, ACCOUNT_CONTROLLER};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo};

/// Result of a successful sign in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Logged in user, when the backend sent it
    pub user: Option<UserInfo>,
    /// Token expiration as sent by the backend, not checked
    pub expiration: Option<String>,
}

/// Client for the `api/AppUser` controller, owner of the session slots
#[derive(Debug, Clone)]
pub struct AuthService {
    client: HttpClient,
    session: Session,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(client: HttpClient, session: Session) -> Self {
        Self { client, session }
    }

    /// Session this service writes to
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `LogIn` round trip, the session is left untouched
    #[instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let params = route(ACCOUNT_CONTROLLER, Some("LogIn"));
        Ok(self.client.post(&params, request).await?)
    }

    /// `Register` round trip
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        let params = route(ACCOUNT_CONTROLLER, Some("Register"));
        Ok(self.client.post(&params, request).await?)
    }

    /// Validate, log in and store the token and user id
    ///
    /// A response without `succeeded` or without an access token is a
    /// [`Error::Rejected`].
    #[instrument(skip_all)]
    pub async fn sign_in(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        request.validate()?;

        let response = self.login(request).await?;
        let token = match response.token {
            Some(token) if response.succeeded && !token.access_token.is_empty() => token,
            _ => {
                return Err(Error::Rejected(
                    "Login failed. Please check your credentials.".to_string(),
                ))
            }
        };

        self.session.set_token(&token.access_token)?;
        match response.user.as_ref().and_then(|u| u.id.as_deref()) {
            Some(user_id) if !user_id.is_empty() => self.session.set_user_id(user_id)?,
            _ => tracing::debug!("Login response carries no user id"),
        }

        tracing::info!("Logged in");

        Ok(LoginOutcome {
            user: response.user,
            expiration: token.expiration,
        })
    }

    /// Validate and register, `succeeded: false` becomes [`Error::Rejected`]
    #[instrument(skip_all)]
    pub async fn sign_up(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        request.validate()?;

        let response = self.register(request).await?;
        if !response.succeeded {
            return Err(Error::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            ));
        }

        Ok(response)
    }

    /// Clear token and user id
    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }

    /// True when a token is stored
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
