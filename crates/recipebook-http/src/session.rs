//! HTTP-backed session gateway.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use recipebook_core::error::{AuthError, Error};
use recipebook_core::traits::SessionGateway;
use recipebook_core::{
    AccessToken, Credentials, RefreshToken, Registration, Result, ServiceUrl, SessionTokens,
    UserInfo,
};

use crate::client::ApiClient;
use crate::endpoints::{
    RefreshRequest, RefreshResponse, SignInRequest, SignInResponse, SignUpRequest, REFRESH,
    SIGN_IN, SIGN_UP,
};

/// Sign-in, sign-up and token refresh against the REST service.
#[derive(Debug, Clone)]
pub struct HttpSessionGateway {
    client: ApiClient,
}

impl HttpSessionGateway {
    pub fn new(service: ServiceUrl) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(service)?,
        })
    }

    /// Returns the service URL this gateway talks to.
    pub fn service(&self) -> &ServiceUrl {
        self.client.service()
    }
}

#[async_trait]
impl SessionGateway for HttpSessionGateway {
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn login(&self, credentials: &Credentials) -> Result<SessionTokens> {
        let request = SignInRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let response: SignInResponse =
            self.client
                .post(SIGN_IN, &request)
                .await
                .map_err(|err| match err {
                    Error::Protocol(ref protocol) if matches!(protocol.status, 401 | 403 | 404) => {
                        AuthError::InvalidCredentials(
                            protocol
                                .message
                                .clone()
                                .unwrap_or_else(|| "invalid username or password".to_string()),
                        )
                        .into()
                    }
                    other => other,
                })?;

        info!(user = %response.user_info.id, "Signed in via HTTP");

        Ok(SessionTokens {
            access_token: AccessToken::new(response.access_token),
            refresh_token: RefreshToken::new(response.refresh_token),
            user_info: response.user_info,
        })
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<UserInfo> {
        let request = SignUpRequest {
            first_name: &registration.first_name,
            last_name: &registration.last_name,
            email: &registration.email,
            password: registration.password(),
        };

        let user: UserInfo = self.client.post(SIGN_UP, &request).await?;
        debug!(user = %user.id, "Registered account via HTTP");
        Ok(user)
    }

    #[instrument(skip(self, current))]
    async fn refresh(&self, current: &SessionTokens) -> Result<SessionTokens> {
        let request = RefreshRequest {
            refresh_token: current.refresh_token.as_str(),
        };

        let response: RefreshResponse =
            self.client
                .post(REFRESH, &request)
                .await
                .map_err(|err| match err {
                    Error::Protocol(ref protocol) if matches!(protocol.status, 400 | 401 | 403) => {
                        AuthError::RefreshTokenInvalid.into()
                    }
                    other => other,
                })?;

        debug!("Refreshed access token via HTTP");

        Ok(SessionTokens {
            access_token: AccessToken::new(response.access_token),
            refresh_token: response
                .refresh_token
                .map(RefreshToken::new)
                .unwrap_or_else(|| current.refresh_token.clone()),
            user_info: current.user_info.clone(),
        })
    }
}
