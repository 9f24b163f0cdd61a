//! HTTP-backed record gateway.

use async_trait::async_trait;
use tracing::{debug, instrument};

use recipebook_core::error::{AuthError, Error};
use recipebook_core::traits::RecordGateway;
use recipebook_core::{PageResult, Recipe, RecordId, Result, ServiceUrl, SessionContext};

use crate::client::ApiClient;
use crate::endpoints::{recipe_path, ListRecipesQuery, RECIPES};

/// Recipe CRUD against the REST service.
///
/// The bearer token is read from the session context at call time. A
/// response that arrives after the session was cleared or replaced is
/// reported as [`AuthError::SessionCleared`].
#[derive(Debug, Clone)]
pub struct HttpRecordGateway {
    client: ApiClient,
    session: SessionContext,
}

impl HttpRecordGateway {
    /// Create a gateway for `service` that authenticates through `session`.
    pub fn new(service: ServiceUrl, session: SessionContext) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(service)?,
            session,
        })
    }

    /// Returns the service URL this gateway talks to.
    pub fn service(&self) -> &ServiceUrl {
        self.client.service()
    }
}

/// Map a failed record call. `id` names the record for 404s.
fn map_record_error(err: Error, id: Option<&RecordId>) -> Error {
    match err {
        Error::Protocol(ref protocol) if protocol.is_auth_error() => AuthError::SessionExpired.into(),
        Error::Protocol(ref protocol) if protocol.status == 404 => match id {
            Some(id) => Error::not_found(id.as_str()),
            None => err,
        },
        other => other,
    }
}

#[async_trait]
impl RecordGateway for HttpRecordGateway {
    #[instrument(skip(self))]
    async fn list(&self, page_index: u32, page_size: u32) -> Result<PageResult<Recipe>> {
        let snapshot = self.session.authorize()?;
        debug!(page_index, page_size, "Listing recipes via HTTP");

        let query = ListRecipesQuery {
            page: page_index,
            size: page_size,
        };
        let result = self
            .client
            .get_authed::<_, PageResult<Recipe>>(RECIPES, Some(&query), snapshot.access_token())
            .await;

        self.session.ensure_current(&snapshot)?;
        result.map_err(|err| map_record_error(err, None))
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &RecordId) -> Result<Recipe> {
        let snapshot = self.session.authorize()?;
        debug!(id = %id, "Getting recipe via HTTP");

        let result = self
            .client
            .get_authed::<(), Recipe>(&recipe_path(id), None, snapshot.access_token())
            .await;

        self.session.ensure_current(&snapshot)?;
        result.map_err(|err| map_record_error(err, Some(id)))
    }

    #[instrument(skip(self, recipe), fields(name = %recipe.name))]
    async fn create(&self, recipe: &Recipe) -> Result<Recipe> {
        let snapshot = self.session.authorize()?;
        debug!("Creating recipe via HTTP");

        let result = self
            .client
            .post_authed::<_, Recipe>(RECIPES, recipe, snapshot.access_token())
            .await;

        self.session.ensure_current(&snapshot)?;
        result.map_err(|err| map_record_error(err, None))
    }

    #[instrument(skip(self, recipe))]
    async fn update(&self, id: &RecordId, recipe: &Recipe) -> Result<Recipe> {
        let snapshot = self.session.authorize()?;
        debug!(id = %id, "Updating recipe via HTTP");

        let result = self
            .client
            .put_authed::<_, Recipe>(&recipe_path(id), recipe, snapshot.access_token())
            .await;

        self.session.ensure_current(&snapshot)?;
        result.map_err(|err| map_record_error(err, Some(id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RecordId) -> Result<()> {
        let snapshot = self.session.authorize()?;
        debug!(id = %id, "Deleting recipe via HTTP");

        let result = self
            .client
            .delete_authed(&recipe_path(id), snapshot.access_token())
            .await;

        self.session.ensure_current(&snapshot)?;
        result.map_err(|err| map_record_error(err, Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebook_core::error::ProtocolError;

    #[test]
    fn unauthorized_maps_to_session_expired() {
        let err = map_record_error(ProtocolError::new(401, None).into(), None);
        assert!(matches!(err, Error::Auth(AuthError::SessionExpired)));
        assert!(err.requires_reauth());
    }

    #[test]
    fn missing_record_maps_to_not_found() {
        let id = RecordId::new("gone").unwrap();
        let err = map_record_error(ProtocolError::new(404, None).into(), Some(&id));
        assert!(matches!(err, Error::NotFound { ref id } if id == "gone"));
    }

    #[test]
    fn other_statuses_pass_through() {
        let err = map_record_error(
            ProtocolError::new(400, Some("Validation error".into())).into(),
            None,
        );
        assert_eq!(err.user_message(), "Validation error");
    }
}
