//! The components one command invocation works with.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, warn};

use recipebook_client::SessionManager;
use recipebook_core::{Error, RecordGateway, ServiceUrl};

use crate::session::{self, FileTokenStore, SessionBackend};

/// Service used when neither the flag, the environment nor a stored session
/// names one.
pub const DEFAULT_SERVICE: &str = "http://localhost:8080";

pub struct App {
    service: ServiceUrl,
    session: SessionManager<SessionBackend, FileTokenStore>,
}

impl App {
    /// Resolve the service and restore the stored session for it.
    pub fn open(service: Option<&str>) -> Result<Self> {
        let service = match service {
            Some(url) => ServiceUrl::new(url).context("Invalid service URL")?,
            None => match session::stored_service()? {
                Some(stored) => stored,
                None => ServiceUrl::new(DEFAULT_SERVICE).context("Invalid service URL")?,
            },
        };
        debug!(service = %service, "Using service");

        let backend =
            SessionBackend::for_service(&service).context("Failed to set up the service client")?;
        let store = FileTokenStore::new(service.clone())?;
        let session = SessionManager::new(backend, store).context("Failed to load session")?;

        Ok(Self { service, session })
    }

    pub fn service(&self) -> &ServiceUrl {
        &self.service
    }

    pub fn session(&self) -> &SessionManager<SessionBackend, FileTokenStore> {
        &self.session
    }

    /// A record gateway bound to the current session.
    pub fn records(&self) -> Result<Arc<dyn RecordGateway>> {
        if !self.session.is_authenticated() {
            bail!("No active session. Run 'recipebook login' first.");
        }
        session::record_gateway(&self.service, self.session.context())
            .context("Failed to set up the service client")
    }

    /// Turn a failure into the message for the user, ending the session
    /// first if the failure means it is gone.
    pub fn failure(&self, err: Error) -> anyhow::Error {
        match self.session.handle_failure(&err) {
            Ok(true) => anyhow!(
                "{}. Run 'recipebook login' to sign in again.",
                err.user_message()
            ),
            Ok(false) => anyhow!("{}", err.user_message()),
            Err(clear_err) => {
                warn!(error = %clear_err, "Failed to forget the stored session");
                anyhow!("{}", err.user_message())
            }
        }
    }
}
