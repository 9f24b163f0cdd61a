//! Backend selection by service URL scheme.

use std::sync::Arc;

use async_trait::async_trait;

use recipebook_core::error::InvalidInputError;
use recipebook_core::{
    Credentials, RecordGateway, Registration, Result, ServiceUrl, SessionContext, SessionGateway,
    SessionTokens, UserInfo,
};
use recipebook_file::{FileRecordGateway, FileSessionGateway};
use recipebook_http::{HttpRecordGateway, HttpSessionGateway};

/// Session gateway for whichever backend the service URL names.
#[derive(Debug)]
pub enum SessionBackend {
    File(FileSessionGateway),
    Http(HttpSessionGateway),
}

impl SessionBackend {
    pub fn for_service(service: &ServiceUrl) -> Result<Self> {
        if service.is_local() {
            Ok(SessionBackend::File(FileSessionGateway::new(local_root(
                service,
            )?)))
        } else {
            Ok(SessionBackend::Http(HttpSessionGateway::new(
                service.clone(),
            )?))
        }
    }
}

#[async_trait]
impl SessionGateway for SessionBackend {
    async fn login(&self, credentials: &Credentials) -> Result<SessionTokens> {
        match self {
            SessionBackend::File(gateway) => gateway.login(credentials).await,
            SessionBackend::Http(gateway) => gateway.login(credentials).await,
        }
    }

    async fn register(&self, registration: &Registration) -> Result<UserInfo> {
        match self {
            SessionBackend::File(gateway) => gateway.register(registration).await,
            SessionBackend::Http(gateway) => gateway.register(registration).await,
        }
    }

    async fn refresh(&self, current: &SessionTokens) -> Result<SessionTokens> {
        match self {
            SessionBackend::File(gateway) => gateway.refresh(current).await,
            SessionBackend::Http(gateway) => gateway.refresh(current).await,
        }
    }
}

/// Record gateway for the service, reading tokens from `session`.
pub fn record_gateway(
    service: &ServiceUrl,
    session: SessionContext,
) -> Result<Arc<dyn RecordGateway>> {
    if service.is_local() {
        Ok(Arc::new(FileRecordGateway::new(
            local_root(service)?,
            session,
        )))
    } else {
        Ok(Arc::new(HttpRecordGateway::new(service.clone(), session)?))
    }
}

fn local_root(service: &ServiceUrl) -> Result<std::path::PathBuf> {
    service.to_file_path().ok_or_else(|| {
        InvalidInputError::ServiceUrl {
            value: service.to_string(),
            reason: "not a local path".to_string(),
        }
        .into()
    })
}
