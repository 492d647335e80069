//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use thiserror::Error;

use crate::{
    carts::{CartApi, HttpCartApi},
    http::{HttpError, StorefrontHttpConfig},
    search::{HttpSearchApi, SearchApi},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build http client")]
    HttpClient(#[source] HttpError),
}

/// Remote collaborators for one storefront origin.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartApi>,
    pub search: Arc<dyn SearchApi>,
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the storefront clients, sharing one session cookie store.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn from_config(config: &StorefrontHttpConfig) -> Result<Self, AppInitError> {
        let http = config.build_client().map_err(AppInitError::HttpClient)?;

        Ok(Self {
            carts: Arc::new(HttpCartApi::new(config.clone(), http.clone())),
            search: Arc::new(HttpSearchApi::new(config.clone(), http)),
        })
    }
}
