//! HTTP page-state loader.
//!
//! # Responsibilities
//! - Map a route descriptor to its backend endpoint
//! - Issue `GET` with `Accept: application/json` and a request ID
//! - Classify the response (see `classify.rs`)
//! - Preload the destination page module without delaying the commit
//!   longer than the fetch itself
//!
//! # Design Decisions
//! - One client per loader, transport timeout from config
//! - Redirects are followed by the client and detected by URL change
//! - Request ID (UUID v4) sent as `x-request-id` for backend correlation

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::config::{EndpointConfig, NavigatorConfig};
use crate::loader::classify::{classify, FetchedResponse};
use crate::loader::preload::{preload_bounded, ModulePreloader, PreloadTask};
use crate::loader::types::{LoadError, LoadResult, PageModule, PAGE_FIELD};
use crate::loader::PageLoader;
use crate::routing::{RouteDescriptor, RouteKey, ID_PARAM};

/// Loads page state from the plant tracker backend.
pub struct HttpLoader {
    client: reqwest::Client,
    base_url: Url,
    endpoints: EndpointConfig,
    preloader: Arc<dyn ModulePreloader>,
}

impl HttpLoader {
    /// Create a loader from a validated configuration.
    pub fn new(
        config: &NavigatorConfig,
        preloader: Arc<dyn ModulePreloader>,
    ) -> Result<Self, LoadError> {
        let base_url = Url::parse(&config.backend.base_url)?;
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.backend.timeout_secs));
        if !config.backend.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url,
            endpoints: config.endpoints.clone(),
            preloader,
        })
    }

    /// Backend URL serving the state for `route`.
    pub fn endpoint_url(&self, route: &RouteDescriptor) -> Result<Url, LoadError> {
        let key = route.key.ok_or(LoadError::Unroutable)?;
        let path = match key {
            RouteKey::Overview => self.endpoints.overview.clone(),
            RouteKey::Archive => self.endpoints.archived_overview.clone(),
            RouteKey::Profile => self.endpoints.user_details.clone(),
            RouteKey::Manage => {
                let id = route.param(ID_PARAM).ok_or(LoadError::MissingParam {
                    route: key,
                    param: ID_PARAM,
                })?;
                self.endpoints.resolve_manage.replace("{id}", id)
            }
        };
        let mut url = self.base_url.join(&path)?;
        if let Some(query) = &route.query {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<FetchedResponse, LoadError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(request_id = %request_id, url = %url, "Fetching page state");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header("x-request-id", request_id.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        tracing::debug!(
            request_id = %request_id,
            status,
            redirected = final_url != url,
            "Page state received"
        );

        Ok(FetchedResponse {
            status,
            content_type,
            redirected: final_url != url,
            url: final_url.to_string(),
            body,
        })
    }

    async fn load_fixed(&self, url: Url, module: PageModule) -> Result<LoadResult, LoadError> {
        let preload = PreloadTask::start(&self.preloader, module);
        let started = Instant::now();
        let fetched = self.fetch(url).await?;
        preload.wait(started.elapsed()).await;
        Ok(classify(&fetched))
    }

    async fn load_resolved(&self, url: Url) -> Result<LoadResult, LoadError> {
        let started = Instant::now();
        let fetched = self.fetch(url).await?;
        let result = classify(&fetched);

        let LoadResult::Success { data, status } = &result else {
            return Ok(result);
        };

        let page = data.get(PAGE_FIELD).and_then(Value::as_str);
        match page.and_then(PageModule::from_discriminator) {
            Some(module) => {
                preload_bounded(&self.preloader, module, started.elapsed()).await;
                Ok(result)
            }
            None => {
                tracing::warn!(page = ?page, "Resolve payload has no recognised page type");
                Ok(LoadResult::Failed {
                    message: format!("Unrecognized page type: {}", page.unwrap_or("<missing>")),
                    status: Some(*status),
                })
            }
        }
    }
}

impl PageLoader for HttpLoader {
    fn load<'a>(
        &'a self,
        route: &'a RouteDescriptor,
    ) -> BoxFuture<'a, Result<LoadResult, LoadError>> {
        Box::pin(async move {
            let key = route.key.ok_or(LoadError::Unroutable)?;
            let url = self.endpoint_url(route)?;
            match PageModule::for_route(key) {
                Some(module) => self.load_fixed(url, module).await,
                None => self.load_resolved(url).await,
            }
        })
    }
}
