//! Remote translation client with ordered endpoint fallback
//!
//! Endpoints are tried one after another, primary first. Each call is bounded
//! by the configured timeout. When every endpoint fails the built-in keyword
//! table is applied and anything it cannot handle passes through unchanged,
//! so [`RemoteTranslationClient::translate`] always answers one string per
//! input.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::endpoint::{HttpEndpoint, TranslateRequest, TranslationEndpoint};
use crate::parsers::html::is_blank;
use crate::translation::config::TranslationConfig;
use crate::translation::dictionary::EmbeddedFallback;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::LanguageCode;

/// Where a resolved string came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOrigin {
    Cache,
    Dictionary,
    Remote { endpoint: String },
    EmbeddedFallback,
    /// Nothing could translate the string
    Unchanged,
}

impl TextOrigin {
    pub fn is_translated(&self) -> bool {
        !matches!(self, TextOrigin::Unchanged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedText {
    pub text: String,
    pub origin: TextOrigin,
}

impl ResolvedText {
    pub fn new(text: impl Into<String>, origin: TextOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    pub fn unchanged(text: impl Into<String>) -> Self {
        Self::new(text, TextOrigin::Unchanged)
    }
}

/// Successful answer of one endpoint, aligned with the request
///
/// `None` marks a string the endpoint did not answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBatch {
    pub endpoint: String,
    pub texts: Vec<Option<String>>,
}

/// 远程翻译客户端
pub struct RemoteTranslationClient {
    endpoints: Vec<Arc<dyn TranslationEndpoint>>,
    timeout: Duration,
    api_key: String,
    fallback: EmbeddedFallback,
}

impl std::fmt::Debug for RemoteTranslationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTranslationClient")
            .field(
                "endpoints",
                &self.endpoints.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteTranslationClient {
    /// Builds HTTP endpoints for the primary and fallback URLs of `config`
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("HTTP client: {}", e)))?;

        let endpoints = config
            .endpoint_urls()?
            .into_iter()
            .map(|url| Arc::new(HttpEndpoint::new(url, client.clone())) as Arc<dyn TranslationEndpoint>)
            .collect();

        Ok(Self::with_endpoints(endpoints, config.request_timeout()).with_api_key(&config.api_key))
    }

    pub fn with_endpoints(endpoints: Vec<Arc<dyn TranslationEndpoint>>, timeout: Duration) -> Self {
        Self {
            endpoints,
            timeout,
            api_key: String::new(),
            fallback: EmbeddedFallback,
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    pub fn endpoint_names(&self) -> Vec<&str> {
        self.endpoints.iter().map(|endpoint| endpoint.name()).collect()
    }

    /// Sends `texts` to each endpoint in order until one answers
    pub async fn request(
        &self,
        texts: &[String],
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> TranslationResult<RemoteBatch> {
        let request =
            TranslateRequest::new(texts.to_vec(), source, target).with_api_key(&self.api_key);
        let mut last_error = None;

        for endpoint in &self.endpoints {
            tracing::debug!(
                "Requesting {} texts {} -> {} from {}",
                texts.len(),
                source,
                target,
                endpoint.name()
            );

            let outcome = match tokio::time::timeout(self.timeout, endpoint.translate(&request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(TranslationError::TimeoutError {
                    endpoint: endpoint.name().to_string(),
                    timeout: self.timeout,
                }),
            };

            match outcome {
                Ok(response) => {
                    tracing::info!("Translated {} texts with {}", texts.len(), endpoint.name());
                    return Ok(RemoteBatch {
                        endpoint: endpoint.name().to_string(),
                        texts: response.align(texts.len()),
                    });
                }
                Err(e) if e.is_endpoint_failure() => {
                    e.log();
                    last_error = Some(e);
                }
                // Anything else would fail the same way on every endpoint
                Err(e) => return Err(e),
            }
        }

        Err(TranslationError::AllEndpointsFailed {
            attempts: self.endpoints.len(),
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no endpoints configured".to_string()),
        })
    }

    /// Translates `texts`, degrading to keyword substitution and then to
    /// pass-through
    ///
    /// Blank strings are never sent and come back unchanged.
    pub async fn translate(
        &self,
        texts: &[String],
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Vec<ResolvedText> {
        let mut resolved: Vec<ResolvedText> =
            texts.iter().map(|text| ResolvedText::unchanged(text.as_str())).collect();

        let (indexes, to_send): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !is_blank(text))
            .map(|(index, text)| (index, text.clone()))
            .unzip();

        if to_send.is_empty() {
            return resolved;
        }

        match self.request(&to_send, source, target).await {
            Ok(batch) => {
                let mut unanswered = 0;
                for (index, text) in indexes.into_iter().zip(batch.texts) {
                    match text {
                        Some(text) => {
                            resolved[index] = ResolvedText::new(
                                text,
                                TextOrigin::Remote {
                                    endpoint: batch.endpoint.clone(),
                                },
                            );
                        }
                        None => unanswered += 1,
                    }
                }
                if unanswered > 0 {
                    tracing::warn!(
                        "{} left {} of {} texts unanswered",
                        batch.endpoint,
                        unanswered,
                        to_send.len()
                    );
                }
            }
            Err(e) => {
                e.log();
                for (index, text) in indexes.into_iter().zip(to_send) {
                    if let Some(substituted) = self.fallback.substitute(&text, source, target) {
                        resolved[index] = ResolvedText::new(substituted, TextOrigin::EmbeddedFallback);
                    }
                }
            }
        }

        resolved
    }
}
