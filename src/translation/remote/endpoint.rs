//! One translation service reachable over HTTP

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::response::ProviderResponse;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::LanguageCode;

/// Body of a LibreTranslate `/translate` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslateRequest {
    pub q: Vec<String>,
    pub source: String,
    pub target: String,
    pub format: &'static str,
    pub api_key: String,
}

impl TranslateRequest {
    pub fn new(texts: Vec<String>, source: &LanguageCode, target: &LanguageCode) -> Self {
        Self {
            q: texts,
            source: source.to_string(),
            target: target.to_string(),
            format: "text",
            api_key: String::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }
}

/// A service able to translate a batch of strings
#[async_trait]
pub trait TranslationEndpoint: Send + Sync {
    /// Identifies the endpoint in logs and errors
    fn name(&self) -> &str;

    async fn translate(&self, request: &TranslateRequest) -> TranslationResult<ProviderResponse>;
}

/// LibreTranslate-compatible endpoint reached with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    url: Url,
    client: Client,
}

impl HttpEndpoint {
    pub fn new(url: Url, client: Client) -> Self {
        Self { url, client }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl TranslationEndpoint for HttpEndpoint {
    fn name(&self) -> &str {
        self.url.as_str()
    }

    async fn translate(&self, request: &TranslateRequest) -> TranslationResult<ProviderResponse> {
        let endpoint = self.name().to_string();

        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                endpoint: endpoint.clone(),
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(TranslationError::HttpStatus {
                endpoint,
                status: status.as_u16(),
                details,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::NetworkError {
                endpoint: endpoint.clone(),
                details: e.to_string(),
            })?;

        serde_json::from_str(&body).map_err(|e| TranslationError::MalformedResponse {
            endpoint,
            details: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_libretranslate() {
        let request = TranslateRequest::new(
            vec!["Bienvenue".to_string()],
            &LanguageCode::new("fr"),
            &LanguageCode::new("en"),
        );
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "q": ["Bienvenue"],
                "source": "fr",
                "target": "en",
                "format": "text",
                "api_key": ""
            })
        );
    }
}
