// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use markup5ever_rcdom::{Handle, RcDom};

use flipbook_translator::parsers::html::{
    find_element_by_id, get_node_attr, get_text_content, has_class, html_to_dom,
};
use flipbook_translator::translation::{
    LocalDictionary, MemoryPreferenceStore, PreferenceStore, ProviderResponse,
    RemoteTranslationClient, TranslateRequest, TranslationConfig, TranslationCoordinator,
    TranslationEndpoint, TranslationError, TranslationResult,
};

/// Dictionary shared by the integration tests
pub const DICTIONARY: &str = r#"{
    "fr": {
        "ui": { "music": "Musique", "close": "Fermer", "gallery": "Galerie" },
        "navigation": { "next": "Suivant" }
    },
    "en": {
        "ui": { "music": "Music", "close": "Close", "gallery": "Gallery" },
        "navigation": { "next": "Next" }
    },
    "es": {
        "ui": { "music": "Música", "close": "Cerrar" }
    }
}"#;

/// Flipbook page with the progress bar and the language dialog
pub const FLIPBOOK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Flipbook</title></head>
<body>
  <div class="translation-progress d-none">
    <div class="progress-bar" style="width: 0%"></div>
  </div>
  <div id="translation-status"></div>
  <div class="modal fade show" id="languageModal">
    <h5 class="modal-title" id="modal-title">Langue</h5>
    <button class="language-btn active" data-lang="fr">Français</button>
    <button class="language-btn" data-lang="en">English</button>
    <button class="language-btn" data-lang="es">Español</button>
  </div>
  <button id="music">Musique</button>
  <button id="close">Fermer</button>
  <p class="translatable" id="welcome">Bienvenue à bord</p>
  <script>var title = "Musique";</script>
</body>
</html>"#;

/// Fake translation service
///
/// Answers from a phrase book, or with `[target] text` for unknown strings,
/// and records every request it receives.
pub struct FakeEndpoint {
    name: String,
    phrases: HashMap<String, String>,
    delay: Option<Duration>,
    first_only: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<TranslateRequest>>,
}

impl FakeEndpoint {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            phrases: HashMap::new(),
            delay: None,
            first_only: false,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_phrase(mut self, source: &str, translated: &str) -> Self {
        self.phrases.insert(source.to_string(), translated.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answers with a single string whatever the size of the request
    pub fn answering_first_only(mut self) -> Self {
        self.first_only = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TranslateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Every string sent to this endpoint, in order
    pub fn sent_texts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .flat_map(|request| request.q)
            .collect()
    }
}

#[async_trait]
impl TranslationEndpoint for FakeEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, request: &TranslateRequest) -> TranslationResult<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut translated_text: Vec<String> = request
            .q
            .iter()
            .map(|text| {
                self.phrases
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| format!("[{}] {}", request.target, text))
            })
            .collect();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.first_only && !translated_text.is_empty() {
            return Ok(ProviderResponse::Single {
                translated_text: translated_text.swap_remove(0),
            });
        }
        Ok(ProviderResponse::Batch { translated_text })
    }
}

/// Endpoint that is never reachable
pub struct FailingEndpoint {
    name: String,
    calls: AtomicUsize,
}

impl FailingEndpoint {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationEndpoint for FailingEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, _request: &TranslateRequest) -> TranslationResult<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TranslationError::NetworkError {
            endpoint: self.name.clone(),
            details: "connection refused".to_string(),
        })
    }
}

/// Test configuration: French page, no settle delay
pub fn test_config(batch_size: usize) -> TranslationConfig {
    TranslationConfig {
        batch_size,
        settle_delay_ms: 0,
        ..TranslationConfig::default()
    }
}

pub fn dictionary() -> Arc<LocalDictionary> {
    Arc::new(LocalDictionary::from_json_str(DICTIONARY).unwrap())
}

/// Coordinator wired to `endpoints`, with an in-memory preference store
pub fn coordinator_with(
    endpoints: Vec<Arc<dyn TranslationEndpoint>>,
    batch_size: usize,
) -> TranslationCoordinator {
    coordinator_with_store(endpoints, batch_size, Box::new(MemoryPreferenceStore::new()))
}

pub fn coordinator_with_store(
    endpoints: Vec<Arc<dyn TranslationEndpoint>>,
    batch_size: usize,
    store: Box<dyn PreferenceStore>,
) -> TranslationCoordinator {
    TranslationCoordinator::new(
        &test_config(batch_size),
        dictionary(),
        RemoteTranslationClient::with_endpoints(endpoints, Duration::from_secs(2)),
        store,
    )
    .unwrap()
}

/// HTML 测试辅助工具
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    pub fn parse(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8").unwrap()
    }

    /// Page with `count` distinct opt-in paragraphs
    pub fn paragraphs(count: usize) -> String {
        let body: String = (0..count)
            .map(|i| format!("<p class=\"translatable\" id=\"p{i}\">Phrase numéro {i}</p>"))
            .collect();
        format!("<html><body>{body}</body></html>")
    }

    pub fn element(root: &Handle, id: &str) -> Handle {
        find_element_by_id(root, id).unwrap_or_else(|| panic!("no element #{id}"))
    }

    pub fn text_of(root: &Handle, id: &str) -> String {
        get_text_content(&Self::element(root, id))
    }

    pub fn attr_of(root: &Handle, id: &str, attr: &str) -> Option<String> {
        get_node_attr(&Self::element(root, id), attr)
    }

    pub fn has_class(root: &Handle, id: &str, class: &str) -> bool {
        has_class(&Self::element(root, id), class)
    }
}
