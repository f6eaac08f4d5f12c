//! 远程翻译回退测试
//!
//! Runs the HTTP client against local axum servers that misbehave in
//! different ways.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

use flipbook_translator::translation::{
    HttpEndpoint, LanguageCode, RemoteTranslationClient, TextOrigin, TranslationConfig,
    TranslationEndpoint, TranslationError,
};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/translate")
}

/// Prefixes every string with `EN:`
async fn working_server() -> String {
    serve(Router::new().route(
        "/translate",
        post(|Json(body): Json<Value>| async move {
            let texts: Vec<String> = body["q"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .map(|item| format!("EN:{}", item.as_str().unwrap_or_default()))
                        .collect()
                })
                .unwrap_or_default();
            Json(json!({ "translatedText": texts }))
        }),
    ))
    .await
}

async fn broken_server() -> String {
    serve(Router::new().route(
        "/translate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    ))
    .await
}

async fn garbage_server() -> String {
    serve(Router::new().route("/translate", post(|| async { "<html>maintenance</html>" })))
        .await
}

async fn slow_server() -> String {
    serve(Router::new().route(
        "/translate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "translatedText": ["too late"] }))
        }),
    ))
    .await
}

fn http_client(urls: &[&str], timeout: Duration) -> RemoteTranslationClient {
    let client = reqwest::Client::new();
    let endpoints = urls
        .iter()
        .map(|url| {
            Arc::new(HttpEndpoint::new(Url::parse(url).unwrap(), client.clone()))
                as Arc<dyn TranslationEndpoint>
        })
        .collect();
    RemoteTranslationClient::with_endpoints(endpoints, timeout)
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn lang(code: &str) -> LanguageCode {
    LanguageCode::new(code)
}

#[tokio::test]
async fn test_server_error_falls_back_to_next_endpoint() {
    let broken = broken_server().await;
    let working = working_server().await;
    let config = TranslationConfig {
        primary_endpoint: broken.clone(),
        fallback_endpoints: vec![working.clone()],
        ..TranslationConfig::default()
    };
    let client = RemoteTranslationClient::from_config(&config).unwrap();

    assert_eq!(client.endpoint_names(), vec![broken.as_str(), working.as_str()]);

    let batch = client
        .request(&texts(&["Bonjour", "Merci"]), &lang("fr"), &lang("en"))
        .await
        .unwrap();

    assert_eq!(batch.endpoint, working);
    assert_eq!(
        batch.texts,
        vec![Some("EN:Bonjour".to_string()), Some("EN:Merci".to_string())]
    );
}

#[tokio::test]
async fn test_malformed_body_counts_as_failure() {
    let garbage = garbage_server().await;
    let working = working_server().await;
    let client = http_client(&[&garbage, &working], Duration::from_secs(2));

    let resolved = client.translate(&texts(&["Bonjour"]), &lang("fr"), &lang("en")).await;

    assert_eq!(resolved[0].text, "EN:Bonjour");
    assert_eq!(resolved[0].origin, TextOrigin::Remote { endpoint: working });
}

#[tokio::test]
async fn test_slow_endpoint_is_abandoned_after_timeout() {
    let slow = slow_server().await;
    let working = working_server().await;
    let client = http_client(&[&slow, &working], Duration::from_millis(200));

    let batch = client
        .request(&texts(&["Bonjour"]), &lang("fr"), &lang("en"))
        .await
        .unwrap();

    assert_eq!(batch.endpoint, working);
    assert_eq!(batch.texts, vec![Some("EN:Bonjour".to_string())]);
}

#[tokio::test]
async fn test_every_endpoint_failing_degrades_to_keywords() {
    let broken = broken_server().await;
    let garbage = garbage_server().await;
    let client = http_client(&[&broken, &garbage], Duration::from_secs(2));

    let error = client
        .request(&texts(&["Bonjour"]), &lang("fr"), &lang("en"))
        .await
        .unwrap_err();
    match error {
        TranslationError::AllEndpointsFailed { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(last.contains("malformed response"), "last error was {last}");
        }
        other => panic!("unexpected error: {other}"),
    }

    let resolved = client
        .translate(&texts(&["Musique de fond", "Bonjour"]), &lang("fr"), &lang("en"))
        .await;
    assert_eq!(resolved[0].text, "Music de fond");
    assert_eq!(resolved[0].origin, TextOrigin::EmbeddedFallback);
    assert_eq!(resolved[1].text, "Bonjour");
    assert_eq!(resolved[1].origin, TextOrigin::Unchanged);
}

#[tokio::test]
async fn test_request_body_follows_libretranslate() {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let url = serve(Router::new().route(
        "/translate",
        post(move |Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(body);
                Json(json!({ "translatedText": "Thank you" }))
            }
        }),
    ))
    .await;
    let client = http_client(&[&url], Duration::from_secs(2)).with_api_key("secret");

    let resolved = client.translate(&texts(&["Merci", "  "]), &lang("fr"), &lang("en")).await;

    // Single-string answers are accepted, blanks never leave the process
    assert_eq!(resolved[0].text, "Thank you");
    assert_eq!(resolved[1].origin, TextOrigin::Unchanged);

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["q"], json!(["Merci"]));
    assert_eq!(bodies[0]["source"], "fr");
    assert_eq!(bodies[0]["target"], "en");
    assert_eq!(bodies[0]["format"], "text");
    assert_eq!(bodies[0]["api_key"], "secret");
}
