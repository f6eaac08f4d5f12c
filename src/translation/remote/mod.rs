//! 远程翻译模块
//!
//! LibreTranslate-compatible HTTP endpoints and the client that walks them in
//! order.

pub mod client;
pub mod endpoint;
pub mod response;

pub use client::{RemoteBatch, RemoteTranslationClient, ResolvedText, TextOrigin};
pub use endpoint::{HttpEndpoint, TranslateRequest, TranslationEndpoint};
pub use response::ProviderResponse;
