use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::FilterConfig;
use crate::error::ProviderError;

const ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// A usable result from the remote translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translated {
    pub text: String,
    /// Source language as detected by the provider.
    pub detected_source: String,
}

pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<Translated>, ProviderError>> + Send + 'a>>;

/// External translation collaborator.
///
/// `Ok(None)` means "no usable translation": the caller falls back to the
/// original text. Errors carry diagnostics but the caller degrades them the
/// same way; nothing here may abort rendering.
pub trait Provider: Send + Sync {
    fn translate(&self, text: &str, target_lang: &str) -> ProviderFuture<'_>;
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn translate(&self, text: &str, target_lang: &str) -> ProviderFuture<'_> {
        (**self).translate(text, target_lang)
    }
}

/// Strips a locale-variant suffix. The remote endpoint only understands
/// base language codes, so `de_kids` is sent as `de`.
pub(crate) fn base_language(lang: &str) -> &str {
    lang.split('_').next().unwrap_or(lang)
}

/// Google Cloud Translation v2 client.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleTranslate {
    pub fn new(config: &FilterConfig) -> Self {
        Self::with_endpoint(config, ENDPOINT)
    }

    /// Endpoint override, for pointing the client at a stand-in server.
    pub fn with_endpoint(config: &FilterConfig, endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            endpoint: endpoint.into(),
            api_key: config.api_key.trim().to_string(),
            client,
        }
    }
}

impl Provider for GoogleTranslate {
    fn translate(&self, text: &str, target_lang: &str) -> ProviderFuture<'_> {
        let text = text.to_string();
        let target = base_language(target_lang).to_string();
        Box::pin(async move {
            if self.api_key.is_empty() {
                warn!("translation API key is not configured; skipping remote call");
                return Ok(None);
            }

            let params = [
                ("target", target.as_str()),
                ("key", self.api_key.as_str()),
                ("q", text.as_str()),
            ];
            let response = self.client.post(&self.endpoint).form(&params).send().await?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if !status.is_success() {
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            parse_response(&body, &target)
        })
    }
}

fn parse_response(body: &str, target: &str) -> Result<Option<Translated>, ProviderError> {
    let payload: TranslateResponse =
        serde_json::from_str(body).map_err(|err| ProviderError::Malformed(err.to_string()))?;
    let Some(candidate) = payload.data.translations.into_iter().next() else {
        return Ok(None);
    };
    let text = candidate.translated_text.unwrap_or_default();
    if text.is_empty() {
        return Ok(None);
    }
    let detected = candidate.detected_source_language.unwrap_or_default();
    // Source and target being the same language means the provider did
    // nothing useful; the original text stands.
    if detected == target {
        return Ok(None);
    }
    Ok(Some(Translated {
        text,
        detected_source: detected,
    }))
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    data: TranslateData,
}

#[derive(Debug, Default, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(rename = "detectedSourceLanguage")]
    detected_source_language: Option<String>,
}
