use tracing::{debug, warn};

use crate::config::FilterConfig;
use crate::hash::content_key;
use crate::markup::MarkupGuard;
use crate::provider::Provider;
use crate::store::{NewRecord, TextFormat, TranslationStore};

/// Per-fragment options supplied by the host framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    pub original_format: Option<TextFormat>,
}

impl FilterOptions {
    /// Only a recognized rich-markup hint maps to HTML; everything else is
    /// stored as plain for downstream editing tools.
    fn format(&self) -> TextFormat {
        match self.original_format {
            Some(TextFormat::Html) => TextFormat::Html,
            _ => TextFormat::Plain,
        }
    }
}

/// Facts about the current request, supplied once by the host.
///
/// The edit-affordance decision depends only on static capability and
/// context facts, so it is computed once and memoized here rather than in
/// process-wide state. The context also accumulates which strings were
/// annotated, keyed by record id, for the host's edit tooling.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub locale: String,
    pub page_url: String,
    pub can_edit_translations: bool,
    /// True for machine/API callers; they never get edit markup.
    pub web_service: bool,
    /// True for file-download requests.
    pub download: bool,
    show_edit: Option<bool>,
    annotated: Vec<(i64, String)>,
}

impl RequestContext {
    pub fn new(locale: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            page_url: page_url.into(),
            ..Self::default()
        }
    }

    pub fn with_editor(mut self, can_edit: bool) -> Self {
        self.can_edit_translations = can_edit;
        self
    }

    fn show_edit(&mut self) -> bool {
        *self
            .show_edit
            .get_or_insert(self.can_edit_translations && !self.web_service && !self.download)
    }

    /// Strings that received an edit affordance during this request.
    pub fn annotated(&self) -> &[(i64, String)] {
        &self.annotated
    }
}

/// Orchestrates key derivation, store lookup, provider fallback, write-back
/// and the optional edit affordance for each filtered fragment.
pub struct TranslationService<P> {
    config: FilterConfig,
    store: TranslationStore,
    provider: P,
    guard: MarkupGuard,
}

impl<P: Provider> TranslationService<P> {
    pub fn new(config: FilterConfig, store: TranslationStore, provider: P) -> Self {
        let guard = MarkupGuard::new(config.legacy_elements);
        Self {
            config,
            store,
            provider,
            guard,
        }
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Filters one renderable text fragment. Never fails: every error path
    /// degrades to returning the text unchanged, so the surrounding page
    /// always renders.
    pub async fn filter(
        &self,
        text: &str,
        options: &FilterOptions,
        ctx: &mut RequestContext,
    ) -> String {
        if text.trim().is_empty() || is_numeric(text) {
            return text.to_string();
        }
        if ctx.locale == self.config.site_lang && !self.config.translate_site_default {
            return text.to_string();
        }

        let key = content_key(text);
        let format = options.format();

        let existing = match self.store.lookup(&key, &ctx.locale) {
            Ok(existing) => existing,
            Err(err) => {
                warn!("translation lookup failed, treating as miss: {err}");
                None
            }
        };

        let (record_id, translation) = match existing {
            Some(record) => {
                if let Err(err) = self.store.touch(&key, &ctx.locale) {
                    warn!("failed to refresh last access: {err}");
                }
                debug!(hashkey = %key, lang = %ctx.locale, "translation cache hit");
                (Some(record.id), record.translation)
            }
            None => self.generate(text, &key, format, ctx).await,
        };

        self.annotate(translation, record_id, format, ctx)
    }

    /// Miss path: produce a translation (or fall back to the source text)
    /// and persist the outcome.
    async fn generate(
        &self,
        text: &str,
        key: &str,
        format: TextFormat,
        ctx: &RequestContext,
    ) -> (Option<i64>, String) {
        let (translation, hidden) = match self.generate_translation(text, &ctx.locale).await {
            Some(translated) => (translated, false),
            None => (text.to_string(), true),
        };

        let record = NewRecord {
            hashkey: key.to_string(),
            lang: ctx.locale.clone(),
            source_text: text.to_string(),
            translation: translation.clone(),
            format,
            source_url: self.relative_url(&ctx.page_url),
            hidden,
        };
        let record_id = match self.store.insert(record) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("failed to persist translation, returning uncached result: {err}");
                None
            }
        };
        (record_id, translation)
    }

    /// Returns the machine translation, or `None` when no real translation
    /// should or could be produced.
    async fn generate_translation(&self, text: &str, lang: &str) -> Option<String> {
        if !self.config.provider_enabled {
            return None;
        }
        if self.config.skip_inline_markup && self.guard.contains_inline_language_markup(text) {
            debug!("inline language markup present, leaving text untranslated");
            return None;
        }
        match self.provider.translate(text, lang).await {
            Ok(Some(translated)) => Some(translated.text),
            Ok(None) => None,
            Err(err) => {
                warn!("translation provider failed, falling back to source text: {err}");
                None
            }
        }
    }

    /// Appends the edit anchor when the request context allows it. The
    /// anchor is markup, so plain-format output is left alone unless
    /// explicitly configured otherwise.
    fn annotate(
        &self,
        translation: String,
        record_id: Option<i64>,
        format: TextFormat,
        ctx: &mut RequestContext,
    ) -> String {
        let Some(id) = record_id else {
            return translation;
        };
        if !ctx.show_edit() {
            return translation;
        }
        if format == TextFormat::Plain && !self.config.annotate_plain {
            return translation;
        }
        ctx.annotated.push((id, translation.clone()));
        let root = self.config.root_url.trim_end_matches('/');
        format!(
            "{translation}<a target=\"_blank\" data-action=\"translation-edit\" \
             data-recordid=\"{id}\" href=\"{root}/translations/edit?id={id}\">\
             <i class=\"fa fa-pencil-square-o\" aria-hidden=\"true\"></i></a>"
        )
    }

    /// Source URLs are stored relative to the site root.
    fn relative_url(&self, url: &str) -> String {
        let root = self.config.root_url.trim_end_matches('/');
        if !root.is_empty() {
            if let Some(stripped) = url.strip_prefix(root) {
                return stripped.to_string();
            }
        }
        url.to_string()
    }
}

/// Purely numeric fragments carry no translatable content.
fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::is_numeric;

    #[test]
    fn numeric_detection() {
        assert!(is_numeric("42"));
        assert!(is_numeric(" 3.14 "));
        assert!(is_numeric("-7"));
        assert!(!is_numeric("42nd"));
        assert!(!is_numeric("Hello"));
        assert!(!is_numeric(""));
    }
}
