use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Runtime configuration for the filter, injected into the service at
/// construction. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Enables calls to the remote translation provider.
    pub provider_enabled: bool,
    /// API key for the provider. A blank key while the provider is enabled
    /// is treated the same as the provider being disabled.
    pub api_key: String,
    /// Timeout for one provider request, in seconds.
    pub timeout_secs: u64,
    /// Skip translation of text carrying inline multi-language markup.
    pub skip_inline_markup: bool,
    /// Select the legacy element dialect for the markup guard.
    pub legacy_elements: bool,
    /// Translate even when the request locale equals `site_lang`.
    pub translate_site_default: bool,
    /// The site's default language.
    pub site_lang: String,
    /// Append the edit affordance to plain-format output as well. Off by
    /// default: the affordance is markup and would be rendered raw by
    /// non-markup consumers.
    pub annotate_plain: bool,
    /// Site root, used to build edit links and to relativize stored source
    /// URLs.
    pub root_url: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            provider_enabled: false,
            api_key: String::new(),
            timeout_secs: 10,
            skip_inline_markup: true,
            legacy_elements: false,
            translate_site_default: false,
            site_lang: "en".to_string(),
            annotate_plain: false,
            root_url: String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    provider: Option<ProviderSection>,
    filter: Option<FilterSection>,
    site: Option<SiteSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderSection {
    enabled: Option<bool>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FilterSection {
    skip_inline_markup: Option<bool>,
    legacy_elements: Option<bool>,
    translate_site_default: Option<bool>,
    site_lang: Option<String>,
    annotate_plain: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct SiteSection {
    root_url: Option<String>,
}

/// Loads layered configuration: `fulltranslate.toml`, then
/// `fulltranslate.local.toml`, then an explicit extra path, each overriding
/// the fields it sets.
pub fn load_config(extra_path: Option<&Path>) -> Result<FilterConfig, ConfigError> {
    let mut config = FilterConfig::default();

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("fulltranslate.toml"));
    ordered_paths.push(PathBuf::from("fulltranslate.local.toml"));
    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(ConfigError::Read {
                path: extra.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let parsed: ConfigFile =
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            config.merge(parsed);
        }
    }

    Ok(config)
}

impl FilterConfig {
    fn merge(&mut self, incoming: ConfigFile) {
        if let Some(provider) = incoming.provider {
            if let Some(enabled) = provider.enabled {
                self.provider_enabled = enabled;
            }
            if let Some(key) = provider.api_key {
                self.api_key = key;
            }
            if let Some(timeout) = provider.timeout_secs {
                if timeout > 0 {
                    self.timeout_secs = timeout;
                }
            }
        }
        if let Some(filter) = incoming.filter {
            if let Some(skip) = filter.skip_inline_markup {
                self.skip_inline_markup = skip;
            }
            if let Some(legacy) = filter.legacy_elements {
                self.legacy_elements = legacy;
            }
            if let Some(translate) = filter.translate_site_default {
                self.translate_site_default = translate;
            }
            if let Some(lang) = filter.site_lang {
                if !lang.trim().is_empty() {
                    self.site_lang = lang;
                }
            }
            if let Some(annotate) = filter.annotate_plain {
                self.annotate_plain = annotate;
            }
        }
        if let Some(site) = incoming.site {
            if let Some(root) = site.root_url {
                self.root_url = root;
            }
        }
    }
}
