use regex::Regex;

// {mlang en,fr}...{mlang}: at least one language code, more separated by
// commas, non-greedy across the enclosed body.
const TAG_DIALECT: &str =
    r"(?is)\{\s*mlang\s+[a-z0-9_-]+(?:\s*,\s*[a-z0-9_-]+\s*)*\s*\}.*?\{\s*mlang\s*\}";

// Two or more adjacent spans that each carry both a lang attribute and the
// multilang class, in either order.
const MODERN_ELEMENTS: &str = r#"(?is)<span(?:\s+lang="[a-z0-9_-]+"|\s+class="multilang"){2}\s*>.*?</span>(?:\s*<span(?:\s+lang="[a-z0-9_-]+"|\s+class="multilang"){2}\s*>.*?</span>)+"#;

// Older authoring style: adjacent <lang> or <span> elements keyed by a lang
// attribute alone.
const LEGACY_ELEMENTS: &str = r#"(?is)<(?:lang|span) lang="[a-z0-9_-]*".*?>.*?</(?:lang|span)>(?:\s*<(?:lang|span) lang="[a-z0-9_-]*".*?>.*?</(?:lang|span)>)+"#;

/// Detects inline multi-language markup in source text.
///
/// Text the author has already localized inline must not be machine
/// translated; mistranslating it would corrupt the authoring intent. The
/// guard recognizes the bracketed tag dialect plus one of two element
/// dialect variants, chosen at construction.
#[derive(Debug)]
pub struct MarkupGuard {
    patterns: Vec<Regex>,
}

impl MarkupGuard {
    pub fn new(legacy_elements: bool) -> Self {
        let elements = if legacy_elements {
            LEGACY_ELEMENTS
        } else {
            MODERN_ELEMENTS
        };
        let patterns = [TAG_DIALECT, elements]
            .iter()
            .map(|pattern| Regex::new(pattern).expect("static pattern"))
            .collect();
        Self { patterns }
    }

    /// True when any dialect matches anywhere in the text.
    pub fn contains_inline_language_markup(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }
}
