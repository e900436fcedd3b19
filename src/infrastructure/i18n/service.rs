use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Language metadata loaded from JSON
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub flag: String,
    pub native_name: String,
}

/// Translation data loaded from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationData {
    pub language: LanguageInfo,
    pub ui: HashMap<String, String>,
    /// chrono format string for timestamps shown in this locale
    pub date_format: String,
}

/// Internationalization service with dynamic language loading
pub struct I18nService {
    current_language: String,
    translations: HashMap<String, TranslationData>,
    available_languages: Vec<LanguageInfo>,
}

impl I18nService {
    /// Auto-discovers all translation files in `dir`.
    pub fn new(dir: &Path, preferred: Option<&str>) -> Self {
        let mut translations = HashMap::new();
        let mut available_languages = Vec::new();

        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) == Some("json")
                    && let Ok(json_content) = std::fs::read_to_string(&path)
                    && let Ok(data) = serde_json::from_str::<TranslationData>(&json_content)
                {
                    let lang_code = data.language.code.clone();
                    available_languages.push(data.language.clone());
                    translations.insert(lang_code, data);
                }
            }
        }

        available_languages.sort_by(|a, b| a.code.cmp(&b.code));

        let default_lang = preferred
            .filter(|code| translations.contains_key(*code))
            .map(str::to_string)
            .or_else(|| {
                available_languages
                    .iter()
                    .find(|l| l.code == "en")
                    .map(|l| l.code.clone())
            })
            .or_else(|| available_languages.first().map(|l| l.code.clone()))
            .unwrap_or_else(|| "en".to_string());

        Self {
            current_language: default_lang,
            translations,
            available_languages,
        }
    }

    /// Get list of all available languages
    pub fn available_languages(&self) -> &[LanguageInfo] {
        &self.available_languages
    }

    /// Set current language by code
    pub fn set_language(&mut self, language_code: &str) -> bool {
        if self.translations.contains_key(language_code) {
            self.current_language = language_code.to_string();
            true
        } else {
            false
        }
    }

    pub fn current_language_code(&self) -> &str {
        &self.current_language
    }

    /// Translate a UI key
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations
            .get(&self.current_language)
            .and_then(|data| data.ui.get(key))
            .map(|s| s.as_str())
            .unwrap_or(key)
    }

    /// Translate a UI key and substitute `{placeholder}` values
    pub fn tf(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        let mut text = self.t(key).to_string();
        for (placeholder, value) in substitutions {
            text = text.replace(&format!("{{{placeholder}}}"), value);
        }
        text
    }

    /// chrono format string for the current locale
    pub fn date_format(&self) -> &str {
        self.translations
            .get(&self.current_language)
            .map(|data| data.date_format.as_str())
            .unwrap_or("%Y-%m-%d")
    }
}
