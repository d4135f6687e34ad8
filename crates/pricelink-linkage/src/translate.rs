//! Translation seam for cross-language name comparison.
//!
//! Machine translation itself lives outside this crate; the engine only needs
//! something that maps a listing name into the catalog's native language.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LinkageError, TranslateError};

/// Maps a listing name into the catalog's native language.
pub trait Translator {
    /// Translates `text`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError`] when the backend cannot produce a
    /// translation; callers fall back to the untranslated text.
    fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Result<String, TranslateError>,
{
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self(text)
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Translator for Passthrough {
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        Ok(text.to_owned())
    }
}

#[derive(Debug, Deserialize)]
struct GlossaryFile {
    entries: BTreeMap<String, String>,
}

/// Dictionary translator backed by a phrase table.
///
/// A name that matches an entry as a whole (case-insensitively) is replaced
/// outright; otherwise each whitespace-separated word is looked up on its own
/// and unknown words are kept as written.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: BTreeMap<String, String>,
}

impl Glossary {
    /// Builds a glossary from `(source, target)` pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Loads a glossary from a YAML file of the form `entries: {from: to}`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LinkageError> {
        let content = std::fs::read_to_string(path).map_err(|e| LinkageError::GlossaryIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: GlossaryFile =
            serde_yaml::from_str(&content).map_err(|e| LinkageError::GlossaryParse {
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(Self::from_entries(file.entries))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for Glossary {
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let whole = text.trim().to_lowercase();
        if let Some(hit) = self.entries.get(&whole) {
            return Ok(hit.clone());
        }

        let words: Vec<&str> = text
            .split_whitespace()
            .map(|word| {
                self.entries
                    .get(&word.to_lowercase())
                    .map_or(word, String::as_str)
            })
            .collect();
        Ok(words.join(" "))
    }
}

/// Translates a listing name, treating blank input and backend failures as
/// "no translation available".
pub(crate) fn translate_name(translator: &dyn Translator, source: &str, name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }
    match translator.translate(name) {
        Ok(translated) => Some(translated),
        Err(e) => {
            tracing::warn!(
                source,
                name,
                error = %e,
                "translation failed; comparing untranslated name only"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn passthrough_returns_input() {
        assert_eq!(Passthrough.translate("Green tea").unwrap(), "Green tea");
    }

    #[test]
    fn closures_are_translators() {
        let upper = |text: &str| -> Result<String, TranslateError> { Ok(text.to_uppercase()) };
        assert_eq!(upper.translate("tea").unwrap(), "TEA");
    }

    #[test]
    fn glossary_replaces_whole_phrase_case_insensitively() {
        let glossary = Glossary::from_entries([("Green Tea", "緑茶")]);
        assert_eq!(glossary.translate("  GREEN TEA ").unwrap(), "緑茶");
    }

    #[test]
    fn glossary_translates_word_by_word_and_keeps_unknown_words() {
        let glossary = Glossary::from_entries([("green", "緑"), ("tea", "茶")]);
        assert_eq!(glossary.translate("Green Tea 500ml").unwrap(), "緑 茶 500ml");
    }

    #[test]
    fn glossary_loads_from_yaml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("glossary.yaml");
        std::fs::write(&path, "entries:\n  green tea: 緑茶\n  bottle: ボトル\n")
            .expect("write glossary");
        let glossary = Glossary::load(&path).expect("glossary should load");
        assert_eq!(glossary.len(), 2);
        assert_eq!(glossary.translate("Green tea").unwrap(), "緑茶");
    }

    #[test]
    fn glossary_load_reports_missing_file() {
        let err = Glossary::load(Path::new("/nonexistent/glossary.yaml")).unwrap_err();
        assert!(matches!(err, LinkageError::GlossaryIo { .. }));
    }

    #[test]
    fn glossary_load_reports_bad_yaml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("glossary.yaml");
        std::fs::write(&path, "entries: [not, a, map]\n").expect("write glossary");
        let err = Glossary::load(&path).unwrap_err();
        assert!(matches!(err, LinkageError::GlossaryParse { .. }));
    }

    #[test]
    fn translate_name_skips_blank_input() {
        let calls = Cell::new(0);
        let counting = |text: &str| -> Result<String, TranslateError> {
            calls.set(calls.get() + 1);
            Ok(text.to_owned())
        };
        assert!(translate_name(&counting, "ebay", "   ").is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn translate_name_swallows_backend_errors() {
        let failing =
            |_: &str| -> Result<String, TranslateError> { Err(TranslateError::Backend("quota".into())) };
        assert!(translate_name(&failing, "ebay", "Green tea").is_none());
    }
}
