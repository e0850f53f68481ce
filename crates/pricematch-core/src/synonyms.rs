use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Built-in grocery vocabulary: canonical term → words that mean the same
/// thing on Indian grocery storefronts. Each list includes the term itself.
const BUILTIN_TERMS: &[(&str, &[&str])] = &[
    // vegetables
    ("onion", &["onion", "pyaz", "pyaaz"]),
    ("potato", &["potato", "aloo", "batata"]),
    ("tomato", &["tomato", "tamatar"]),
    ("coriander", &["coriander", "dhaniya", "cilantro"]),
    ("chilli", &["chilli", "mirch", "pepper", "paprika"]),
    ("ginger", &["ginger", "adrak"]),
    ("garlic", &["garlic", "lehsun"]),
    ("lemon", &["lemon", "nimbu", "lime"]),
    ("cucumber", &["cucumber", "kheera", "kakdi"]),
    ("carrot", &["carrot", "gajar"]),
    ("cauliflower", &["cauliflower", "gobi", "gobhi"]),
    ("cabbage", &["cabbage", "patta gobhi"]),
    ("peas", &["peas", "matar"]),
    ("spinach", &["spinach", "palak"]),
    ("lady finger", &["lady finger", "bhindi", "okra"]),
    ("brinjal", &["brinjal", "baingan", "eggplant"]),
    ("capsicum", &["capsicum", "shimla mirch", "bell pepper"]),
    // dairy & breakfast
    ("milk", &["milk", "doodh", "dairy"]),
    ("curd", &["curd", "dahi", "yogurt"]),
    ("paneer", &["paneer", "cottage cheese"]),
    ("butter", &["butter", "maska"]),
    ("cheese", &["cheese", "cheddar", "mozzarella"]),
    ("bread", &["bread", "bun", "pav", "loaf"]),
    ("egg", &["egg", "anda", "eggs"]),
    ("coffee", &["coffee", "nescafe", "bru"]),
    ("tea", &["tea", "chai", "tata tea"]),
    // staples
    ("rice", &["rice", "chawal", "basmati"]),
    ("flour", &["flour", "atta", "maida", "besan"]),
    ("sugar", &["sugar", "cheeni", "shakkar"]),
    ("salt", &["salt", "namak"]),
    ("oil", &["oil", "tel", "sunflower", "mustard", "ghee"]),
    ("dal", &["dal", "lentil", "pulse", "toor", "moong", "urad"]),
    // fruits
    ("apple", &["apple", "seb"]),
    ("banana", &["banana", "kela"]),
    ("mango", &["mango", "aam"]),
    ("papaya", &["papaya", "papita"]),
];

/// Canonical grocery terms and their synonyms, used for query autocorrect
/// and keyword filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymDictionary {
    pub terms: BTreeMap<String, Vec<String>>,
}

impl SynonymDictionary {
    /// The dictionary shipped with the binary.
    #[must_use]
    pub fn builtin() -> Self {
        let terms = BUILTIN_TERMS
            .iter()
            .map(|(term, synonyms)| {
                (
                    (*term).to_string(),
                    synonyms.iter().map(|s| (*s).to_string()).collect(),
                )
            })
            .collect();
        Self { terms }
    }

    /// Keywords a listing name must contain to be relevant to `query`.
    ///
    /// Falls back to the query itself when it is not a canonical term.
    #[must_use]
    pub fn keywords_for(&self, query: &str) -> Vec<String> {
        let lower = query.trim().to_lowercase();
        match self.terms.get(&lower) {
            Some(synonyms) => synonyms.clone(),
            None => vec![lower],
        }
    }

    /// Every known word (canonical terms and synonyms), sorted and unique.
    #[must_use]
    pub fn known_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .terms
            .iter()
            .flat_map(|(term, synonyms)| {
                std::iter::once(term.as_str()).chain(synonyms.iter().map(String::as_str))
            })
            .collect();
        words.sort_unstable();
        words.dedup();
        words
    }
}

impl Default for SynonymDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load and validate a synonym dictionary from a YAML file shaped like
/// `terms: { onion: [onion, pyaz] }`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_synonyms(path: &Path) -> Result<SynonymDictionary, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SynonymsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut dictionary: SynonymDictionary = serde_yaml::from_str(&content)?;
    validate_synonyms(&dictionary)?;

    // Matching is case-insensitive, so store everything lowercased.
    dictionary.terms = dictionary
        .terms
        .into_iter()
        .map(|(term, synonyms)| {
            (
                term.trim().to_lowercase(),
                synonyms.iter().map(|s| s.trim().to_lowercase()).collect(),
            )
        })
        .collect();

    Ok(dictionary)
}

fn validate_synonyms(dictionary: &SynonymDictionary) -> Result<(), ConfigError> {
    if dictionary.terms.is_empty() {
        return Err(ConfigError::Validation(
            "synonyms file must define at least one term".to_string(),
        ));
    }

    for (term, synonyms) in &dictionary.terms {
        if term.trim().is_empty() {
            return Err(ConfigError::Validation(
                "term name must be non-empty".to_string(),
            ));
        }
        if synonyms.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "term '{term}' has an empty synonym"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "pricematch-synonyms-{}-{name}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, content).expect("failed to write temp file");
        path
    }

    #[test]
    fn builtin_contains_core_terms() {
        let dict = SynonymDictionary::builtin();
        assert!(dict.terms.contains_key("milk"));
        assert!(dict.terms.contains_key("onion"));
        assert_eq!(dict.terms["egg"], vec!["egg", "anda", "eggs"]);
    }

    #[test]
    fn keywords_for_known_term_returns_synonyms() {
        let dict = SynonymDictionary::builtin();
        assert_eq!(dict.keywords_for("Curd"), vec!["curd", "dahi", "yogurt"]);
    }

    #[test]
    fn keywords_for_unknown_term_returns_query() {
        let dict = SynonymDictionary::builtin();
        assert_eq!(dict.keywords_for("  Quinoa "), vec!["quinoa"]);
    }

    #[test]
    fn known_words_are_sorted_and_unique() {
        let dict = SynonymDictionary::builtin();
        let words = dict.known_words();
        assert!(words.windows(2).all(|w| w[0] < w[1]));
        assert!(words.contains(&"pyaz"));
        assert!(words.contains(&"milk"));
    }

    #[test]
    fn load_synonyms_reads_and_lowercases() {
        let path = write_temp("ok", "terms:\n  Onion: [Onion, Pyaz]\n  ghee: [ghee]\n");
        let dict = load_synonyms(&path).expect("should load");
        assert_eq!(dict.terms["onion"], vec!["onion", "pyaz"]);
        assert_eq!(dict.terms.len(), 2);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_synonyms_rejects_empty_synonym() {
        let path = write_temp("empty-synonym", "terms:\n  onion: [onion, \"  \"]\n");
        let err = load_synonyms(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("onion")));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_synonyms_rejects_empty_file() {
        let path = write_temp("no-terms", "terms: {}\n");
        let err = load_synonyms(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_synonyms_missing_file_is_io_error() {
        let err = load_synonyms(Path::new("/nonexistent/pricematch/synonyms.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::SynonymsFileIo { .. }));
    }

    #[test]
    fn load_synonyms_invalid_yaml_is_parse_error() {
        let path = write_temp("bad", "terms: [not, a, map]\n");
        let err = load_synonyms(&path).unwrap_err();
        assert!(matches!(err, ConfigError::SynonymsFileParse(_)));
        let _ = std::fs::remove_file(path);
    }
}
