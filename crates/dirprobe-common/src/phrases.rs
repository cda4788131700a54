use serde::{Deserialize, Serialize};

/// Case-insensitive substrings that signal one outcome category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds phrases, e.g. a fixture-specific message on top of the defaults.
    pub fn with<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.phrases.extend(Self::new(extra).phrases);
        self
    }

    /// First phrase (in declaration order) found anywhere in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        if self.phrases.is_empty() {
            return None;
        }
        let haystack = text.to_lowercase();
        self.phrases
            .iter()
            .find(|p| haystack.contains(p.as_str()))
            .map(String::as_str)
    }

    /// First phrase found in `after` that was not already in `before`.
    /// Static page copy that merely repeats a phrase is ignored.
    pub fn first_new_match(&self, before: &str, after: &str) -> Option<&str> {
        if self.phrases.is_empty() {
            return None;
        }
        let before = before.to_lowercase();
        let after = after.to_lowercase();
        self.phrases
            .iter()
            .find(|p| after.contains(p.as_str()) && !before.contains(p.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl From<Vec<String>> for PhraseSet {
    fn from(phrases: Vec<String>) -> Self {
        Self::new(phrases)
    }
}

impl From<PhraseSet> for Vec<String> {
    fn from(set: PhraseSet) -> Self {
        set.phrases
    }
}
