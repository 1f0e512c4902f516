//! Language identifiers and the ordered set a session is configured with.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a supported language (e.g. `"en"`, `"pt-BR"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the raw code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Ordered set of language codes.
///
/// The first entry is the default language. Duplicates are dropped on
/// construction, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LanguageCode>", into = "Vec<LanguageCode>")]
pub struct LanguageCodes {
    codes: Vec<LanguageCode>,
}

impl LanguageCodes {
    /// Build a set from any iterator of codes.
    pub fn new<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<LanguageCode>,
    {
        let mut out: Vec<LanguageCode> = Vec::new();
        for code in codes {
            let code = code.into();
            if !out.contains(&code) {
                out.push(code);
            }
        }
        Self { codes: out }
    }

    /// The default language (`codes[0]`), if any.
    #[must_use]
    pub fn default_language(&self) -> Option<&LanguageCode> {
        self.codes.first()
    }

    /// Whether `code` is one of the configured languages.
    #[must_use]
    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.codes.contains(code)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LanguageCode> {
        self.codes.iter()
    }
}

impl From<Vec<LanguageCode>> for LanguageCodes {
    fn from(codes: Vec<LanguageCode>) -> Self {
        Self::new(codes)
    }
}

impl From<LanguageCodes> for Vec<LanguageCode> {
    fn from(codes: LanguageCodes) -> Self {
        codes.codes
    }
}

impl<'a> IntoIterator for &'a LanguageCodes {
    type Item = &'a LanguageCode;
    type IntoIter = std::slice::Iter<'a, LanguageCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}
