use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InputError;
use crate::calculations::matcher::{ClassificationMatches, match_classification};

/// One row of the activity classification table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityClassificationEntry {
    /// Dot-delimited hierarchical code, e.g. `62.01`.
    pub code: String,
    pub name: String,
}

impl ActivityClassificationEntry {
    /// Creates an entry, trimming both fields.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyField`] when the code or the name is blank.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, InputError> {
        let code = code.into().trim().to_string();
        let name = name.into().trim().to_string();

        if code.is_empty() {
            return Err(InputError::EmptyField { field: "code" });
        }
        if name.is_empty() {
            return Err(InputError::EmptyField { field: "name" });
        }

        Ok(Self { code, name })
    }
}

impl fmt::Display for ActivityClassificationEntry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} {}", self.code, self.name)
    }
}

/// Read-only classification table, kept in the order it was loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationTable {
    entries: Vec<ActivityClassificationEntry>,
}

impl ClassificationTable {
    pub fn new(entries: Vec<ActivityClassificationEntry>) -> Self {
        Self { entries }
    }

    /// The table used when the classification source could not be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ActivityClassificationEntry] {
        &self.entries
    }

    /// Exact lookup by code, as done when the user picks an entry.
    pub fn find(
        &self,
        code: &str,
    ) -> Option<&ActivityClassificationEntry> {
        let code = code.trim();
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Entries whose code or name contains `query`, ignoring case.
    pub fn search<'a>(
        &'a self,
        query: &str,
    ) -> ClassificationMatches<'a> {
        match_classification(query, &self.entries)
    }
}

impl FromIterator<ActivityClassificationEntry> for ClassificationTable {
    fn from_iter<I: IntoIterator<Item = ActivityClassificationEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// VAT category suggested for an activity in the general regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatCategory {
    /// Exports and international carriage.
    ZeroRated,
    /// Food, children's goods, medicine, books and publishing.
    Reduced,
    Standard,
}

impl VatCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZeroRated => "Экспорт",
            Self::Reduced => "Продовольствие",
            Self::Standard => "Стандартная",
        }
    }
}
