use serde::{Deserialize, Serialize};

use crate::ReferenceId;

/// A literature reference as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: ReferenceId,
    #[serde(default)]
    pub pubmed_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
}

impl Reference {
    /// One-line citation: `Authors (Year) Journal`.
    pub fn short_desc(&self) -> String {
        let mut desc = String::new();
        if let Some(authors) = self.authors.as_deref() {
            desc.push_str(authors);
        }
        if let Some(year) = self.year.as_deref() {
            if !desc.is_empty() {
                desc.push(' ');
            }
            desc.push('(');
            desc.push_str(year);
            desc.push(')');
        }
        if let Some(journal) = self.journal.as_deref() {
            if !desc.is_empty() {
                desc.push(' ');
            }
            desc.push_str(journal);
        }
        desc
    }

    pub fn pubmed_url(&self) -> Option<String> {
        self.pubmed_id
            .map(|id| format!("https://pubmed.ncbi.nlm.nih.gov/{id}"))
    }
}
