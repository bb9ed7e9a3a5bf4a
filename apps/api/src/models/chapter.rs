use serde::{Deserialize, Serialize};

/// One narrative unit of the document. Input order defines document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub narrative: String,
}

impl Chapter {
    /// Title and narrative joined with a single space, the text every matcher reads.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.narrative)
    }
}
