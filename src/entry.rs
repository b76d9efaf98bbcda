use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters kept in a preview before the ellipsis
pub const PREVIEW_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub date: String,
    pub content: String,
    pub preview_text: String,
    pub filename: String,
}

impl Entry {
    pub fn new() -> Self {
        Entry::new_at(Uuid::new_v4().to_string(), Local::now())
    }

    /// Build an empty entry created at `created`.
    ///
    /// `date` uses the local calendar day, `filename` the UTC timestamp.
    pub fn new_at(id: String, created: DateTime<Local>) -> Self {
        let date = created.format("%b %-d").to_string();
        let filename = format!(
            "[{}]-[{}].md",
            id,
            filename_timestamp(created.with_timezone(&Utc))
        );
        Entry {
            id,
            date,
            content: String::new(),
            preview_text: String::new(),
            filename,
        }
    }

    /// Preview for list display, with a stand-in for empty entries
    pub fn display_preview(&self) -> &str {
        if self.preview_text.is_empty() {
            "Empty note"
        } else {
            &self.preview_text
        }
    }

    /// Replace the content and recompute the preview
    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.preview_text = preview(content);
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-line summary of `content` for list display.
pub fn preview(content: &str) -> String {
    let normalized = content.replace('\n', " ");
    let normalized = normalized.trim();

    if normalized.chars().count() > PREVIEW_LEN {
        let head: String = normalized.chars().take(PREVIEW_LEN).collect();
        format!("{}...", head)
    } else {
        normalized.to_string()
    }
}

/// `YYYY-MM-DDTHH-MM-SS`: ISO-8601 with `:` and `.` swapped for `-`.
fn filename_timestamp(created: DateTime<Utc>) -> String {
    let iso = created.to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    iso.replace([':', '.'], "-").chars().take(19).collect()
}
