use serde::Serialize;

use super::RecipientEmail;

/// One parsed input line. Produced once by validation; later pipeline stages
/// build new collections instead of mutating records.
#[derive(Debug, Clone, Serialize)]
pub struct RecipientRecord {
    pub email: String,
    pub display_name: Option<String>,
    pub valid: bool,
    pub invalid_reason: Option<String>,
}

impl RecipientRecord {
    /// Parses one `email[,displayName]` line. Returns `None` for blank lines.
    /// The first comma is the separator; commas in names are not escaped.
    pub fn parse_line(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }

        let (email, display_name) = match line.split_once(',') {
            Some((email, name)) => (email.trim(), Some(name.trim())),
            None => (line.trim(), None),
        };

        let valid = RecipientEmail::parse(email.to_string()).is_ok();

        Some(Self {
            email: email.to_string(),
            display_name: display_name
                .filter(|name| !name.is_empty())
                .map(|name| name.to_string()),
            valid,
            invalid_reason: (!valid).then(|| "Invalid email format".to_string()),
        })
    }

    /// Display name if present, otherwise the local part of the address.
    pub fn name(&self) -> &str {
        match &self.display_name {
            Some(name) => name,
            None => self.email.split('@').next().unwrap_or(&self.email),
        }
    }

    pub fn domain(&self) -> &str {
        self.email.split('@').nth(1).unwrap_or("")
    }

    /// Key used by deduplication and suppression matching.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}
