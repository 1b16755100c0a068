use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::RecipientEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionKind {
    Bounce,
    Complaint,
    Unsubscribe,
}

/// Body shape bounce/complaint notifiers POST at us.
#[derive(Debug, Deserialize)]
pub struct SuppressionEvent {
    pub recipient: String,
}

/// Append-only set of addresses that must never receive further mail, keyed
/// by lower-cased address. Entries never expire; removal is an explicit
/// operator edit, not an API concern here.
#[derive(Debug, Clone)]
pub struct SuppressionRegistry {
    kind: SuppressionKind,
    addresses: HashSet<String>,
}

impl SuppressionRegistry {
    pub fn new(kind: SuppressionKind) -> Self {
        Self {
            kind,
            addresses: HashSet::new(),
        }
    }

    pub fn kind(&self) -> SuppressionKind {
        self.kind
    }

    /// Appends one address after running it through the same syntactic check
    /// as list validation. Invalid input is silently discarded.
    pub fn insert(&mut self, raw: &str) -> bool {
        match RecipientEmail::parse(raw.to_string()) {
            Ok(email) => self.addresses.insert(email.normalized()),
            Err(_) => false,
        }
    }

    /// Imports a newline-separated blob: lines are trimmed, filtered by the
    /// syntactic validator, and appended. Returns how many were added.
    pub fn import_blob(&mut self, blob: &str) -> usize {
        blob.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| self.insert(line))
            .count()
    }

    /// Imports one webhook notification (`{ "recipient": "<email>" }`).
    /// Malformed JSON is an error; a syntactically invalid address inside a
    /// well-formed event is discarded like any other invalid import line.
    pub fn import_event(&mut self, payload: &str) -> Result<bool, serde_json::Error> {
        let event: SuppressionEvent = serde_json::from_str(payload)?;
        Ok(self.insert(&event.recipient))
    }

    pub fn contains(&self, email: &str) -> bool {
        self.addresses.contains(&email.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// The three registries a campaign preparation reads at one snapshot.
#[derive(Debug, Clone)]
pub struct SuppressionLists {
    pub bounce: SuppressionRegistry,
    pub complaint: SuppressionRegistry,
    pub unsubscribe: SuppressionRegistry,
}

impl SuppressionLists {
    pub fn new() -> Self {
        Self {
            bounce: SuppressionRegistry::new(SuppressionKind::Bounce),
            complaint: SuppressionRegistry::new(SuppressionKind::Complaint),
            unsubscribe: SuppressionRegistry::new(SuppressionKind::Unsubscribe),
        }
    }

    pub fn registry_mut(&mut self, kind: SuppressionKind) -> &mut SuppressionRegistry {
        match kind {
            SuppressionKind::Bounce => &mut self.bounce,
            SuppressionKind::Complaint => &mut self.complaint,
            SuppressionKind::Unsubscribe => &mut self.unsubscribe,
        }
    }

    /// Which registry, if any, suppresses this address.
    pub fn lookup(&self, email: &str) -> Option<SuppressionKind> {
        [&self.bounce, &self.complaint, &self.unsubscribe]
            .into_iter()
            .find(|registry| registry.contains(email))
            .map(|registry| registry.kind())
    }
}

impl Default for SuppressionLists {
    fn default() -> Self {
        Self::new()
    }
}
