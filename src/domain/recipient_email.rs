#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientEmail(String);

impl RecipientEmail {
    /// Syntax-only check: exactly one `@`, non-empty local part, a dot inside
    /// the domain (not leading or trailing), no whitespace. No DNS/MX lookups.
    pub fn parse(s: String) -> Result<Self, String> {
        let candidate = s.trim();

        if candidate.chars().any(char::is_whitespace) {
            return Err(format!("{} is not a valid recipient email.", s));
        }
        if candidate.matches('@').count() != 1 {
            return Err(format!("{} is not a valid recipient email.", s));
        }

        let (local, domain) = candidate
            .split_once('@')
            .ok_or_else(|| format!("{} is not a valid recipient email.", s))?;

        let domain_has_inner_dot = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1);

        if local.is_empty() || domain.is_empty() || !domain_has_inner_dot {
            return Err(format!("{} is not a valid recipient email.", s));
        }

        Ok(Self(candidate.to_string()))
    }

    /// Key used by deduplication and suppression matching.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for RecipientEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecipientEmail {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        RecipientEmail::parse(value)
    }
}
