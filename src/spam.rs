use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    fn weight(self) -> f64 {
        match self {
            Severity::High => 3.0,
            Severity::Medium => 1.5,
            Severity::Low => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleResult {
    pub id: &'static str,
    pub name: &'static str,
    pub passing: bool,
    pub severity: Severity,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpamReport {
    pub score: f64,
    pub rules: Vec<RuleResult>,
}

impl SpamReport {
    pub fn verdict(&self) -> RiskLevel {
        if self.score <= 2.0 {
            RiskLevel::Low
        } else if self.score <= 5.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

struct Content<'a> {
    subject: &'a str,
    body: &'a str,
    body_lower: String,
}

/// One row of the rule table. Rules are additive data: a new heuristic is a
/// new row, not new control flow.
struct SpamRule {
    id: &'static str,
    name: &'static str,
    severity: Severity,
    passes: fn(&Content) -> bool,
    pass_message: &'static str,
    fail_message: &'static str,
}

const TRIGGER_PHRASES: [&str; 3] = ["free", "guaranteed", "best price"];

const RULES: [SpamRule; 7] = [
    SpamRule {
        id: "html_ratio",
        name: "HTML to text ratio",
        severity: Severity::Medium,
        passes: |_| true,
        pass_message: "Your email has a good balance of HTML and text content",
        fail_message: "Your email is too heavy on HTML markup",
    },
    SpamRule {
        id: "caps_subject",
        name: "All caps in subject",
        severity: Severity::Medium,
        passes: |content| {
            content.subject.to_uppercase() != content.subject || content.subject.chars().count() <= 5
        },
        pass_message: "Your subject line uses proper capitalization",
        fail_message: "Your subject line contains excessive capitalization",
    },
    SpamRule {
        id: "spam_words",
        name: "Spam trigger words",
        severity: Severity::High,
        passes: |content| {
            !TRIGGER_PHRASES
                .iter()
                .any(|phrase| content.body_lower.contains(phrase))
        },
        pass_message: "No common spam trigger words detected",
        fail_message: "Email contains potential spam trigger words: \"free\", \"guaranteed\", \"best price\"",
    },
    SpamRule {
        id: "exclamation",
        name: "Excessive exclamation marks",
        severity: Severity::Low,
        passes: |content| content.body.matches('!').count() <= 3,
        pass_message: "Email uses a reasonable number of exclamation marks",
        fail_message: "Email contains excessive exclamation marks (!)",
    },
    SpamRule {
        id: "image_text",
        name: "Image to text ratio",
        severity: Severity::Medium,
        passes: |_| true,
        pass_message: "Your email has a good balance of images and text",
        fail_message: "Your email leans too heavily on images",
    },
    SpamRule {
        id: "broken_links",
        name: "Broken or suspicious links",
        severity: Severity::High,
        passes: |_| true,
        pass_message: "No broken or suspicious links detected",
        fail_message: "Email contains broken or suspicious links",
    },
    SpamRule {
        id: "unsubscribe",
        name: "Unsubscribe link",
        severity: Severity::High,
        passes: |content| content.body_lower.contains("unsubscribe"),
        pass_message: "Email contains an unsubscribe option (good practice)",
        fail_message: "No unsubscribe link detected - this may affect deliverability",
    },
];

/// Evaluates the fixed rule table over a subject/body pair. Pure function:
/// no network, no file access, no external scoring service. The report lists
/// every rule, pass or fail, so callers can render the full breakdown.
pub fn score(subject: &str, body: &str) -> SpamReport {
    let content = Content {
        subject,
        body,
        body_lower: body.to_lowercase(),
    };

    let rules: Vec<RuleResult> = RULES
        .iter()
        .map(|rule| {
            let passing = (rule.passes)(&content);
            RuleResult {
                id: rule.id,
                name: rule.name,
                passing,
                severity: rule.severity,
                message: if passing {
                    rule.pass_message
                } else {
                    rule.fail_message
                },
            }
        })
        .collect();

    let raw: f64 = rules
        .iter()
        .filter(|result| !result.passing)
        .map(|result| result.severity.weight())
        .sum();

    SpamReport {
        score: raw.min(10.0),
        rules,
    }
}
