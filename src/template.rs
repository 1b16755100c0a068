use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use once_cell::sync::Lazy;
use rand::{Rng, distr::Alphanumeric};
use regex::{Captures, Regex};

use crate::domain::{RecipientRecord, TrackingConfig};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap());

static ANCHOR_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(<a\b[^>]*?href=")(https?://[^"]+)(")"#).unwrap());

/// Expands `{{NAME}}` placeholders and applies the tracking transforms for
/// one recipient. Recipient- and tracking-derived output is deterministic;
/// the random/synthetic placeholders draw from the injected generator on
/// every call. Unknown placeholder names are left verbatim, never an error.
pub struct TemplateRenderer<'a> {
    tracking: &'a TrackingConfig,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(tracking: &'a TrackingConfig) -> Self {
        Self { tracking }
    }

    /// Full body render: placeholder expansion, then the click-tracking
    /// rewrite, then the unsubscribe block and the open pixel. The tracking
    /// artifacts are appended after the rewrite pass so their own URLs are
    /// never re-routed through the click redirect.
    pub fn render<R: Rng + ?Sized>(
        &self,
        template: &str,
        recipient: &RecipientRecord,
        rng: &mut R,
    ) -> String {
        let mut body = expand_placeholders(template, recipient, rng);

        if self.tracking.click_tracking {
            body = self.rewrite_links(&body, recipient);
        }
        if self.tracking.unsubscribe_enabled {
            body.push('\n');
            body.push_str(&self.unsubscribe_block(recipient, rng));
        }
        if self.tracking.open_tracking {
            body.push('\n');
            body.push_str(&self.tracking_pixel(recipient));
        }
        body
    }

    /// Subjects run through the same expansion as bodies; personalization
    /// tokens resolve identically in both.
    pub fn render_subject<R: Rng + ?Sized>(
        &self,
        subject: &str,
        recipient: &RecipientRecord,
        rng: &mut R,
    ) -> String {
        expand_placeholders(subject, recipient, rng)
    }

    pub fn tracking_pixel(&self, recipient: &RecipientRecord) -> String {
        format!(
            r#"<img src="https://{}/open?id={}" width="1" height="1" />"#,
            self.tracking.tracking_domain,
            base64_email(recipient)
        )
    }

    pub fn click_url(&self, original: &str, recipient: &RecipientRecord) -> String {
        let mut url = format!(
            "https://{}/click?url={}&id={}",
            self.tracking.tracking_domain,
            urlencoding::encode(original),
            base64_email(recipient)
        );
        if let Some(utm) = self
            .tracking
            .utm_params
            .as_deref()
            .filter(|params| !params.is_empty())
        {
            url.push('&');
            url.push_str(utm);
        }
        url
    }

    pub fn unsubscribe_url(&self, recipient: &RecipientRecord) -> String {
        format!(
            "https://{}/unsubscribe?email={}&hash={:x}",
            self.tracking.tracking_domain,
            recipient.email,
            md5::compute(recipient.email.as_bytes())
        )
    }

    fn rewrite_links(&self, body: &str, recipient: &RecipientRecord) -> String {
        ANCHOR_HREF_RE
            .replace_all(body, |caps: &Captures| {
                format!(
                    "{}{}{}",
                    &caps[1],
                    self.click_url(&caps[2], recipient),
                    &caps[3]
                )
            })
            .into_owned()
    }

    fn unsubscribe_block<R: Rng + ?Sized>(
        &self,
        recipient: &RecipientRecord,
        rng: &mut R,
    ) -> String {
        let text = self
            .tracking
            .unsubscribe_text
            .replace("{{unsubscribe_link}}", &self.unsubscribe_url(recipient));
        expand_placeholders(&text, recipient, rng)
    }
}

fn expand_placeholders<R: Rng + ?Sized>(
    template: &str,
    recipient: &RecipientRecord,
    rng: &mut R,
) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "RECIPIENT_NAME" => recipient.name().to_string(),
            "RECIPIENT_EMAIL" => recipient.email.clone(),
            "RECIPIENT_DOMAIN" => recipient.domain().to_string(),
            "RECIPIENT_BASE64_EMAIL" => base64_email(recipient),
            "RECIPIENT_MD5" => format!("{:x}", md5::compute(recipient.email.as_bytes())),
            "CURRENT_DATE" => Utc::now().format("%Y-%m-%d").to_string(),
            "CURRENT_TIME" => Utc::now().format("%H:%M:%S").to_string(),
            "RANDOM_NUMBER" => rng.random_range(0..=999_999u32).to_string(),
            "RANDOM_STRING" => random_string(rng, 12),
            "RANDOM_MD5" => format!("{:x}", md5::compute(rng.random::<[u8; 16]>())),
            "FAKE_COMPANY" => CompanyName().fake_with_rng::<String, _>(rng),
            "FAKE_NAME" => Name().fake_with_rng::<String, _>(rng),
            "FAKE_URL_PATH" => format!(
                "/{}/{}",
                Word().fake_with_rng::<String, _>(rng),
                random_string(rng, 8).to_lowercase()
            ),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

fn base64_email(recipient: &RecipientRecord) -> String {
    general_purpose::STANDARD.encode(&recipient.email)
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}
