use validator::ValidateEmail;

use super::{SenderName, ThrottleCurve, TrackingConfig, TransportEndpoint};

/// Sender identity and message metadata, validated at assembly time.
#[derive(Debug, Clone)]
pub struct EmailMetadata {
    pub sender_name: SenderName,
    pub sender_email: String,
    pub subject: String,
    pub reply_to: String,
}

impl EmailMetadata {
    pub fn parse(
        sender_name: String,
        sender_email: String,
        subject: String,
        reply_to: String,
    ) -> Result<Self, String> {
        let sender_name = SenderName::parse(sender_name)?;
        if !sender_email.validate_email() {
            return Err(format!("{} is not a valid sender email.", sender_email));
        }
        if !reply_to.validate_email() {
            return Err(format!("{} is not a valid reply-to email.", reply_to));
        }
        Ok(Self {
            sender_name,
            sender_email,
            subject,
            reply_to,
        })
    }
}

/// The resolved configuration a campaign preparation runs against. Assembled
/// once from settings and passed by reference into the pipeline; no global
/// mutable settings object backs the core.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub transports: Vec<TransportEndpoint>,
    pub throttle: ThrottleCurve,
    pub email: EmailMetadata,
    pub tracking: TrackingConfig,
}

impl CampaignConfig {
    pub fn active_transports(&self) -> Vec<TransportEndpoint> {
        self.transports
            .iter()
            .filter(|transport| transport.is_active())
            .cloned()
            .collect()
    }
}
