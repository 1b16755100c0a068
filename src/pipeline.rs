use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{CampaignConfig, RecipientRecord, TransportEndpoint};
use crate::hygiene::{self, HygieneReport};
use crate::spam::{self, SpamReport};
use crate::suppression::SuppressionLists;
use crate::template::TemplateRenderer;
use crate::throttle::{SchedulingError, build_schedule};

#[derive(Debug, Clone, Serialize)]
pub struct DispatchPlanEntry {
    pub recipient: RecipientRecord,
    pub transport: TransportEndpoint,
    pub scheduled_at: DateTime<Utc>,
    pub rendered_subject: String,
    pub rendered_body: String,
}

/// Everything one campaign preparation produces: the hygiene report, the
/// advisory spam report, and the rate-gated dispatch plan. Delivery itself
/// belongs to an external collaborator.
#[derive(Debug, Serialize)]
pub struct CampaignPlan {
    pub id: Uuid,
    pub report: HygieneReport,
    pub spam: SpamReport,
    pub entries: Vec<DispatchPlanEntry>,
}

/// Prepares a campaign as a pure function of its inputs plus the suppression
/// snapshot. Configuration-level failures abort before any dispatch time is
/// computed; per-recipient drops never abort the batch.
#[tracing::instrument(skip_all, fields(campaign_id = tracing::field::Empty))]
pub fn prepare_campaign(
    config: &CampaignConfig,
    raw_list: &str,
    template: &str,
    suppression: &SuppressionLists,
    start: DateTime<Utc>,
) -> Result<CampaignPlan, SchedulingError> {
    let id = Uuid::new_v4();
    tracing::Span::current().record("campaign_id", tracing::field::display(id));

    let cleaned = hygiene::clean(raw_list, suppression);
    let spam = spam::score(&config.email.subject, template);

    let slots = build_schedule(
        cleaned.recipients.len(),
        &config.transports,
        &config.throttle,
        start,
    )?;

    let renderer = TemplateRenderer::new(&config.tracking);
    let rendered: Vec<(String, String)> = cleaned
        .recipients
        .par_iter()
        .map(|recipient| {
            let mut rng = rand::rng();
            (
                renderer.render_subject(&config.email.subject, recipient, &mut rng),
                renderer.render(template, recipient, &mut rng),
            )
        })
        .collect();

    let entries = cleaned
        .recipients
        .into_iter()
        .zip(slots)
        .zip(rendered)
        .map(
            |((recipient, slot), (rendered_subject, rendered_body))| DispatchPlanEntry {
                recipient,
                transport: slot.transport,
                scheduled_at: slot.scheduled_at,
                rendered_subject,
                rendered_body,
            },
        )
        .collect::<Vec<_>>();

    tracing::info!(
        recipients = entries.len(),
        spam_score = spam.score,
        "Campaign prepared"
    );

    Ok(CampaignPlan {
        id,
        report: cleaned.report,
        spam,
        entries,
    })
}

#[cfg(test)]
mod test {
    use super::prepare_campaign;
    use crate::domain::{
        CampaignConfig, EmailMetadata, ThrottleCurve, TrackingConfig, TransportEndpoint,
    };
    use crate::suppression::SuppressionLists;
    use crate::throttle::SchedulingError;
    use chrono::{TimeZone, Utc};
    use claims::{assert_err, assert_ok};
    use secrecy::SecretString;

    fn endpoint(host: &str) -> TransportEndpoint {
        TransportEndpoint {
            host: host.to_string(),
            port: 587,
            user: "mailer".to_string(),
            pass: SecretString::from("secret".to_string()),
        }
    }

    fn config(transports: Vec<TransportEndpoint>) -> CampaignConfig {
        CampaignConfig {
            transports,
            throttle: ThrottleCurve::new(1.0, 10.0, vec![100, 500, 1000]).unwrap(),
            email: EmailMetadata::parse(
                "Acme Support".to_string(),
                "support@acme.example".to_string(),
                "Hello {{RECIPIENT_NAME}}".to_string(),
                "reply@acme.example".to_string(),
            )
            .unwrap(),
            tracking: TrackingConfig::default(),
        }
    }

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn a_config_without_active_transports_fails_before_scheduling() {
        let config = config(vec![endpoint("")]);
        let result = prepare_campaign(
            &config,
            "a@x.com\nb@x.com",
            "Hi {{RECIPIENT_NAME}}",
            &SuppressionLists::new(),
            start(),
        );
        assert_eq!(assert_err!(result), SchedulingError::NoActiveTransport);
    }

    #[test]
    fn each_surviving_recipient_gets_one_plan_entry() {
        let config = config(vec![endpoint("smtp.example.net")]);
        let plan = assert_ok!(prepare_campaign(
            &config,
            "a@x.com,Alice\nnot-an-email\nb@x.com",
            "Hi {{RECIPIENT_NAME}}",
            &SuppressionLists::new(),
            start(),
        ));

        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0].rendered_body.lines().next(), Some("Hi Alice"));
        assert_eq!(plan.entries[1].rendered_body.lines().next(), Some("Hi b"));
        assert_eq!(plan.report.summary().invalid, 1);
    }

    #[test]
    fn the_subject_is_personalized_per_recipient() {
        let config = config(vec![endpoint("smtp.example.net")]);
        let plan = assert_ok!(prepare_campaign(
            &config,
            "a@x.com,Alice",
            "Body. unsubscribe",
            &SuppressionLists::new(),
            start(),
        ));
        assert_eq!(plan.entries[0].rendered_subject, "Hello Alice");
    }

    #[test]
    fn the_spam_report_rides_along_without_gating_dispatch() {
        let config = config(vec![endpoint("smtp.example.net")]);
        let plan = assert_ok!(prepare_campaign(
            &config,
            "a@x.com",
            "Totally free!!!! No opting out.",
            &SuppressionLists::new(),
            start(),
        ));
        assert!(plan.spam.score > 0.0);
        assert_eq!(plan.entries.len(), 1);
    }
}
