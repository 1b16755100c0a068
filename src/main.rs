use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use mailblast::{
    configuration::get_configuration,
    pipeline::prepare_campaign,
    suppression::{SuppressionKind, SuppressionLists},
    telemetry::{get_subscriber, init_subscriber},
};

fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("mailblast".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber);

    let settings = get_configuration().context("Failed to read configuration")?;
    let campaign = settings
        .campaign
        .assemble()
        .context("Invalid campaign configuration")?;

    let raw_list = std::fs::read_to_string(&settings.inputs.recipient_list)
        .with_context(|| format!("Failed to read {}", settings.inputs.recipient_list.display()))?;
    let template = std::fs::read_to_string(&settings.inputs.template)
        .with_context(|| format!("Failed to read {}", settings.inputs.template.display()))?;

    let mut suppression = SuppressionLists::new();
    import_registry(&mut suppression, SuppressionKind::Bounce, settings.inputs.bounce_list.as_deref())?;
    import_registry(
        &mut suppression,
        SuppressionKind::Complaint,
        settings.inputs.complaint_list.as_deref(),
    )?;
    import_registry(
        &mut suppression,
        SuppressionKind::Unsubscribe,
        settings.inputs.unsubscribe_list.as_deref(),
    )?;

    let plan = prepare_campaign(&campaign, &raw_list, &template, &suppression, Utc::now())?;

    let summary = plan.report.summary();
    tracing::info!(
        campaign_id = %plan.id,
        transports = campaign.active_transports().len(),
        valid = summary.valid,
        invalid = summary.invalid,
        duplicates = summary.duplicates,
        suppressed = summary.suppressed,
        spam_score = plan.spam.score,
        "Dispatch plan ready"
    );

    serde_json::to_writer_pretty(std::io::stdout().lock(), &plan)
        .context("Failed to write the dispatch plan")?;

    Ok(())
}

fn import_registry(
    suppression: &mut SuppressionLists,
    kind: SuppressionKind,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let blob = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let imported = suppression.registry_mut(kind).import_blob(&blob);
    tracing::info!(kind = ?kind, imported, "Suppression list imported");
    Ok(())
}
