use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    pub open_tracking: bool,
    pub click_tracking: bool,
    pub tracking_domain: String,
    #[serde(default)]
    pub utm_params: Option<String>,
    pub unsubscribe_enabled: bool,
    pub unsubscribe_text: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            open_tracking: true,
            click_tracking: true,
            tracking_domain: "track.yourdomain.com".to_string(),
            utm_params: Some("utm_source=newsletter&utm_medium=email".to_string()),
            unsubscribe_enabled: true,
            unsubscribe_text: "If you would like to unsubscribe from these emails, \
                               click here: {{unsubscribe_link}}"
                .to_string(),
        }
    }
}
