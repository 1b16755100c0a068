use std::path::PathBuf;

use crate::domain::{
    CampaignConfig, CurveError, EmailMetadata, ThrottleCurve, TrackingConfig, TransportEndpoint,
};

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub campaign: CampaignSettings,
    pub inputs: InputSettings,
}

/// Raw campaign settings as they arrive from files; `assemble` turns them
/// into the validated value the pipeline runs against.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct CampaignSettings {
    pub transports: Vec<TransportEndpoint>,
    pub throttle: ThrottleSettings,
    pub email: EmailSettings,
    pub tracking: TrackingConfig,
}

impl CampaignSettings {
    pub fn assemble(self) -> Result<CampaignConfig, anyhow::Error> {
        let throttle = self.throttle.curve()?;
        let email = self
            .email
            .metadata()
            .map_err(|reason| anyhow::anyhow!(reason))?;

        Ok(CampaignConfig {
            transports: self.transports,
            throttle,
            email,
            tracking: self.tracking,
        })
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ThrottleSettings {
    pub initial_rate_per_sec: f64,
    pub max_rate_per_sec: f64,
    pub warmup_steps: Vec<u64>,
}

impl ThrottleSettings {
    pub fn curve(&self) -> Result<ThrottleCurve, CurveError> {
        ThrottleCurve::new(
            self.initial_rate_per_sec,
            self.max_rate_per_sec,
            self.warmup_steps.clone(),
        )
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct EmailSettings {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub reply_to: String,
}

impl EmailSettings {
    pub fn metadata(&self) -> Result<EmailMetadata, String> {
        EmailMetadata::parse(
            self.sender_name.clone(),
            self.sender_email.clone(),
            self.subject.clone(),
            self.reply_to.clone(),
        )
    }
}

/// Where the binary reads its campaign material from.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct InputSettings {
    pub recipient_list: PathBuf,
    pub template: PathBuf,
    pub bounce_list: Option<PathBuf>,
    pub complaint_list: Option<PathBuf>,
    pub unsubscribe_list: Option<PathBuf>,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{other} is not supported environment. Try to use `local` or `production`",
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine current directory");
    let conf_dir = base_path.join("configuration");
    let env: Environment = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENV");

    let settings = config::Config::builder()
        .add_source(
            config::File::with_name(
                conf_dir
                    .join("base")
                    .to_str()
                    .expect("Failed to read base configuration"),
            )
            .required(true),
        )
        .add_source(
            config::File::with_name(
                conf_dir
                    .join(env.as_str())
                    .to_str()
                    .expect("Failed to read environment configuration"),
            )
            .required(true),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
