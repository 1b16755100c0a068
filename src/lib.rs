pub mod configuration;
pub mod domain;
pub mod hygiene;
pub mod pipeline;
pub mod spam;
pub mod suppression;
pub mod telemetry;
pub mod template;
pub mod throttle;
