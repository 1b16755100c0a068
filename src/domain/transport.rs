use secrecy::SecretString;
use serde::ser::SerializeStruct;

/// One SMTP endpoint from the transport pool. An endpoint with an empty host
/// is inactive and never enters the round-robin rotation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TransportEndpoint {
    pub host: String,
    #[serde(deserialize_with = "serde_aux::field_attributes::deserialize_number_from_string")]
    pub port: u16,
    pub user: String,
    pub pass: SecretString,
}

impl TransportEndpoint {
    pub fn is_active(&self) -> bool {
        !self.host.trim().is_empty()
    }

    pub fn label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// The credential stays inside the process: plan output carries host/port/user
// only, never the password.
impl serde::Serialize for TransportEndpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("TransportEndpoint", 3)?;
        state.serialize_field("host", &self.host)?;
        state.serialize_field("port", &self.port)?;
        state.serialize_field("user", &self.user)?;
        state.end()
    }
}

#[cfg(test)]
mod test {
    use crate::domain::TransportEndpoint;
    use secrecy::SecretString;

    fn endpoint(host: &str) -> TransportEndpoint {
        TransportEndpoint {
            host: host.to_string(),
            port: 587,
            user: "mailer".to_string(),
            pass: SecretString::from("hunter2".to_string()),
        }
    }

    #[test]
    fn an_empty_host_marks_the_endpoint_inactive() {
        assert!(!endpoint("").is_active());
        assert!(!endpoint("   ").is_active());
        assert!(endpoint("smtp.example.net").is_active());
    }

    #[test]
    fn serialization_never_exposes_the_password() {
        let json = serde_json::to_string(&endpoint("smtp.example.net")).unwrap();
        assert!(json.contains("smtp.example.net"));
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("pass"));
    }
}
