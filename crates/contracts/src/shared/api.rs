use serde::{Deserialize, Serialize};

/// The `{ success, message?, data? }` wrapper every endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Why an envelope could not be turned into data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeFailure {
    /// `success: false`, with the server message when it sent one.
    Rejected(Option<String>),
    /// `success: true` but no `data` where the caller needs it.
    MissingData,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> Result<T, EnvelopeFailure> {
        if !self.success {
            return Err(EnvelopeFailure::Rejected(clean_message(self.message)));
        }
        self.data.ok_or(EnvelopeFailure::MissingData)
    }

    /// For mutations where the payload is irrelevant.
    pub fn into_ack(self) -> Result<Option<String>, EnvelopeFailure> {
        if self.success {
            Ok(clean_message(self.message))
        } else {
            Err(EnvelopeFailure::Rejected(clean_message(self.message)))
        }
    }
}

fn clean_message(message: Option<String>) -> Option<String> {
    message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty())
}

/// Reads the `message` field of a JSON error body, if there is one.
///
/// Binary endpoints report failures as JSON delivered with a blob content
/// type; this is how the text gets recovered.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    let message = value
        .get("message")
        .or_else(|| value.get("error"))?
        .as_str()?
        .trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejected_envelope_keeps_message() {
        let env: ApiEnvelope<Vec<u8>> =
            serde_json::from_value(json!({ "success": false, "message": "KPI not found" })).unwrap();
        assert_eq!(
            env.into_data(),
            Err(EnvelopeFailure::Rejected(Some("KPI not found".into())))
        );
    }

    #[test]
    fn blank_message_is_dropped() {
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_value(json!({ "success": false, "message": "  " })).unwrap();
        assert_eq!(env.into_ack(), Err(EnvelopeFailure::Rejected(None)));
    }

    #[test]
    fn success_without_data() {
        let env: ApiEnvelope<String> = serde_json::from_value(json!({ "success": true })).unwrap();
        assert_eq!(env.into_data(), Err(EnvelopeFailure::MissingData));
    }

    #[test]
    fn body_message_recovery() {
        assert_eq!(
            error_message_from_body(r#"{"success":false,"message":"Employee not found"}"#),
            Some("Employee not found".to_string())
        );
        assert_eq!(
            error_message_from_body(r#"{"error":"bad month"}"#),
            Some("bad month".to_string())
        );
        assert_eq!(error_message_from_body("%PDF-1.7"), None);
        assert_eq!(error_message_from_body(r#"{"message":""}"#), None);
    }
}
