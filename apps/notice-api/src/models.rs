//! Request models for the notice API

use serde::Deserialize;

/// Payload posted by the web form: the uploaded CSV plus the four free-text
/// date inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateNoticesRequest {
    pub csv_base64: String,
    pub due_date: String,
    pub month: String,
    pub year: String,
    pub mailed_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_form_payload() {
        let json = r#"{
            "csv_base64": "dGVuYW50LGZ1bGxfYWRyZXNz",
            "due_date": "19th",
            "month": "August",
            "year": "24",
            "mailed_date": "08/02/2024"
        }"#;
        let req: GenerateNoticesRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.due_date, "19th");
        assert_eq!(req.mailed_date, "08/02/2024");
    }

    #[test]
    fn rejects_payload_missing_a_field() {
        let json = r#"{"csv_base64": "abc", "due_date": "19th"}"#;
        assert!(serde_json::from_str::<GenerateNoticesRequest>(json).is_err());
    }
}
