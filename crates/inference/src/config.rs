//! Configuration types for the inference library

use serde::{Deserialize, Serialize};

/// Sampling settings forwarded to the backend with every request
///
/// Unset fields are omitted from the request so the service picks its own
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationSettings {
    /// Whether any setting is present
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_serialize_to_empty_object() {
        let settings = GenerationSettings::default();
        assert!(settings.is_empty());
        assert_eq!(serde_json::to_string(&settings).unwrap(), "{}");
    }

    #[test]
    fn test_settings_use_camel_case() {
        let settings = GenerationSettings {
            temperature: Some(0.5),
            max_output_tokens: Some(256),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["maxOutputTokens"], 256);
        assert!(!settings.is_empty());
    }
}
