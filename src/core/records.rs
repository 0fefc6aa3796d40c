//! Record types for the NTSB narrative datasets
//!
//! All datasets are flat JSON arrays. Input records are immutable once read;
//! output records are produced by the pipelines and serialized through the
//! checkpoint sinks.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key identifying one record across datasets.
///
/// The event id alone is the key for the CoT evaluation dataset; the contrast
/// dataset additionally carries an aircraft key because one event can involve
/// several aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub ev_id: String,
    pub aircraft_key: Option<String>,
}

impl RecordKey {
    /// Key on the event id alone.
    pub fn event(ev_id: impl Into<String>) -> Self {
        Self {
            ev_id: ev_id.into(),
            aircraft_key: None,
        }
    }

    /// Composite key on the event id plus aircraft key.
    pub fn composite(ev_id: impl Into<String>, aircraft_key: impl Into<String>) -> Self {
        Self {
            ev_id: ev_id.into(),
            aircraft_key: Some(aircraft_key.into()),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.aircraft_key {
            Some(ak) => write!(f, "{} | {}", self.ev_id, ak),
            None => write!(f, "{}", self.ev_id),
        }
    }
}

/// Anything the batch driver can tag an outcome with.
pub trait Keyed {
    fn key(&self) -> RecordKey;
}

/// The aircraft key is numeric in the source spreadsheets and a string after
/// some conversions; accept both and normalize to a string.
fn opt_stringly<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }))
}

/// One accident narrative as exported from the NTSB database: the preliminary
/// and factual narrative sections plus the official probable-cause text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeRecord {
    pub ev_id: String,
    #[serde(
        rename = "Aircraft_Key",
        default,
        deserialize_with = "opt_stringly",
        skip_serializing_if = "Option::is_none"
    )]
    pub aircraft_key: Option<String>,
    #[serde(default)]
    pub narr_accp: String,
    #[serde(default)]
    pub narr_accf: String,
    #[serde(default)]
    pub narr_cause: String,
}

impl NarrativeRecord {
    /// The two narrative sections joined the way the prompts consume them.
    pub fn narrative(&self) -> String {
        format!("{}\n{}", self.narr_accp, self.narr_accf)
            .trim()
            .to_string()
    }
}

impl Keyed for NarrativeRecord {
    fn key(&self) -> RecordKey {
        RecordKey {
            ev_id: self.ev_id.clone(),
            aircraft_key: self.aircraft_key.clone(),
        }
    }
}

/// A generated chain of thought for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CotRecord {
    pub ev_id: String,
    #[serde(
        rename = "Aircraft_Key",
        default,
        deserialize_with = "opt_stringly",
        skip_serializing_if = "Option::is_none"
    )]
    pub aircraft_key: Option<String>,
    pub chain_of_thought: String,
}

/// A raw model answer for one narrative, before any post-processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub ev_id: String,
    #[serde(
        rename = "Aircraft_Key",
        default,
        deserialize_with = "opt_stringly",
        skip_serializing_if = "Option::is_none"
    )]
    pub aircraft_key: Option<String>,
    pub narr_accp: String,
    pub model_output: String,
    pub model_name: String,
}

/// A response split into its reasoning and answer parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub ev_id: String,
    #[serde(
        rename = "Aircraft_Key",
        default,
        deserialize_with = "opt_stringly",
        skip_serializing_if = "Option::is_none"
    )]
    pub aircraft_key: Option<String>,
    pub narr_accp: String,
    pub chain_of_thought: String,
    pub answer: String,
}

/// Input to the evaluation pipelines. Accepts the output of either `generate`
/// or `process`; `model_output` is the fallback answer field for files that
/// were never split.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedRecord {
    pub ev_id: String,
    #[serde(rename = "Aircraft_Key", default, deserialize_with = "opt_stringly")]
    pub aircraft_key: Option<String>,
    #[serde(default)]
    pub chain_of_thought: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub model_output: String,
}

impl GeneratedRecord {
    /// The answer text, falling back to the raw model output.
    pub fn answer_text(&self) -> &str {
        if self.answer.is_empty() {
            &self.model_output
        } else {
            &self.answer
        }
    }
}

/// One scored record. `S` is the score set of the evaluation mode.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecord<S> {
    pub ev_id: String,
    #[serde(rename = "Aircraft_Key", skip_serializing_if = "Option::is_none")]
    pub aircraft_key: Option<String>,
    pub scores: S,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aircraft_key_accepts_numbers_and_strings() {
        let json = r#"{"ev_id": "20001208X05929", "Aircraft_Key": 1, "narr_accp": "x"}"#;
        let record: NarrativeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.aircraft_key.as_deref(), Some("1"));

        let json = r#"{"ev_id": "20001208X05929", "Aircraft_Key": "2"}"#;
        let record: NarrativeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.aircraft_key.as_deref(), Some("2"));

        let json = r#"{"ev_id": "20001208X05929"}"#;
        let record: NarrativeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.aircraft_key, None);
    }

    #[test]
    fn narrative_joins_both_sections() {
        let record = NarrativeRecord {
            ev_id: "e1".into(),
            aircraft_key: None,
            narr_accp: "preliminary".into(),
            narr_accf: "factual".into(),
            narr_cause: String::new(),
        };
        assert_eq!(record.narrative(), "preliminary\nfactual");
    }

    #[test]
    fn key_display_includes_aircraft_key_when_present() {
        assert_eq!(RecordKey::event("e1").to_string(), "e1");
        assert_eq!(RecordKey::composite("e1", "2").to_string(), "e1 | 2");
    }

    #[test]
    fn answer_text_falls_back_to_model_output() {
        let record = GeneratedRecord {
            ev_id: "e1".into(),
            aircraft_key: None,
            chain_of_thought: String::new(),
            answer: String::new(),
            model_output: "raw".into(),
        };
        assert_eq!(record.answer_text(), "raw");
    }
}
