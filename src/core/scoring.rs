//! Rubric score parsing, normalization, and score sets
//!
//! Judge models are asked to answer with a single integer 1–5. The literal
//! token is validated before acceptance; anything else counts as a failed
//! attempt for the retry layer.

use crate::core::client::{CallError, CompletionClient};
use crate::core::retry::{RetryError, RetryPolicy};
use serde::Serialize;
use std::fmt::Display;

/// Map a raw 1–5 rubric score onto [0, 1], rounded to 4 decimals:
/// 1 → 0.0, 2 → 0.25, 3 → 0.5, 4 → 0.75, 5 → 1.0.
pub fn normalize(raw: u8) -> f64 {
    (((raw as f64) - 1.0) / 4.0 * 10_000.0).round() / 10_000.0
}

/// Validate a judge reply as one of the literal tokens `1`..`5` and return
/// the normalized score.
pub fn parse_score(reply: &str) -> Result<f64, CallError> {
    let raw = match reply.trim() {
        "1" => 1,
        "2" => 2,
        "3" => 3,
        "4" => 4,
        "5" => 5,
        other => {
            return Err(CallError::InvalidReply(format!(
                "invalid score from model: {other:?}"
            )))
        }
    };
    Ok(normalize(raw))
}

/// Ask the judge model for one rubric score, retrying invalid replies under
/// the policy.
pub async fn ask_score<C>(
    client: &C,
    policy: &RetryPolicy,
    prompt: &str,
) -> Result<f64, RetryError>
where
    C: CompletionClient + ?Sized,
{
    policy
        .run(|| async {
            let reply = client.complete(prompt).await?;
            parse_score(&reply)
        })
        .await
}

/// Append a per-metric failure to a score set's error field; earlier entries
/// are never overwritten.
pub fn record_metric_error(slot: &mut Option<String>, metric: &str, err: impl Display) {
    let entry = format!("{metric}:{err}");
    match slot {
        Some(existing) => {
            existing.push_str("; ");
            existing.push_str(&entry);
        }
        None => *slot = Some(entry),
    }
}

/// Scores of the CoT evaluation mode. Missing metrics serialize as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CotScores {
    pub faithfulness: Option<f64>,
    pub logicality: Option<f64>,
    pub support: Option<f64>,
    pub completeness: Option<f64>,
    pub ntsb_style: Option<f64>,
    pub error: Option<String>,
}

/// Scores of the contrast evaluation mode: the answer metrics always, the
/// CoT metrics only when a chain of thought was present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContrastScores {
    pub faithfulness: Option<f64>,
    pub logicality: Option<f64>,
    pub support: Option<f64>,
    pub completeness: Option<f64>,
    pub ntsb_style: Option<f64>,
    pub causal_accuracy: Option<f64>,
    pub causal_completeness: Option<f64>,
    pub causal_precision: Option<f64>,
    pub cause_alignment: Option<f64>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_maps_the_rubric_onto_quarters() {
        assert_eq!(normalize(1), 0.0);
        assert_eq!(normalize(2), 0.25);
        assert_eq!(normalize(3), 0.5);
        assert_eq!(normalize(4), 0.75);
        assert_eq!(normalize(5), 1.0);
    }

    #[test]
    fn parse_accepts_only_the_five_tokens() {
        assert_eq!(parse_score("3").unwrap(), 0.5);
        assert_eq!(parse_score("  5\n").unwrap(), 1.0);

        for bad in ["0", "6", "3.5", "four", "", "The score is 4"] {
            assert!(
                matches!(parse_score(bad), Err(CallError::InvalidReply(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn metric_errors_accumulate() {
        let mut slot = None;
        record_metric_error(&mut slot, "faithfulness", "timed out");
        record_metric_error(&mut slot, "support", "invalid score");
        assert_eq!(
            slot.as_deref(),
            Some("faithfulness:timed out; support:invalid score")
        );
    }

    #[test]
    fn missing_scores_serialize_as_null() {
        let scores = CotScores {
            faithfulness: Some(0.75),
            ..Default::default()
        };
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["faithfulness"], 0.75);
        assert!(json["logicality"].is_null());
        assert!(json["error"].is_null());
    }
}
