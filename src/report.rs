use crate::{Hand, Meld, MeldType, Tile, evaluator};
use serde::{Deserialize, Serialize};

/// JSON-serializable representation of a meld
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MeldJson {
    #[serde(rename = "run")]
    Run { tiles: Vec<String> },
    #[serde(rename = "set")]
    Set { tiles: Vec<String> },
}

/// Evaluation summary of a hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandReport {
    /// Display form, e.g. "{R1 R2 R3}"
    pub hand: String,
    /// Negative sum of face values
    pub score: i32,
    /// Combined value of runs and sets
    pub meld_value: u32,
    pub has_to_draw: bool,
    /// Scoring runs and sets, runs first
    pub melds: Vec<MeldJson>,
}

impl HandReport {
    pub fn for_hand(hand: &Hand) -> Self {
        HandReport {
            hand: hand.render(),
            score: evaluator::score(hand),
            meld_value: evaluator::meld_value(hand),
            has_to_draw: evaluator::has_to_draw(hand),
            melds: evaluator::classify(hand).iter().map(meld_to_json).collect(),
        }
    }
}

/// Result envelope returned across the JSON boundary
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<HandReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<HandReport, String>> for EvaluationResult {
    fn from(result: Result<HandReport, String>) -> Self {
        match result {
            Ok(report) => EvaluationResult {
                success: true,
                report: Some(report),
                error: None,
            },
            Err(e) => EvaluationResult {
                success: false,
                report: None,
                error: Some(e),
            },
        }
    }
}

/// Convert internal Meld to JSON representation
pub fn meld_to_json(meld: &Meld) -> MeldJson {
    let tiles: Vec<String> = meld.tiles.iter().map(|t| t.to_string()).collect();

    match meld.meld_type {
        MeldType::Run => MeldJson::Run { tiles },
        MeldType::Set => MeldJson::Set { tiles },
    }
}

/// Parse a JSON array of tile strings (e.g. `["R1", "B5"]`) into a hand
pub fn hand_from_json(hand_tiles: &str) -> Result<Hand, String> {
    let tile_strs: Vec<String> =
        serde_json::from_str(hand_tiles).map_err(|e| format!("Invalid hand JSON: {}", e))?;

    tile_strs.iter().map(|s| Tile::from_string(s)).collect()
}

/// Evaluate a JSON array of tile strings
pub fn evaluate_json(hand_tiles: &str) -> Result<HandReport, String> {
    let hand = hand_from_json(hand_tiles)?;
    Ok(HandReport::for_hand(&hand))
}

/// Serialize any evaluation outcome, never failing
pub fn to_json_string(result: EvaluationResult) -> String {
    serde_json::to_string(&result)
        .unwrap_or_else(|e| format!(r#"{{"success":false,"error":"Serialization error: {}"}}"#, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_report_for_hand() {
        let hand = Hand::parse("R1 R2 R3 R4 B7 G7 O7").unwrap();
        let report = HandReport::for_hand(&hand);

        assert_eq!(report.hand, "{R1 R2 R3 R4 B7 G7 O7}");
        assert_eq!(report.score, -(1 + 2 + 3 + 4 + 21));
        assert_eq!(report.meld_value, 31);
        assert!(!report.has_to_draw);
        assert_eq!(
            report.melds,
            vec![
                MeldJson::Run {
                    tiles: vec!["R1".into(), "R2".into(), "R3".into(), "R4".into()]
                },
                MeldJson::Set {
                    tiles: vec!["B7".into(), "G7".into(), "O7".into()]
                },
            ]
        );
    }

    #[test]
    fn test_evaluate_json_shape() {
        let report = evaluate_json(r#"["R10", "B10", "G10"]"#).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value,
            json!({
                "hand": "{R10 B10 G10}",
                "score": -30,
                "meld_value": 30,
                "has_to_draw": true,
                "melds": [{"type": "set", "tiles": ["R10", "B10", "G10"]}]
            })
        );
    }

    #[test]
    fn test_evaluate_json_errors() {
        assert!(evaluate_json("not json").is_err());
        assert!(evaluate_json(r#"["R1", "X2"]"#).is_err());
        assert!(evaluate_json(r#"["R1", "Rx"]"#).is_err());
    }

    #[test]
    fn test_empty_hand_json() {
        let report = evaluate_json("[]").unwrap();
        assert_eq!(report.hand, "{}");
        assert_eq!(report.meld_value, 0);
        assert!(report.has_to_draw);
        assert!(report.melds.is_empty());
    }

    #[test]
    fn test_error_envelope_omits_report() {
        let json = to_json_string(evaluate_json("[1]").into());
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["success"], json!(false));
        assert!(value.get("report").is_none());
        assert!(value["error"].as_str().unwrap().starts_with("Invalid hand JSON"));
    }
}
