//! JSON rendering of the summary model. Field order follows the struct layout.

use crate::{DrawSummary, ReportError};

pub fn render_json(s: &DrawSummary) -> Result<String, ReportError> {
    serde_json::to_string_pretty(s).map_err(|e| ReportError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_summary, fixture};

    #[test]
    fn top_level_sections_in_order() {
        let json = render_json(&build_summary(&fixture::execution())).unwrap();
        let keys = ["\"title\"", "\"drawing_id\"", "\"participants\"", "\"periods\"", "\"totals\""];
        let at: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(at.windows(2).all(|w| w[0] < w[1]), "{json}");

        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["seed"], "42");
        assert_eq!(v["participants"][2]["slots"], serde_json::json!([]));
    }
}
