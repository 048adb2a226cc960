use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::messages;

/// Screening questionnaire answers keyed by question.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ScreeningAnswers(pub BTreeMap<String, Value>);

impl ScreeningAnswers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| render_answer(v).is_empty())
    }

    /// One `- question: answer` line per answered question.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.0
            .iter()
            .filter_map(|(question, answer)| {
                let rendered = render_answer(answer);
                (!rendered.is_empty()).then(|| format!("- {}: {rendered}", question.trim()))
            })
            .collect()
    }
}

fn render_answer(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "sim".to_string(),
        Value::Bool(false) => "não".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_answer)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,

    #[serde(default)]
    pub respostas: ScreeningAnswers,
}

impl AssessmentRequest {
    pub fn validate(self) -> Result<(i32, ScreeningAnswers), String> {
        let user_id = self.user_id.ok_or(messages::MISSING_FIELDS)?;
        if self.respostas.is_empty() {
            return Err(messages::EMPTY_ANSWERS.to_string());
        }
        Ok((user_id, self.respostas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lines_render_each_answer_type() {
        let answers: ScreeningAnswers = serde_json::from_value(json!({
            "Como você tem dormido?": "Mal, acordo várias vezes",
            "Nível de ansiedade (0-10)": 7,
            "Já fez terapia antes?": false,
            "Sintomas": ["cansaço", "irritabilidade"],
            "Observações": null
        }))
        .unwrap();

        let lines = answers.to_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines.contains(&"- Como você tem dormido?: Mal, acordo várias vezes".to_string()));
        assert!(lines.contains(&"- Nível de ansiedade (0-10): 7".to_string()));
        assert!(lines.contains(&"- Já fez terapia antes?: não".to_string()));
        assert!(lines.contains(&"- Sintomas: cansaço, irritabilidade".to_string()));
    }

    #[test]
    fn test_blank_answers_are_empty() {
        let answers: ScreeningAnswers =
            serde_json::from_value(json!({"a": "  ", "b": null, "c": []})).unwrap();
        assert!(answers.is_empty());
        assert!(ScreeningAnswers::default().is_empty());
    }

    #[test]
    fn test_request_validation() {
        let request: AssessmentRequest =
            serde_json::from_value(json!({"respostas": {"humor": "bom"}})).unwrap();
        assert_eq!(request.validate().unwrap_err(), messages::MISSING_FIELDS);

        let request: AssessmentRequest = serde_json::from_value(json!({"userId": 4})).unwrap();
        assert_eq!(request.validate().unwrap_err(), messages::EMPTY_ANSWERS);

        let request: AssessmentRequest =
            serde_json::from_value(json!({"userId": 4, "respostas": {"humor": "bom"}})).unwrap();
        let (id, answers) = request.validate().unwrap();
        assert_eq!(id, 4);
        assert_eq!(answers.to_lines(), vec!["- humor: bom".to_string()]);
    }
}
