use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{NUM_OPTIONS, Question};

use super::ProviderError;

#[derive(Debug, Deserialize)]
struct QuestionReply {
    question: Option<String>,
    options: Option<Vec<String>>,
    answer: Option<Value>,
    #[serde(default)]
    translation: Option<String>,
}

/// First well-formed JSON object embedded in `text`.
///
/// Model replies often wrap the object in prose or markdown fences, so every
/// `{` is tried as a starting point until one parses.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(object))) => Some(object),
            _ => None,
        }
    })
}

/// Turn a raw model reply into a validated [`Question`] for `level`.
pub fn parse_question_reply(level: u8, text: &str) -> Result<Question, ProviderError> {
    let object = extract_json_object(text)
        .ok_or_else(|| ProviderError::MalformedResponse("no JSON object in reply".into()))?;

    let reply: QuestionReply = serde_json::from_value(Value::Object(object))
        .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;

    let missing = |field: &str| ProviderError::MalformedResponse(format!("missing `{}`", field));
    let text = reply
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| missing("question"))?;
    let options = reply.options.ok_or_else(|| missing("options"))?;
    let answer = reply.answer.ok_or_else(|| missing("answer"))?;

    let options: [String; NUM_OPTIONS] = options.try_into().map_err(|got: Vec<String>| {
        ProviderError::MalformedResponse(format!(
            "expected {} options, got {}",
            NUM_OPTIONS,
            got.len()
        ))
    })?;

    let correct_answer = resolve_answer(&options, &answer).ok_or_else(|| {
        ProviderError::MalformedResponse("answer does not match any option".into())
    })?;

    Question::new(level, text, options, correct_answer, reply.translation)
        .map_err(|err| ProviderError::MalformedResponse(err.to_string()))
}

/// Reject a question whose text matches one already asked this game.
pub fn reject_repeat(question: Question, history: &[String]) -> Result<Question, ProviderError> {
    let text = question.text().trim();
    if history.iter().any(|earlier| earlier.trim() == text) {
        return Err(ProviderError::MalformedResponse(
            "question repeats an earlier one".into(),
        ));
    }
    Ok(question)
}

fn resolve_answer(options: &[String; NUM_OPTIONS], answer: &Value) -> Option<usize> {
    match answer {
        Value::String(answer) => {
            let answer = answer.trim();
            options.iter().position(|option| option.trim() == answer)
        }
        Value::Number(index) => index
            .as_u64()
            .map(|index| index as usize)
            .filter(|index| *index < NUM_OPTIONS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "question": "भारत की राजधानी क्या है?",
        "options": ["मुंबई", "नई दिल्ली", "कोलकाता", "चेन्नई"],
        "answer": "नई दिल्ली",
        "translation": "What is the capital of India?"
    }"#;

    #[test]
    fn test_plain_reply() {
        let q = parse_question_reply(2, REPLY).unwrap();
        assert_eq!(q.id(), 2);
        assert_eq!(q.correct_answer(), 1);
        assert_eq!(q.translation(), Some("What is the capital of India?"));
    }

    #[test]
    fn test_fenced_reply_with_prose() {
        let text = format!("Sure! Here is your question:\n```json\n{}\n```\nGood luck.", REPLY);
        let q = parse_question_reply(1, &text).unwrap();
        assert_eq!(q.options()[1], "नई दिल्ली");
    }

    #[test]
    fn test_skips_braces_that_are_not_json() {
        let text = format!("Use {{curly}} braces: {}", REPLY);
        assert!(parse_question_reply(1, &text).is_ok());
    }

    #[test]
    fn test_answer_is_trimmed() {
        let text = REPLY.replace("\"answer\": \"नई दिल्ली\"", "\"answer\": \"  नई दिल्ली \"");
        assert_eq!(parse_question_reply(1, &text).unwrap().correct_answer(), 1);
    }

    #[test]
    fn test_no_json() {
        assert!(matches!(
            parse_question_reply(1, "I cannot help with that."),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_answer() {
        let text = r#"{"question":"q","options":["a","b","c","d"]}"#;
        let err = parse_question_reply(1, text).unwrap_err();
        assert_eq!(err, ProviderError::MalformedResponse("missing `answer`".into()));
    }

    #[test]
    fn test_wrong_option_count() {
        let text = r#"{"question":"q","options":["a","b","c"],"answer":"a"}"#;
        let err = parse_question_reply(1, text).unwrap_err();
        assert_eq!(
            err,
            ProviderError::MalformedResponse("expected 4 options, got 3".into())
        );
    }

    #[test]
    fn test_answer_not_in_options() {
        let text = r#"{"question":"q","options":["a","b","c","d"],"answer":"e"}"#;
        assert!(parse_question_reply(1, text).is_err());
    }

    #[test]
    fn test_numeric_answer_index() {
        let text = r#"{"question":"q","options":["a","b","c","d"],"answer":3}"#;
        assert_eq!(parse_question_reply(1, text).unwrap().correct_answer(), 3);
    }

    #[test]
    fn test_repeated_question_is_rejected() {
        let q = parse_question_reply(2, REPLY).unwrap();
        let history = vec![
            "कौन सा ग्रह लाल है?".to_string(),
            "  भारत की राजधानी क्या है? ".to_string(),
        ];
        assert_eq!(
            reject_repeat(q, &history).unwrap_err(),
            ProviderError::MalformedResponse("question repeats an earlier one".into())
        );
    }

    #[test]
    fn test_new_question_passes_history_check() {
        let q = parse_question_reply(2, REPLY).unwrap();
        let history = vec!["कौन सा ग्रह लाल है?".to_string()];
        assert_eq!(reject_repeat(q.clone(), &history).unwrap(), q);
        assert_eq!(reject_repeat(q.clone(), &[]).unwrap(), q);
    }
}
