//! Response Parser: turns a raw model completion into a typed, validated result.
//!
//! The model is asked for a bare JSON object but may wrap it in code fences or prose.
//! A reply that is missing a section, or carries values outside their range, is rejected
//! as a whole; no field is ever defaulted to paper over a bad completion.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::analysis::models::{
    AnswerEvaluation, InterviewQuestion, QuestionCategory, QuestionMix, ResumeAnalysis,
};
use crate::analysis::prompt_builder::PromptMode;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{mode} response is malformed: {reason}")]
    Malformed { mode: PromptMode, reason: String },
}

/// A typed reply the model produces for one prompt mode.
pub trait ModelReply: DeserializeOwned {
    /// The mode whose prompt asks for this shape.
    const MODE: PromptMode;

    /// Normalises the deserialized reply or explains why it is unusable.
    fn validate(self) -> Result<Self, String>;
}

/// Parses and validates a raw completion as `T`.
pub fn parse_reply<T: ModelReply>(raw: &str) -> Result<T, ParseError> {
    let malformed = |reason: String| ParseError::Malformed {
        mode: T::MODE,
        reason,
    };

    let payload =
        json_object_start(raw).ok_or_else(|| malformed("no JSON object found".to_string()))?;
    // Only the first complete value is read, trailing prose is never examined.
    let reply: T = serde_json::Deserializer::from_str(payload)
        .into_iter::<T>()
        .next()
        .ok_or_else(|| malformed("no JSON object found".to_string()))?
        .map_err(|e| malformed(e.to_string()))?;
    reply.validate().map_err(malformed)
}

/// Raw categories returned by the question generation prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSet {
    pub technical_questions: Vec<String>,
    pub behavioral_questions: Vec<String>,
    pub situational_questions: Vec<String>,
}

impl QuestionSet {
    /// Flattens the categories into the practice sequence: technical, then behavioral,
    /// then situational, each truncated to the requested count. Fails when nothing is left
    /// in the requested categories.
    pub fn into_sequence(self, mix: &QuestionMix) -> Result<Vec<InterviewQuestion>, ParseError> {
        let categories = [
            (QuestionCategory::Technical, self.technical_questions),
            (QuestionCategory::Behavioral, self.behavioral_questions),
            (QuestionCategory::Situational, self.situational_questions),
        ];

        let questions: Vec<InterviewQuestion> = categories
            .into_iter()
            .flat_map(|(category, questions)| {
                let take = mix.count_for(category) as usize;
                questions
                    .into_iter()
                    .take(take)
                    .map(move |question| (category, question))
            })
            .enumerate()
            .map(|(index, (category, question))| InterviewQuestion {
                index,
                category,
                question,
            })
            .collect();

        if questions.is_empty() {
            return Err(ParseError::Malformed {
                mode: Self::MODE,
                reason: "no interview questions in the requested categories".to_string(),
            });
        }
        Ok(questions)
    }
}

impl ModelReply for QuestionSet {
    const MODE: PromptMode = PromptMode::GenerateQuestions;

    fn validate(self) -> Result<Self, String> {
        let set = QuestionSet {
            technical_questions: clean_list(self.technical_questions),
            behavioral_questions: clean_list(self.behavioral_questions),
            situational_questions: clean_list(self.situational_questions),
        };
        if set.technical_questions.is_empty()
            && set.behavioral_questions.is_empty()
            && set.situational_questions.is_empty()
        {
            return Err("no interview questions in any category".to_string());
        }
        Ok(set)
    }
}

impl ModelReply for ResumeAnalysis {
    const MODE: PromptMode = PromptMode::AnalyzeResume;

    fn validate(self) -> Result<Self, String> {
        check_score("overall_score", self.overall_score)?;
        let strengths = require_list("strengths", self.strengths)?;
        let weaknesses = require_list("weaknesses", self.weaknesses)?;
        let suggestions = require_list("suggestions", self.suggestions)?;
        let formatting_feedback = self.formatting_feedback.trim().to_string();
        if formatting_feedback.is_empty() {
            return Err("formatting_feedback is empty".to_string());
        }

        Ok(ResumeAnalysis {
            overall_score: self.overall_score,
            strengths,
            weaknesses,
            suggestions,
            keywords_missing: dedup_keywords(self.keywords_missing),
            formatting_feedback,
            summary: self
                .summary
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

impl ModelReply for AnswerEvaluation {
    const MODE: PromptMode = PromptMode::EvaluateAnswer;

    fn validate(self) -> Result<Self, String> {
        check_score("score", self.score)?;
        let feedback = self.feedback.trim().to_string();
        if feedback.is_empty() {
            return Err("feedback is empty".to_string());
        }
        Ok(AnswerEvaluation {
            score: self.score,
            feedback,
            suggestions: clean_list(self.suggestions),
            strong_points: clean_list(self.strong_points),
        })
    }
}

fn check_score(field: &str, score: f32) -> Result<(), String> {
    if score.is_finite() && (0.0..=10.0).contains(&score) {
        Ok(())
    } else {
        Err(format!("{field} {score} is outside 0-10"))
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn require_list(field: &str, items: Vec<String>) -> Result<Vec<String>, String> {
    let items = clean_list(items);
    if items.is_empty() {
        Err(format!("{field} is empty"))
    } else {
        Ok(items)
    }
}

fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    clean_list(keywords)
        .into_iter()
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect()
}

/// Strips code fences and skips any leading prose up to the first `{`.
fn json_object_start(text: &str) -> Option<&str> {
    let text = strip_json_fences(text);
    text.find('{').map(|start| &text[start..])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYSIS_JSON: &str = r#"{
        "overall_score": 7.5,
        "strengths": ["Clear impact metrics", "Strong Rust background"],
        "weaknesses": ["No summary section"],
        "suggestions": ["Add a two-line summary", "Quantify the Kafka migration"],
        "keywords_missing": ["Kubernetes", "kubernetes", "CI/CD", " "],
        "formatting_feedback": "Consistent single-column layout.",
        "summary": "A solid backend resume."
    }"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_json_object_start_skips_leading_prose() {
        let input = "Sure! Here is the analysis:\n{\"a\": {\"b\": 1}}";
        assert_eq!(json_object_start(input), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(json_object_start("no json here"), None);
    }

    #[test]
    fn test_parse_ignores_prose_around_payload() {
        let input = format!("Here is the analysis:\n{ANALYSIS_JSON}\nLet me know if you need more.");
        let analysis: ResumeAnalysis = parse_reply(&input).unwrap();
        assert_eq!(analysis.overall_score, 7.5);
    }

    #[test]
    fn test_parse_ignores_braces_in_trailing_prose() {
        let input = format!("{ANALYSIS_JSON} (note: keywords use {{lowercase}} matching)");
        let analysis: ResumeAnalysis = parse_reply(&input).unwrap();
        assert_eq!(analysis.keywords_missing, vec!["Kubernetes", "CI/CD"]);
    }

    #[test]
    fn test_unterminated_object_is_malformed() {
        assert!(parse_reply::<ResumeAnalysis>("} backwards {").is_err());
    }

    #[test]
    fn test_parse_analysis_recovers_fields() {
        let analysis: ResumeAnalysis = parse_reply(ANALYSIS_JSON).unwrap();
        assert_eq!(analysis.overall_score, 7.5);
        assert_eq!(
            analysis.strengths,
            vec!["Clear impact metrics", "Strong Rust background"]
        );
        assert_eq!(analysis.weaknesses, vec!["No summary section"]);
        assert_eq!(analysis.suggestions.len(), 2);
        assert_eq!(analysis.keywords_missing, vec!["Kubernetes", "CI/CD"]);
        assert_eq!(analysis.formatting_feedback, "Consistent single-column layout.");
        assert_eq!(analysis.summary.as_deref(), Some("A solid backend resume."));
    }

    #[test]
    fn test_parse_analysis_inside_fences() {
        let fenced = format!("```json\n{ANALYSIS_JSON}\n```");
        let analysis: ResumeAnalysis = parse_reply(&fenced).unwrap();
        assert_eq!(analysis.overall_score, 7.5);
    }

    #[test]
    fn test_summary_is_optional() {
        let json = r#"{"overall_score": 6, "strengths": ["a"], "weaknesses": ["b"],
            "suggestions": ["c"], "keywords_missing": [], "formatting_feedback": "ok"}"#;
        let analysis: ResumeAnalysis = parse_reply(json).unwrap();
        assert_eq!(analysis.summary, None);
        assert!(analysis.keywords_missing.is_empty());
    }

    #[test]
    fn test_missing_section_is_malformed() {
        let json = r#"{"overall_score": 6, "strengths": ["a"], "weaknesses": ["b"],
            "keywords_missing": [], "formatting_feedback": "ok"}"#;
        let err = parse_reply::<ResumeAnalysis>(json).unwrap_err();
        let ParseError::Malformed { mode, reason } = err;
        assert_eq!(mode, PromptMode::AnalyzeResume);
        assert!(reason.contains("suggestions"), "{reason}");
    }

    #[test]
    fn test_empty_strengths_are_malformed() {
        let json = r#"{"overall_score": 6, "strengths": ["  "], "weaknesses": ["b"],
            "suggestions": ["c"], "keywords_missing": [], "formatting_feedback": "ok"}"#;
        assert!(parse_reply::<ResumeAnalysis>(json).is_err());
    }

    #[test]
    fn test_out_of_range_score_is_malformed() {
        let json = r#"{"overall_score": 42, "strengths": ["a"], "weaknesses": ["b"],
            "suggestions": ["c"], "keywords_missing": [], "formatting_feedback": "ok"}"#;
        let err = parse_reply::<ResumeAnalysis>(json).unwrap_err();
        assert!(err.to_string().contains("outside 0-10"));
    }

    #[test]
    fn test_plain_text_reply_is_malformed() {
        let err = parse_reply::<ResumeAnalysis>("The resume looks great overall!").unwrap_err();
        assert!(err.to_string().contains("no JSON object found"));
    }

    #[test]
    fn test_question_sequence_is_ordered_and_indexed() {
        let json = r#"{
            "technical_questions": ["How does Tokio schedule tasks?", "Explain Send vs Sync."],
            "behavioral_questions": ["Describe a conflict on your team."],
            "situational_questions": ["What if production is down on Friday night?"]
        }"#;
        let set: QuestionSet = parse_reply(json).unwrap();
        let questions = set.into_sequence(&QuestionMix::default()).unwrap();
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].index, 0);
        assert_eq!(questions[0].category, QuestionCategory::Technical);
        assert_eq!(questions[2].category, QuestionCategory::Behavioral);
        assert_eq!(questions[3].index, 3);
        assert_eq!(questions[3].category, QuestionCategory::Situational);
    }

    #[test]
    fn test_question_sequence_truncates_to_mix() {
        let json = r#"{
            "technical_questions": ["t1", "t2", "t3"],
            "behavioral_questions": ["b1", "b2"],
            "situational_questions": ["s1"]
        }"#;
        let mix = QuestionMix {
            technical: 1,
            behavioral: 2,
            situational: 0,
        };
        let questions = parse_reply::<QuestionSet>(json)
            .unwrap()
            .into_sequence(&mix)
            .unwrap();
        let texts: Vec<&str> = questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["t1", "b1", "b2"]);
    }

    #[test]
    fn test_questions_only_in_unrequested_categories_are_malformed() {
        let json = r#"{"technical_questions": [], "behavioral_questions": ["b1"],
            "situational_questions": []}"#;
        let mix = QuestionMix {
            technical: 5,
            behavioral: 0,
            situational: 0,
        };
        let err = parse_reply::<QuestionSet>(json)
            .unwrap()
            .into_sequence(&mix)
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::Malformed {
                mode: PromptMode::GenerateQuestions,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_question_category_is_malformed() {
        let json = r#"{"technical_questions": ["t1"], "behavioral_questions": ["b1"]}"#;
        assert!(parse_reply::<QuestionSet>(json).is_err());
    }

    #[test]
    fn test_all_blank_questions_are_malformed() {
        let json = r#"{"technical_questions": [""], "behavioral_questions": [],
            "situational_questions": ["   "]}"#;
        assert!(parse_reply::<QuestionSet>(json).is_err());
    }

    #[test]
    fn test_parse_evaluation() {
        let json = r#"{"score": 8, "feedback": "Good use of STAR.",
            "suggestions": ["Mention the outcome in numbers"]}"#;
        let evaluation: AnswerEvaluation = parse_reply(json).unwrap();
        assert_eq!(evaluation.score, 8.0);
        assert_eq!(evaluation.feedback, "Good use of STAR.");
        assert_eq!(evaluation.suggestions, vec!["Mention the outcome in numbers"]);
        assert!(evaluation.strong_points.is_empty());
    }

    #[test]
    fn test_evaluation_without_feedback_is_malformed() {
        let json = r#"{"score": 8, "feedback": "", "suggestions": []}"#;
        let err = parse_reply::<AnswerEvaluation>(json).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Malformed {
                mode: PromptMode::EvaluateAnswer,
                ..
            }
        ));
    }
}
