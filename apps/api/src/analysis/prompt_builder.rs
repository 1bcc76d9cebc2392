//! Prompt Builder: turns a mode plus its text inputs into the prompt sent to the model.
//!
//! Pure and deterministic: the same request always yields the same `Prompt`.

use thiserror::Error;

use crate::analysis::models::QuestionMix;
use crate::analysis::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM,
    QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM,
};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

#[derive(Debug, Error, PartialEq)]
pub enum PromptError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    AnalyzeResume,
    GenerateQuestions,
    EvaluateAnswer,
}

impl PromptMode {
    pub fn temperature(self) -> f32 {
        match self {
            PromptMode::GenerateQuestions => 0.8,
            PromptMode::AnalyzeResume | PromptMode::EvaluateAnswer => 0.7,
        }
    }

    pub fn max_tokens(self) -> u32 {
        match self {
            PromptMode::AnalyzeResume | PromptMode::GenerateQuestions => 2000,
            PromptMode::EvaluateAnswer => 1500,
        }
    }
}

impl std::fmt::Display for PromptMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PromptMode::AnalyzeResume => "analyze-resume",
            PromptMode::GenerateQuestions => "generate-questions",
            PromptMode::EvaluateAnswer => "evaluate-answer",
        };
        f.write_str(name)
    }
}

/// Inputs for one prompt, tagged by mode.
#[derive(Debug, Clone, Copy)]
pub enum PromptRequest<'a> {
    AnalyzeResume {
        resume_text: &'a str,
    },
    GenerateQuestions {
        resume_text: &'a str,
        mix: QuestionMix,
    },
    EvaluateAnswer {
        question: &'a str,
        answer: &'a str,
    },
}

impl PromptRequest<'_> {
    pub fn mode(&self) -> PromptMode {
        match self {
            PromptRequest::AnalyzeResume { .. } => PromptMode::AnalyzeResume,
            PromptRequest::GenerateQuestions { .. } => PromptMode::GenerateQuestions,
            PromptRequest::EvaluateAnswer { .. } => PromptMode::EvaluateAnswer,
        }
    }
}

/// A ready-to-send prompt: system message plus user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub mode: PromptMode,
    pub system: String,
    pub user: String,
}

pub fn build_prompt(request: &PromptRequest<'_>) -> Result<Prompt, PromptError> {
    let mode = request.mode();
    let (system, user) = match *request {
        PromptRequest::AnalyzeResume { resume_text } => {
            let resume_text = require_text("resume_text", resume_text)?;
            (
                ANALYSIS_SYSTEM,
                fill_template(ANALYSIS_PROMPT_TEMPLATE, &[("resume_text", resume_text)]),
            )
        }
        PromptRequest::GenerateQuestions { resume_text, mix } => {
            let resume_text = require_text("resume_text", resume_text)?;
            let technical = mix.technical.to_string();
            let behavioral = mix.behavioral.to_string();
            let situational = mix.situational.to_string();
            (
                QUESTIONS_SYSTEM,
                fill_template(
                    QUESTIONS_PROMPT_TEMPLATE,
                    &[
                        ("resume_text", resume_text),
                        ("technical", technical.as_str()),
                        ("behavioral", behavioral.as_str()),
                        ("situational", situational.as_str()),
                    ],
                ),
            )
        }
        PromptRequest::EvaluateAnswer { question, answer } => {
            let question = require_text("question", question)?;
            let answer = require_text("answer", answer)?;
            (
                EVALUATION_SYSTEM,
                fill_template(
                    EVALUATION_PROMPT_TEMPLATE,
                    &[("question", question), ("answer", answer)],
                ),
            )
        }
    };

    Ok(Prompt {
        mode,
        system: format!("{system} {JSON_ONLY_SYSTEM}"),
        user,
    })
}

fn require_text<'a>(field: &'static str, text: &'a str) -> Result<&'a str, PromptError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(PromptError::EmptyInput(field))
    } else {
        Ok(trimmed)
    }
}

/// Replaces `{key}` placeholders in a single left-to-right pass, so braces inside
/// substituted values are never expanded again.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    'scan: while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        for &(key, value) in values {
            if let Some(after) = tail.strip_prefix(key).and_then(|t| t.strip_prefix('}')) {
                out.push_str(value);
                rest = after;
                continue 'scan;
            }
        }
        out.push('{');
        rest = tail;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\nSenior Rust Engineer at Acme, 2019-2024\nSkills: Rust, Tokio, Kafka";

    #[test]
    fn test_analysis_prompt_embeds_resume_and_schema() {
        let prompt = build_prompt(&PromptRequest::AnalyzeResume {
            resume_text: RESUME,
        })
        .unwrap();
        assert_eq!(prompt.mode, PromptMode::AnalyzeResume);
        assert!(prompt.user.contains("Senior Rust Engineer at Acme"));
        for field in [
            "\"overall_score\"",
            "\"strengths\"",
            "\"weaknesses\"",
            "\"suggestions\"",
            "\"keywords_missing\"",
            "\"formatting_feedback\"",
        ] {
            assert!(prompt.user.contains(field), "missing {field}");
        }
        assert!(prompt.system.contains("valid JSON only"));
        assert!(!prompt.user.contains("{resume_text}"));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let request = PromptRequest::GenerateQuestions {
            resume_text: RESUME,
            mix: QuestionMix::default(),
        };
        assert_eq!(build_prompt(&request).unwrap(), build_prompt(&request).unwrap());
    }

    #[test]
    fn test_questions_prompt_states_requested_counts() {
        let prompt = build_prompt(&PromptRequest::GenerateQuestions {
            resume_text: RESUME,
            mix: QuestionMix {
                technical: 4,
                behavioral: 2,
                situational: 1,
            },
        })
        .unwrap();
        assert!(prompt
            .user
            .contains("exactly 4 technical, 2 behavioral and 1 situational"));
        assert!(prompt.user.contains("\"situational_questions\""));
    }

    #[test]
    fn test_evaluation_prompt_contains_question_and_answer() {
        let prompt = build_prompt(&PromptRequest::EvaluateAnswer {
            question: "Tell me about a production incident you led.",
            answer: "At Acme I coordinated the rollback of a bad Kafka deploy.",
        })
        .unwrap();
        assert!(prompt
            .user
            .contains("Question: Tell me about a production incident you led."));
        assert!(prompt
            .user
            .contains("Candidate's Answer: At Acme I coordinated the rollback"));
        assert_eq!(prompt.mode.max_tokens(), 1500);
    }

    #[test]
    fn test_blank_inputs_are_rejected() {
        assert_eq!(
            build_prompt(&PromptRequest::AnalyzeResume { resume_text: " \n\t" }),
            Err(PromptError::EmptyInput("resume_text"))
        );
        assert_eq!(
            build_prompt(&PromptRequest::EvaluateAnswer {
                question: "Why Rust?",
                answer: "   ",
            }),
            Err(PromptError::EmptyInput("answer"))
        );
        assert_eq!(
            build_prompt(&PromptRequest::EvaluateAnswer {
                question: "",
                answer: "Because of the borrow checker.",
            }),
            Err(PromptError::EmptyInput("question"))
        );
    }

    #[test]
    fn test_placeholders_inside_user_text_are_not_expanded() {
        let prompt = build_prompt(&PromptRequest::EvaluateAnswer {
            question: "What does {answer} mean in a template?",
            answer: "A placeholder.",
        })
        .unwrap();
        assert!(prompt.user.contains("What does {answer} mean in a template?"));
    }

    #[test]
    fn test_fill_template_leaves_unknown_braces() {
        let filled = fill_template("{ \"a\": {x} } {y}", &[("x", "1")]);
        assert_eq!(filled, "{ \"a\": 1 } {y}");
    }

    #[test]
    fn test_generation_parameters_per_mode() {
        assert_eq!(PromptMode::AnalyzeResume.temperature(), 0.7);
        assert_eq!(PromptMode::GenerateQuestions.temperature(), 0.8);
        assert_eq!(PromptMode::EvaluateAnswer.temperature(), 0.7);
        assert_eq!(PromptMode::GenerateQuestions.max_tokens(), 2000);
        assert_eq!(PromptMode::GenerateQuestions.to_string(), "generate-questions");
    }
}
