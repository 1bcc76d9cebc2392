use serde::{Deserialize, Serialize};

/// Upper bound on any single question category, keeps prompts and replies bounded.
pub const MAX_QUESTIONS_PER_CATEGORY: u32 = 20;

/// Scored, categorized feedback for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// 0 – 10
    pub overall_score: f32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    /// De-duplicated case-insensitively, first occurrence wins.
    pub keywords_missing: Vec<String>,
    pub formatting_feedback: String,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Technical,
    Behavioral,
    Situational,
}

/// One generated interview question and its position in the practice sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewQuestion {
    pub index: usize,
    pub category: QuestionCategory,
    pub question: String,
}

/// How many questions to request per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionMix {
    pub technical: u32,
    pub behavioral: u32,
    pub situational: u32,
}

impl Default for QuestionMix {
    fn default() -> Self {
        Self {
            technical: 5,
            behavioral: 5,
            situational: 3,
        }
    }
}

impl QuestionMix {
    pub fn total(&self) -> u32 {
        self.technical + self.behavioral + self.situational
    }

    pub fn count_for(&self, category: QuestionCategory) -> u32 {
        match category {
            QuestionCategory::Technical => self.technical,
            QuestionCategory::Behavioral => self.behavioral,
            QuestionCategory::Situational => self.situational,
        }
    }

    /// Applies per-request overrides on top of this mix.
    pub fn with_overrides(
        self,
        technical: Option<u32>,
        behavioral: Option<u32>,
        situational: Option<u32>,
    ) -> Self {
        Self {
            technical: technical.unwrap_or(self.technical),
            behavioral: behavioral.unwrap_or(self.behavioral),
            situational: situational.unwrap_or(self.situational),
        }
    }

    /// Every category is capped; at least one question overall.
    pub fn validate(&self) -> Result<(), String> {
        for (name, count) in [
            ("technical", self.technical),
            ("behavioral", self.behavioral),
            ("situational", self.situational),
        ] {
            if count > MAX_QUESTIONS_PER_CATEGORY {
                return Err(format!(
                    "{name} question count {count} exceeds the maximum of {MAX_QUESTIONS_PER_CATEGORY}"
                ));
            }
        }
        if self.total() == 0 {
            return Err("at least one interview question must be requested".to_string());
        }
        Ok(())
    }
}

/// Feedback on one interview answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    /// 0 – 10
    pub score: f32,
    pub feedback: String,
    /// Improvement tips.
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub strong_points: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mix_matches_five_five_three() {
        let mix = QuestionMix::default();
        assert_eq!(mix.total(), 13);
        assert!(mix.validate().is_ok());
    }

    #[test]
    fn test_overrides_only_replace_given_counts() {
        let mix = QuestionMix::default().with_overrides(Some(2), None, Some(0));
        assert_eq!(
            mix,
            QuestionMix {
                technical: 2,
                behavioral: 5,
                situational: 0
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_total_and_oversized_category() {
        let empty = QuestionMix {
            technical: 0,
            behavioral: 0,
            situational: 0,
        };
        assert!(empty.validate().is_err());

        let huge = QuestionMix::default().with_overrides(Some(21), None, None);
        assert!(huge.validate().unwrap_err().contains("technical"));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&QuestionCategory::Situational).unwrap();
        assert_eq!(json, r#""situational""#);
    }
}
