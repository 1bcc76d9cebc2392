// All LLM prompt constants for the Analysis module.
// Placeholders in braces are replaced by the prompt builder before sending.

/// System prompt for resume analysis.
pub const ANALYSIS_SYSTEM: &str =
    "You are an expert resume reviewer and career coach. \
    Be specific, actionable, and honest in your feedback.";

/// Resume analysis prompt template. Replace `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this resume and provide detailed feedback.

Resume Content:
{resume_text}

Provide your analysis in the following JSON format (respond ONLY with valid JSON, no other text):
{
  "overall_score": <number between 1-10>,
  "strengths": ["<strength 1>", "<strength 2>", "<strength 3>"],
  "weaknesses": ["<weakness 1>", "<weakness 2>", "<weakness 3>"],
  "suggestions": ["<suggestion 1>", "<suggestion 2>", "<suggestion 3>", "<suggestion 4>", "<suggestion 5>"],
  "keywords_missing": ["<keyword 1>", "<keyword 2>", "<keyword 3>"],
  "formatting_feedback": "<brief comment on resume formatting and structure>",
  "summary": "<2-3 sentence overall assessment>"
}

Respond with ONLY the JSON object, no markdown formatting."#;

/// System prompt for interview question generation.
pub const QUESTIONS_SYSTEM: &str =
    "You are an expert interviewer. \
    Make questions specific to the candidate's actual experience and skills.";

/// Question generation prompt template.
/// Replace `{resume_text}`, `{technical}`, `{behavioral}`, `{situational}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Based on this resume, generate relevant interview questions.

Resume Content:
{resume_text}

Generate exactly {technical} technical, {behavioral} behavioral and {situational} situational questions.
Use an empty array for a category that asks for 0 questions.

Return them in the following JSON format (respond ONLY with valid JSON, no other text):
{
  "technical_questions": ["<question 1>", "<question 2>"],
  "behavioral_questions": ["<question 1>", "<question 2>"],
  "situational_questions": ["<question 1>", "<question 2>"]
}

Make questions specific to their actual experience and skills mentioned in the resume. Respond with ONLY the JSON object."#;

/// System prompt for interview answer evaluation.
pub const EVALUATION_SYSTEM: &str =
    "You are an expert interviewer evaluating a candidate's answer. \
    Be constructive and concrete.";

/// Answer evaluation prompt template. Replace `{question}` and `{answer}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate the candidate's answer to the interview question below.

Question: {question}
Candidate's Answer: {answer}

Evaluate the answer and provide feedback in JSON format (respond ONLY with valid JSON):
{
  "score": <number between 1-10>,
  "feedback": "<detailed feedback on the answer>",
  "suggestions": ["<suggestion 1>", "<suggestion 2>"],
  "strong_points": ["<strong point 1>", "<strong point 2>"]
}

Respond with ONLY the JSON object."#;
