//! Analysis pipeline: composes prompt building, inference, and parsing per operation.
//!
//! Flow: build_prompt → InferenceClient::complete → parse_reply.
//! Stateless: nothing is cached, every call re-invokes the model.

use tracing::info;

use crate::analysis::models::{AnswerEvaluation, InterviewQuestion, QuestionMix, ResumeAnalysis};
use crate::analysis::parser::{parse_reply, ModelReply, QuestionSet};
use crate::analysis::prompt_builder::{build_prompt, PromptRequest};
use crate::errors::AppError;
use crate::llm_client::{CompletionRequest, InferenceClient};

/// Scores a resume and collects strengths, weaknesses, and suggestions.
pub async fn analyze_resume(
    llm: &dyn InferenceClient,
    model: &str,
    resume_text: &str,
) -> Result<ResumeAnalysis, AppError> {
    let analysis: ResumeAnalysis =
        run_prompt(llm, model, PromptRequest::AnalyzeResume { resume_text }).await?;
    info!(
        "Resume analyzed: score={}, strengths={}, weaknesses={}",
        analysis.overall_score,
        analysis.strengths.len(),
        analysis.weaknesses.len()
    );
    Ok(analysis)
}

/// Generates the ordered interview practice sequence for a resume.
pub async fn generate_questions(
    llm: &dyn InferenceClient,
    model: &str,
    resume_text: &str,
    mix: QuestionMix,
) -> Result<Vec<InterviewQuestion>, AppError> {
    mix.validate().map_err(AppError::Validation)?;
    let set: QuestionSet =
        run_prompt(llm, model, PromptRequest::GenerateQuestions { resume_text, mix }).await?;
    let questions = set.into_sequence(&mix)?;
    info!("Generated {} interview questions", questions.len());
    Ok(questions)
}

/// Evaluates one interview answer.
pub async fn evaluate_answer(
    llm: &dyn InferenceClient,
    model: &str,
    question: &str,
    answer: &str,
) -> Result<AnswerEvaluation, AppError> {
    let evaluation: AnswerEvaluation =
        run_prompt(llm, model, PromptRequest::EvaluateAnswer { question, answer }).await?;
    info!("Answer evaluated: score={}", evaluation.score);
    Ok(evaluation)
}

async fn run_prompt<T: ModelReply>(
    llm: &dyn InferenceClient,
    model: &str,
    request: PromptRequest<'_>,
) -> Result<T, AppError> {
    let prompt = build_prompt(&request)?;
    let completion = llm
        .complete(&CompletionRequest {
            model,
            system: &prompt.system,
            prompt: &prompt.user,
            temperature: prompt.mode.temperature(),
            max_tokens: prompt.mode.max_tokens(),
        })
        .await?;
    Ok(parse_reply::<T>(&completion)?)
}
