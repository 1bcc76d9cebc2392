//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::models::{AnswerEvaluation, InterviewQuestion, ResumeAnalysis};
use crate::analysis::service::{analyze_resume, evaluate_answer, generate_questions};
use crate::errors::AppError;
use crate::extraction::{extract_text, ResumeDocument};
use crate::state::AppState;

/// Extracted resumes shorter than this are rejected before analysis.
const MIN_RESUME_CHARS: usize = 50;
/// Characters of extracted text echoed back in `resume_preview`.
const PREVIEW_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub filename: String,
    pub analysis: ResumeAnalysis,
    pub resume_preview: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub resume_text: String,
    pub technical: Option<u32>,
    pub behavioral: Option<u32>,
    pub situational: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub success: bool,
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateAnswerRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct EvaluateAnswerResponse {
    pub success: bool,
    pub evaluation: AnswerEvaluation,
}

/// A multipart upload: the `file` part plus any optional question-count fields.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    technical: Option<u32>,
    behavioral: Option<u32>,
    situational: Option<u32>,
}

#[derive(Debug)]
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Accepts a resume as multipart field `file` (.pdf, .docx, .txt), extracts its text,
/// and returns the model's analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let (filename, resume_text) = extract_upload(form.file).await?;

    if resume_text.trim().chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(
            "Resume appears to be empty or too short".to_string(),
        ));
    }

    info!("Analyzing resume {filename}");
    let analysis = analyze_resume(state.llm.as_ref(), &state.config.groq_model, &resume_text).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        filename,
        analysis,
        resume_preview: preview(&resume_text),
    }))
}

/// POST /generate-questions
///
/// Generates the interview practice sequence from plain resume text.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    payload: Result<Json<GenerateQuestionsRequest>, JsonRejection>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let Json(request) = payload?;
    let mix = state.config.question_mix.with_overrides(
        request.technical,
        request.behavioral,
        request.situational,
    );
    let questions = generate_questions(
        state.llm.as_ref(),
        &state.config.groq_model,
        &request.resume_text,
        mix,
    )
    .await?;

    Ok(Json(GenerateQuestionsResponse {
        success: true,
        questions,
    }))
}

/// POST /generate-questions/upload
///
/// Same as `/generate-questions`, but reads the resume from an uploaded file.
pub async fn handle_generate_questions_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let mix = state
        .config
        .question_mix
        .with_overrides(form.technical, form.behavioral, form.situational);
    let (filename, resume_text) = extract_upload(form.file).await?;

    info!("Generating interview questions for {filename}");
    let questions =
        generate_questions(state.llm.as_ref(), &state.config.groq_model, &resume_text, mix)
            .await?;

    Ok(Json(GenerateQuestionsResponse {
        success: true,
        questions,
    }))
}

/// POST /evaluate-answer
///
/// Evaluates a candidate's answer to one interview question.
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateAnswerRequest>, JsonRejection>,
) -> Result<Json<EvaluateAnswerResponse>, AppError> {
    let Json(request) = payload?;
    let evaluation = evaluate_answer(
        state.llm.as_ref(),
        &state.config.groq_model,
        &request.question,
        &request.answer,
    )
    .await?;

    Ok(Json(EvaluateAnswerResponse {
        success: true,
        evaluation,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes,
                });
            }
            "technical" | "behavioral" | "situational" => {
                let raw = field.text().await?;
                let count = parse_count(&name, &raw)?;
                match name.as_str() {
                    "technical" => form.technical = count,
                    "behavioral" => form.behavioral = count,
                    _ => form.situational = count,
                }
            }
            // Unknown parts are drained and ignored
            _ => {
                field.bytes().await?;
            }
        }
    }

    Ok(form)
}

fn parse_count(name: &str, raw: &str) -> Result<Option<u32>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("{name} must be a non-negative integer")))
}

/// Builds the resume document from the upload and extracts its text.
async fn extract_upload(file: Option<UploadedFile>) -> Result<(String, String), AppError> {
    let file = file.ok_or_else(|| {
        AppError::Validation("multipart field 'file' is required".to_string())
    })?;

    if file.bytes.is_empty() {
        return Err(AppError::EmptyInput(format!(
            "uploaded file '{}' is empty",
            file.filename
        )));
    }

    let document = ResumeDocument::new(file.filename, file.content_type.as_deref(), file.bytes)?;
    let text = extract_text(&document).await?;
    Ok((document.filename, text))
}

fn preview(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
