use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        Path, Request, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::{extension_of, AudioStore, TempUpload};
use crate::translate::TranslationResult;

#[derive(Debug, Deserialize)]
pub struct TextTranslationRequest {
    #[serde(default, alias = "text")]
    pub german: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchTranslationRequest {
    #[serde(default, alias = "texts")]
    pub german: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchTranslationResponse {
    pub results: Vec<TranslationResult>,
}

#[derive(Debug, Serialize)]
pub struct SpeechTranslationResponse {
    pub german_text: String,
    pub english_text: String,
    pub marathi_text: String,
    pub marathi_audio_url: String,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "running",
        "message": "Multilingual Speech Translation API",
        "version": env!("CARGO_PKG_VERSION"),
        "pipeline": "German → English → Marathi"
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let models = state.translation.as_ref().map(|pipeline| {
        json!({
            "first_hop": pipeline.first_hop().model().summary(),
            "second_hop": pipeline.second_hop().model().summary(),
        })
    });

    Json(json!({
        "status": "healthy",
        "translation_model": state.translation.is_some(),
        "speech_model": state.speech.is_some(),
        "models": models,
    }))
}

pub async fn translate_text(
    State(state): State<AppState>,
    payload: Result<Json<TextTranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResult>, AppError> {
    let translation = state
        .translation
        .clone()
        .ok_or(AppError::ServiceUnavailable("Translation model not loaded"))?;
    let Json(request) = payload.map_err(|e| AppError::validation(e.body_text()))?;

    if request.german.trim().is_empty() {
        return Err(AppError::validation("German text cannot be empty"));
    }

    let result = translation
        .translate(&request.german)
        .await
        .map_err(AppError::Translation)?;
    Ok(Json(result))
}

pub async fn translate_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchTranslationRequest>, JsonRejection>,
) -> Result<Json<BatchTranslationResponse>, AppError> {
    let translation = state
        .translation
        .clone()
        .ok_or(AppError::ServiceUnavailable("Translation model not loaded"))?;
    let Json(request) = payload.map_err(|e| AppError::validation(e.body_text()))?;

    if request.german.is_empty() {
        return Err(AppError::validation("German text list cannot be empty"));
    }
    if let Some(idx) = request.german.iter().position(|t| t.trim().is_empty()) {
        return Err(AppError::validation(format!("German text at index {} is empty", idx)));
    }

    let results = translation
        .translate_batch(request.german)
        .await
        .map_err(AppError::Translation)?;
    Ok(Json(BatchTranslationResponse { results }))
}

/// German speech in, Marathi text and speech out
pub async fn speech_translate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SpeechTranslationResponse>, AppError> {
    let (translation, speech) = match (&state.translation, &state.speech) {
        (Some(t), Some(s)) => (t.clone(), s.clone()),
        _ => return Err(AppError::ServiceUnavailable("Models not loaded")),
    };
    let mut multipart = multipart.map_err(|e| AppError::validation(e.body_text()))?;

    // Dropping `upload` on any return below deletes the temp file
    let upload = receive_upload(&state, &mut multipart).await?;

    let _permit = state
        .acquire_speech_permit()
        .await
        .map_err(|_| AppError::ServiceUnavailable("Server is shutting down"))?;
    let speech_config = &state.config.speech_config;

    info!("Transcribing uploaded audio ({} bytes)", upload.len());
    let transcription = speech
        .transcribe(upload.path(), &speech_config.transcription_language)
        .await
        .map_err(AppError::Transcription)?;

    if transcription.is_blank() {
        return Err(AppError::validation(
            "Could not transcribe audio. Please ensure audio contains clear German speech.",
        ));
    }
    debug!("Transcribed ({}): {}", transcription.language, transcription.text);

    let result = translation
        .translate(&transcription.text)
        .await
        .map_err(AppError::Translation)?;
    debug!("English: {} / Marathi: {}", result.intermediate, result.target);

    let audio = speech
        .text_to_audio(&result.target, &speech_config.synthesis_language, None)
        .await
        .map_err(AppError::Synthesis)?;
    info!("Audio generated: {}", audio.path.display());

    Ok(Json(SpeechTranslationResponse {
        german_text: result.source,
        english_text: result.intermediate,
        marathi_text: result.target,
        marathi_audio_url: AudioStore::url_for(&audio.file_name),
    }))
}

/// Stream the first file field to a temp upload, enforcing the extension
/// allow-list and the size cap before anything reaches a model.
async fn receive_upload(state: &AppState, multipart: &mut Multipart) -> Result<TempUpload, AppError> {
    let system = &state.config.system_config;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        if !matches!(field.name(), Some("audio_file") | Some("file")) {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("No file provided"))?;

        let ext = extension_of(&file_name).unwrap_or_default();
        let allowed = system
            .allowed_extensions
            .iter()
            .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext));
        if !allowed {
            let allowed_list: Vec<String> = system
                .allowed_extensions
                .iter()
                .map(|a| format!(".{}", a.trim_start_matches('.')))
                .collect();
            return Err(AppError::validation(format!(
                "File type .{} not supported. Allowed: {}",
                ext,
                allowed_list.join(", ")
            )));
        }

        let mut upload = state.uploads.create(&file_name).await?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?
        {
            if upload.len() + chunk.len() > system.max_upload_bytes {
                return Err(AppError::validation(format!(
                    "File too large. Max size: {:.1} MB",
                    system.max_upload_bytes as f64 / (1024.0 * 1024.0)
                )));
            }
            upload.write_chunk(&chunk).await?;
        }
        upload.finish().await?;
        return Ok(upload);
    }

    Err(AppError::validation("No file provided"))
}

/// Serve a generated file; `ServeFile` streams it and answers range and
/// conditional requests.
pub async fn get_audio(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    request: Request,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("Audio file not found".to_string());
    let path = state.audio.resolve(&file_name).ok_or_else(not_found)?;

    let is_file = tokio::fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(not_found());
    }

    let response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    if response.status() == StatusCode::NOT_FOUND {
        return Err(not_found());
    }

    let mut response = response.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    if let Ok(disposition) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name)) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok(response)
}
