//! Analysis endpoints.
//!
//! The three single-modality endpoints fail hard on their modality's error.
//! The multimodal endpoint never does: partial failures are collected into
//! the response's `errors` array and fusion runs over whatever survived.

use axum::{Extension, extract::State, response::Json};

use parkiq_core::Modality;
use parkiq_models::ModalityInput;

use crate::runtime::error::{RequestIdExtension, RuntimeError, RuntimeResult};
use crate::runtime::orchestrator::ModalityFailure;
use crate::runtime::service::AnalysisRuntime;
use crate::runtime::types::{
    DatscanAnalysisRequest, ModalityAnalysisResponse, MultimodalAnalysisRequest,
    MultimodalAnalysisResponse, SpiralAnalysisRequest, VoiceAnalysisRequest,
};
use crate::runtime::upload::{SpooledUpload, decode_base64_payload};

/// POST /analyze/voice - analyze a sustained-vowel recording
#[utoipa::path(
    post,
    path = "/analyze/voice",
    request_body = VoiceAnalysisRequest,
    responses(
        (status = 200, description = "Voice analysis result", body = ModalityAnalysisResponse),
        (status = 400, description = "Malformed payload"),
        (status = 422, description = "Analysis failed"),
        (status = 503, description = "Voice model not loaded")
    )
)]
pub async fn analyze_voice(
    State(runtime): State<AnalysisRuntime>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Json(request): Json<VoiceAnalysisRequest>,
) -> RuntimeResult<Json<ModalityAnalysisResponse>> {
    let upload = SpooledUpload::from_base64(&request.audio_data)
        .map_err(|err| RuntimeError::validation(err.to_string(), request_id.clone()))?;

    let result = runtime
        .orchestrator
        .analyze_single(ModalityInput::Voice {
            audio_path: upload.path().to_path_buf(),
        })
        .await
        .map_err(|err| RuntimeError::from_model_error(err, request_id))?;

    Ok(Json(ModalityAnalysisResponse::from_result(&result)))
}

/// POST /analyze/datscan - analyze a DaTscan image
#[utoipa::path(
    post,
    path = "/analyze/datscan",
    request_body = DatscanAnalysisRequest,
    responses(
        (status = 200, description = "DaTscan analysis result", body = ModalityAnalysisResponse),
        (status = 400, description = "Malformed payload"),
        (status = 422, description = "Analysis failed"),
        (status = 503, description = "DaTscan model not loaded")
    )
)]
pub async fn analyze_datscan(
    State(runtime): State<AnalysisRuntime>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Json(request): Json<DatscanAnalysisRequest>,
) -> RuntimeResult<Json<ModalityAnalysisResponse>> {
    let upload = SpooledUpload::from_base64(&request.image_data)
        .map_err(|err| RuntimeError::validation(err.to_string(), request_id.clone()))?;

    let result = runtime
        .orchestrator
        .analyze_single(ModalityInput::Datscan {
            image_path: upload.path().to_path_buf(),
        })
        .await
        .map_err(|err| RuntimeError::from_model_error(err, request_id))?;

    Ok(Json(ModalityAnalysisResponse::from_result(&result)))
}

/// POST /analyze/spiral - analyze a spiral drawing
#[utoipa::path(
    post,
    path = "/analyze/spiral",
    request_body = SpiralAnalysisRequest,
    responses(
        (status = 200, description = "Spiral analysis result", body = ModalityAnalysisResponse),
        (status = 400, description = "Malformed payload"),
        (status = 422, description = "Analysis failed"),
        (status = 503, description = "Spiral model not loaded")
    )
)]
pub async fn analyze_spiral(
    State(runtime): State<AnalysisRuntime>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Json(request): Json<SpiralAnalysisRequest>,
) -> RuntimeResult<Json<ModalityAnalysisResponse>> {
    let image = decode_base64_payload(&request.spiral_data)
        .map_err(|err| RuntimeError::validation(err.to_string(), request_id.clone()))?;

    let result = runtime
        .orchestrator
        .analyze_single(ModalityInput::Spiral {
            image,
            drawing_time: request.drawing_time,
        })
        .await
        .map_err(|err| RuntimeError::from_model_error(err, request_id))?;

    Ok(Json(ModalityAnalysisResponse::from_result(&result)))
}

/// POST /analyze/multimodal - fused analysis over any payload subset
#[utoipa::path(
    post,
    path = "/analyze/multimodal",
    request_body = MultimodalAnalysisRequest,
    responses(
        (status = 200, description = "Fused verdict, possibly degraded", body = MultimodalAnalysisResponse),
        (status = 400, description = "No modality payload provided")
    )
)]
pub async fn analyze_multimodal(
    State(runtime): State<AnalysisRuntime>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Json(request): Json<MultimodalAnalysisRequest>,
) -> RuntimeResult<Json<MultimodalAnalysisResponse>> {
    if request.is_empty() {
        return Err(RuntimeError::validation(
            "at least one modality payload is required",
            request_id,
        ));
    }

    // Spool guards must outlive the analysis; the paths handed to the
    // orchestrator point into them. Dropped (and deleted) on every exit.
    let mut spools: Vec<SpooledUpload> = Vec::new();
    let mut entries: Vec<Result<ModalityInput, ModalityFailure>> = Vec::new();

    if let Some(voice) = &request.voice {
        entries.push(spool_entry(
            Modality::Voice,
            &voice.audio_data,
            &mut spools,
            |path| ModalityInput::Voice { audio_path: path },
        ));
    }
    if let Some(datscan) = &request.datscan {
        entries.push(spool_entry(
            Modality::Datscan,
            &datscan.image_data,
            &mut spools,
            |path| ModalityInput::Datscan { image_path: path },
        ));
    }
    if let Some(spiral) = &request.spiral {
        entries.push(match decode_base64_payload(&spiral.spiral_data) {
            Ok(image) => Ok(ModalityInput::Spiral {
                image,
                drawing_time: spiral.drawing_time,
            }),
            Err(err) => Err(ModalityFailure {
                modality: Modality::Spiral,
                message: err.to_string(),
            }),
        });
    }

    let report = runtime
        .orchestrator
        .analyze(entries)
        .await
        .map_err(|err| RuntimeError::validation(err.to_string(), request_id))?;

    Ok(Json(MultimodalAnalysisResponse::from_report(
        report,
        runtime.orchestrator.fusion().config(),
    )))
}

/// Decode and spool one payload, demoting failures to modality errors.
fn spool_entry(
    modality: Modality,
    payload: &str,
    spools: &mut Vec<SpooledUpload>,
    into_input: impl FnOnce(std::path::PathBuf) -> ModalityInput,
) -> Result<ModalityInput, ModalityFailure> {
    match SpooledUpload::from_base64(payload) {
        Ok(upload) => {
            let path = upload.path().to_path_buf();
            spools.push(upload);
            Ok(into_input(path))
        }
        Err(err) => Err(ModalityFailure {
            modality,
            message: err.to_string(),
        }),
    }
}
