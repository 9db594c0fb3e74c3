//! Concurrent per-request modality orchestration.
//!
//! One orchestrator instance is shared by all requests; it holds only
//! read-only state (registry, fusion engine, timeout budget). Each request
//! fans its modalities out concurrently, waits for every outcome behind a
//! barrier join, and fuses whatever survived. A modality failure never
//! fails the request: it is recorded and excluded.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parkiq_core::{
    ClinicalNarrative, ClinicalNarrator, FusionEngine, FusionVerdict, Modality, ModalityResult,
    ValidationError,
};
use parkiq_models::{ModalityInput, ModelError, ModelRegistry, ModelResult};

/// One modality's recorded failure for an analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalityFailure {
    /// Which modality failed.
    pub modality: Modality,
    /// Why it was excluded from fusion.
    pub message: String,
}

impl From<ModelError> for ModalityFailure {
    fn from(err: ModelError) -> Self {
        Self {
            modality: err.modality(),
            message: err.to_string(),
        }
    }
}

/// Everything one multimodal analysis produced.
#[derive(Debug)]
pub struct AnalysisReport {
    /// The fused assessment.
    pub verdict: FusionVerdict,
    /// Successful per-modality results, in canonical modality order.
    pub results: Vec<ModalityResult>,
    /// Failed modalities, in canonical modality order.
    pub failures: Vec<ModalityFailure>,
    /// Derived clinical narrative.
    pub narrative: ClinicalNarrative,
    /// Wall-clock seconds for the whole operation.
    pub total_processing_time: f64,
}

/// Drives the requested modality predictors and assembles the fusion input.
pub struct AnalysisOrchestrator {
    registry: Arc<ModelRegistry>,
    fusion: Arc<FusionEngine>,
    modality_timeout: Duration,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator over a loaded registry.
    pub fn new(
        registry: Arc<ModelRegistry>,
        fusion: Arc<FusionEngine>,
        modality_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            fusion,
            modality_timeout,
        }
    }

    /// The fusion engine this orchestrator fuses with.
    pub fn fusion(&self) -> &FusionEngine {
        &self.fusion
    }

    /// Run a multimodal analysis.
    ///
    /// Each entry is either a decoded input or a failure already recorded
    /// upstream (for example, an undecodable payload). The only error this
    /// method itself raises is [`ValidationError::EmptyRequest`] when no
    /// modality was requested at all; "requested but everything failed"
    /// is not an error, it is an `insufficient_data` verdict.
    pub async fn analyze(
        &self,
        entries: Vec<Result<ModalityInput, ModalityFailure>>,
    ) -> Result<AnalysisReport, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::EmptyRequest);
        }
        let started = Instant::now();

        let mut failures: Vec<ModalityFailure> = Vec::new();
        let mut pending = Vec::new();
        for entry in entries {
            match entry {
                Ok(input) => pending.push(input),
                Err(failure) => failures.push(failure),
            }
        }

        // Fan out, then barrier: every outcome is collected before fusion.
        let outcomes =
            futures::future::join_all(pending.into_iter().map(|input| self.run_modality(input)))
                .await;

        let mut results = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(failure) => failures.push(failure),
            }
        }
        results.sort_by_key(|result| result.modality);
        failures.sort_by_key(|failure| failure.modality);

        let verdict = self.fusion.fuse(&results)?;
        let narrative = ClinicalNarrator::narrate(&verdict);

        tracing::info!(
            prediction = verdict.prediction.as_u8(),
            probability_pd = verdict.probability_pd,
            confidence = verdict.confidence,
            insufficient_data = verdict.insufficient_data,
            contributing = results.len(),
            failed = failures.len(),
            "multimodal analysis fused"
        );

        Ok(AnalysisReport {
            verdict,
            results,
            failures,
            narrative,
            total_processing_time: started.elapsed().as_secs_f64(),
        })
    }

    /// Run a single modality end to end, with hard failure semantics.
    pub async fn analyze_single(&self, input: ModalityInput) -> ModelResult<ModalityResult> {
        let modality = input.modality();
        let result = match tokio::time::timeout(self.modality_timeout, self.infer(input)).await {
            Err(_) => Err(ModelError::Timeout {
                modality,
                seconds: self.modality_timeout.as_secs_f64(),
            }),
            Ok(inferred) => inferred,
        }?;
        result
            .validate()
            .map_err(|err| ModelError::from_invalid_result(modality, err))?;
        Ok(result)
    }

    /// Isolated per-modality run for multimodal analysis.
    async fn run_modality(&self, input: ModalityInput) -> Result<ModalityResult, ModalityFailure> {
        let modality = input.modality();
        match self.analyze_single(input).await {
            Ok(result) => {
                tracing::info!(
                    modality = %modality,
                    probability_pd = result.probability_pd,
                    confidence = result.confidence,
                    "modality analysis completed"
                );
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(modality = %modality, error = %err, "modality analysis failed");
                Err(ModalityFailure::from(err))
            }
        }
    }

    async fn infer(&self, input: ModalityInput) -> ModelResult<ModalityResult> {
        let modality = input.modality();
        let model = self
            .registry
            .model(modality)
            .ok_or(ModelError::NotLoaded { modality })?;
        let features = model.extractor().extract(&input)?;
        model.predictor().predict(&features).await
    }
}
