/// The analysis workflow state machine
///
/// One `Workflow` is owned by the top-level view; everything else sees it
/// read-only and mutates it exclusively through the transition methods
/// below. The machine is cyclic: a finished analysis (either outcome)
/// always allows retrying with the retained image or starting over with a
/// new one.
///
/// Phases and transitions:
/// - Idle → ImageSelected      (image acquired)
/// - ImageSelected → Analyzing (user triggers analysis)
/// - Analyzing → Succeeded     (non-empty result list)
/// - Analyzing → Failed        (any error, including an empty list)
/// - Succeeded/Failed → Analyzing (retry with the same image)
/// - any phase → ImageSelected (new image discards prior results/errors)
/// - any phase → Idle          (image removed)

use thiserror::Error;
use tracing::warn;

use super::image::CapturedImage;
use crate::api::error::AnalyzeError;
use crate::api::model::FoodResult;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPhase {
    /// No image selected
    Idle,
    /// An image is selected and ready to analyze
    ImageSelected,
    /// A request is in flight; the trigger is disabled
    Analyzing,
    /// The service returned at least one result
    Succeeded(Vec<FoodResult>),
    /// The request failed; the image is retained for retry
    Failed(AnalyzeError),
}

/// Local rejections of an analysis trigger. No network request happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeginAnalysisError {
    #[error("No image selected. Please select an image first.")]
    NoImageSelected,

    #[error("An analysis is already in progress.")]
    AnalysisInFlight,
}

#[derive(Debug)]
pub struct Workflow {
    image: Option<CapturedImage>,
    phase: AnalysisPhase,
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            image: None,
            phase: AnalysisPhase::Idle,
        }
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, AnalysisPhase::Analyzing)
    }

    /// Replace the current image (if any) and move to ImageSelected.
    ///
    /// The previous image, its preview handle, and any results or error
    /// from an earlier run are all dropped here: a fresh image never shows
    /// stale output next to it.
    pub fn select_image(&mut self, image: CapturedImage) {
        self.image = Some(image);
        self.phase = AnalysisPhase::ImageSelected;
    }

    /// Drop the image and return to Idle.
    pub fn clear(&mut self) {
        self.image = None;
        self.phase = AnalysisPhase::Idle;
    }

    /// Move to Analyzing and hand back the image to upload.
    ///
    /// Rejected locally when no image is present or a request is already
    /// in flight (at most one request at a time).
    pub fn begin_analysis(&mut self) -> Result<CapturedImage, BeginAnalysisError> {
        if self.is_analyzing() {
            return Err(BeginAnalysisError::AnalysisInFlight);
        }

        let image = self
            .image
            .as_ref()
            .ok_or(BeginAnalysisError::NoImageSelected)?
            .clone();

        self.phase = AnalysisPhase::Analyzing;
        Ok(image)
    }

    /// Record a successful outcome.
    ///
    /// Outcomes arriving outside Analyzing are stale (the image was
    /// replaced or removed while the request was in flight) and are
    /// discarded.
    pub fn complete(&mut self, results: Vec<FoodResult>) {
        if !self.is_analyzing() {
            warn!("discarding stale analysis result ({} items)", results.len());
            return;
        }
        self.phase = AnalysisPhase::Succeeded(results);
    }

    /// Record a failed outcome. Same staleness rule as `complete`.
    pub fn fail(&mut self, error: AnalyzeError) {
        if !self.is_analyzing() {
            warn!("discarding stale analysis error: {error}");
            return;
        }
        self.phase = AnalysisPhase::Failed(error);
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn pizza() -> CapturedImage {
        CapturedImage::from_file(Path::new("pizza.jpg"), vec![0xFF, 0xD8]).unwrap()
    }

    fn salad() -> CapturedImage {
        CapturedImage::from_file(Path::new("salad.png"), vec![0x89, 0x50]).unwrap()
    }

    fn one_result() -> Vec<FoodResult> {
        serde_json::from_str(
            r#"[{
                "food_item": "Pizza",
                "nutritional_info": {
                    "calories": 285,
                    "protein": "12g",
                    "carbs": "36g",
                    "fat": "10g",
                    "details": ""
                }
            }]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let workflow = Workflow::new();
        assert_eq!(*workflow.phase(), AnalysisPhase::Idle);
        assert!(workflow.image().is_none());
    }

    #[test]
    fn test_begin_without_image_is_rejected() {
        let mut workflow = Workflow::new();
        assert_eq!(
            workflow.begin_analysis().unwrap_err(),
            BeginAnalysisError::NoImageSelected
        );
        assert_eq!(*workflow.phase(), AnalysisPhase::Idle);
    }

    #[test]
    fn test_select_then_analyze_then_succeed() {
        let mut workflow = Workflow::new();
        workflow.select_image(pizza());
        assert_eq!(*workflow.phase(), AnalysisPhase::ImageSelected);

        let image = workflow.begin_analysis().unwrap();
        assert_eq!(image.file_name, "pizza.jpg");
        assert!(workflow.is_analyzing());

        workflow.complete(one_result());
        assert!(matches!(workflow.phase(), AnalysisPhase::Succeeded(r) if r.len() == 1));
    }

    #[test]
    fn test_no_overlapping_requests() {
        let mut workflow = Workflow::new();
        workflow.select_image(pizza());
        workflow.begin_analysis().unwrap();

        assert_eq!(
            workflow.begin_analysis().unwrap_err(),
            BeginAnalysisError::AnalysisInFlight
        );
        assert!(workflow.is_analyzing());
    }

    #[test]
    fn test_failure_retains_image_for_retry() {
        let mut workflow = Workflow::new();
        workflow.select_image(pizza());
        workflow.begin_analysis().unwrap();
        workflow.fail(AnalyzeError::Timeout);

        assert_eq!(*workflow.phase(), AnalysisPhase::Failed(AnalyzeError::Timeout));
        assert!(workflow.image().is_some());

        // Retry goes straight back to Analyzing with the same image
        let image = workflow.begin_analysis().unwrap();
        assert_eq!(image.file_name, "pizza.jpg");
        assert!(workflow.is_analyzing());
    }

    #[test]
    fn test_new_image_replaces_old_and_clears_outcome() {
        let mut workflow = Workflow::new();
        workflow.select_image(pizza());
        workflow.begin_analysis().unwrap();
        workflow.fail(AnalyzeError::Unreachable);

        workflow.select_image(salad());
        assert_eq!(*workflow.phase(), AnalysisPhase::ImageSelected);
        assert_eq!(workflow.image().unwrap().file_name, "salad.png");
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let mut workflow = Workflow::new();
        workflow.select_image(pizza());
        workflow.begin_analysis().unwrap();

        // The user replaced the image while the request was in flight;
        // the old request's outcome must not land on the new image.
        workflow.select_image(salad());
        workflow.complete(one_result());
        assert_eq!(*workflow.phase(), AnalysisPhase::ImageSelected);

        workflow.fail(AnalyzeError::Timeout);
        assert_eq!(*workflow.phase(), AnalysisPhase::ImageSelected);
    }

    #[test]
    fn test_clear_returns_to_idle() {
        let mut workflow = Workflow::new();
        workflow.select_image(pizza());
        workflow.clear();

        assert_eq!(*workflow.phase(), AnalysisPhase::Idle);
        assert!(workflow.image().is_none());
    }

    #[test]
    fn test_empty_result_failure_cycle() {
        let mut workflow = Workflow::new();
        workflow.select_image(pizza());
        workflow.begin_analysis().unwrap();
        workflow.fail(AnalyzeError::InvalidResponse);

        assert_eq!(
            *workflow.phase(),
            AnalysisPhase::Failed(AnalyzeError::InvalidResponse)
        );
    }
}
