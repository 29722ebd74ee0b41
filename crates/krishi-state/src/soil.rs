//! Soil report submission flow
//!
//! ```text
//! Idle -> Selected -> Submitting -> Complete
//!                        |   ^
//!                        v   |
//!                  AwaitingLocation
//! ```
//! Failures while submitting return to `Selected` with the error kept for
//! display. `reset` leaves `Complete` for a new analysis.

use krishi_core::{
    CompleteAnalysisRequest, Language, Location, ReportKind, SoilAnalysis, SoilParams,
    ValidationError, MAX_REPORT_BYTES,
};
use thiserror::Error;
use tracing::{debug, info};

/// Coarse state name, used by views to pick what to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilStage {
    Idle,
    Selected,
    Submitting,
    AwaitingLocation,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {event} while {stage:?}")]
    Invalid { event: &'static str, stage: SoilStage },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A report file or a captured photo, ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedReport<R> {
    pub report: R,
    pub file_name: String,
    pub kind: ReportKind,
    pub size: f64,
}

impl<R> SelectedReport<R> {
    pub fn new(report: R, file_name: impl Into<String>, mime: &str, size: f64) -> Self {
        let file_name = file_name.into();
        Self {
            kind: ReportKind::detect(mime, &file_name),
            report,
            file_name,
            size,
        }
    }
}

/// Multipart body for `/api/analyze_soil_report`
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest<R> {
    pub report: R,
    pub file_name: String,
    pub district: String,
    pub state: String,
    pub language: Language,
}

/// Request the page must send next
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    Upload(UploadRequest<R>),
    Complete(CompleteAnalysisRequest),
}

/// Which location fields the modal asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationPrompt {
    pub ask_district: bool,
    pub ask_state: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SoilState<R> {
    Idle,
    Selected(SelectedReport<R>),
    Submitting(SelectedReport<R>),
    AwaitingLocation {
        report: SelectedReport<R>,
        soil_params: SoilParams,
        report_path: Option<String>,
        location: Location,
    },
    Complete(Box<SoilAnalysis>),
}

#[derive(Debug, Clone)]
pub struct SoilFlow<R> {
    state: SoilState<R>,
    error: Option<String>,
}

impl<R: Clone> Default for SoilFlow<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> SoilFlow<R> {
    pub fn new() -> Self {
        Self {
            state: SoilState::Idle,
            error: None,
        }
    }

    pub fn state(&self) -> &SoilState<R> {
        &self.state
    }

    pub fn stage(&self) -> SoilStage {
        match self.state {
            SoilState::Idle => SoilStage::Idle,
            SoilState::Selected(_) => SoilStage::Selected,
            SoilState::Submitting(_) => SoilStage::Submitting,
            SoilState::AwaitingLocation { .. } => SoilStage::AwaitingLocation,
            SoilState::Complete(_) => SoilStage::Complete,
        }
    }

    /// Last failure, shown until the next transition clears it
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selection(&self) -> Option<&SelectedReport<R>> {
        match &self.state {
            SoilState::Selected(report)
            | SoilState::Submitting(report)
            | SoilState::AwaitingLocation { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&SoilAnalysis> {
        match &self.state {
            SoilState::Complete(analysis) => Some(&**analysis),
            _ => None,
        }
    }

    pub fn location_prompt(&self) -> Option<LocationPrompt> {
        match &self.state {
            SoilState::AwaitingLocation { location, .. } => Some(LocationPrompt {
                ask_district: !location.district_known(),
                ask_state: !location.state_known(),
            }),
            _ => None,
        }
    }

    fn invalid(&self, event: &'static str) -> TransitionError {
        TransitionError::Invalid {
            event,
            stage: self.stage(),
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Choose a file or photo, replacing any earlier choice
    pub fn select(&mut self, report: SelectedReport<R>) -> Result<(), TransitionError> {
        if !matches!(self.stage(), SoilStage::Idle | SoilStage::Selected) {
            return Err(self.invalid("select"));
        }
        if report.size > MAX_REPORT_BYTES {
            return Err(ValidationError::FileTooLarge.into());
        }

        debug!(file = %report.file_name, kind = ?report.kind, "soil report selected");
        self.error = None;
        self.state = SoilState::Selected(report);
        Ok(())
    }

    /// Drop the current choice (retake or remove)
    pub fn clear_selection(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.stage(), SoilStage::Idle | SoilStage::Selected) {
            return Err(self.invalid("clear selection"));
        }
        self.state = SoilState::Idle;
        Ok(())
    }

    /// Start the upload; location is left to the server to extract
    pub fn submit(&mut self, language: Language) -> Result<UploadRequest<R>, TransitionError> {
        let report = match &self.state {
            SoilState::Selected(report) => report.clone(),
            SoilState::Idle => return Err(ValidationError::NoReportSelected.into()),
            _ => return Err(self.invalid("submit")),
        };

        self.error = None;
        let request = upload(&report, String::new(), String::new(), language);
        self.state = SoilState::Submitting(report);
        Ok(request)
    }

    /// Handle a successful response of either analysis endpoint
    pub fn receive(&mut self, analysis: SoilAnalysis) -> Result<SoilStage, TransitionError> {
        let SoilState::Submitting(report) = &self.state else {
            return Err(self.invalid("receive"));
        };

        if let Some(message) = analysis.error.clone() {
            self.fail(message)?;
            return Ok(self.stage());
        }

        if analysis.missing_location {
            info!("location missing from soil report, asking the user");
            self.state = SoilState::AwaitingLocation {
                report: report.clone(),
                soil_params: analysis.soil_params,
                report_path: analysis.report_path.filter(|p| !p.is_empty()),
                location: analysis.location,
            };
        } else {
            self.state = SoilState::Complete(Box::new(analysis));
        }
        Ok(self.stage())
    }

    /// Fill in the missing location.
    ///
    /// Only fields the server could not extract are validated; known values
    /// are kept. With a stored report path the analysis is completed from the
    /// extracted parameters, otherwise the report is uploaded again.
    pub fn supply_location(
        &mut self,
        district: &str,
        state: &str,
        language: Language,
    ) -> Result<Submission<R>, TransitionError> {
        let SoilState::AwaitingLocation {
            report,
            soil_params,
            report_path,
            location,
        } = &self.state
        else {
            return Err(self.invalid("supply location"));
        };

        let district = resolve(district, location.district.as_deref(), ValidationError::MissingDistrict)?;
        let state = resolve(state, location.state.as_deref(), ValidationError::MissingState)?;

        let submission = match report_path {
            Some(path) => Submission::Complete(CompleteAnalysisRequest {
                soil_params: soil_params.clone(),
                district,
                state,
                language,
                report_path: path.clone(),
            }),
            None => Submission::Upload(upload(report, district, state, language)),
        };

        self.error = None;
        self.state = SoilState::Submitting(report.clone());
        Ok(submission)
    }

    /// Network or server failure while submitting
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        let SoilState::Submitting(report) = &self.state else {
            return Err(self.invalid("fail"));
        };

        self.error = Some(message.into());
        self.state = SoilState::Selected(report.clone());
        Ok(())
    }

    /// Close the location modal without submitting
    pub fn dismiss_location(&mut self) -> Result<(), TransitionError> {
        let SoilState::AwaitingLocation { report, .. } = &self.state else {
            return Err(self.invalid("dismiss location"));
        };
        self.state = SoilState::Selected(report.clone());
        Ok(())
    }

    /// Start over after viewing results
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        if self.stage() != SoilStage::Complete {
            return Err(self.invalid("reset"));
        }
        self.state = SoilState::Idle;
        self.error = None;
        Ok(())
    }
}

fn upload<R: Clone>(
    report: &SelectedReport<R>,
    district: String,
    state: String,
    language: Language,
) -> UploadRequest<R> {
    UploadRequest {
        report: report.report.clone(),
        file_name: report.file_name.clone(),
        district,
        state,
        language,
    }
}

/// Known value wins; otherwise the typed value is required
fn resolve(typed: &str, known: Option<&str>, missing: ValidationError) -> Result<String, ValidationError> {
    if let Some(known) = known.filter(|k| !k.trim().is_empty()) {
        return Ok(known.to_string());
    }
    let typed = typed.trim();
    if typed.is_empty() {
        return Err(missing);
    }
    Ok(typed.to_string())
}

// ============================================================================
// VARIETY CAROUSEL
// ============================================================================

/// Auto-advance period of the variety carousel
pub const CAROUSEL_INTERVAL_MS: u32 = 5_000;

/// Wrap-around position over `len` slides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
    paused: bool,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len,
            paused: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn go_to(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Timer tick; advances unless hovered
    pub fn tick(&mut self) {
        if !self.paused && self.len > 1 {
            self.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SelectedReport<&'static str> {
        SelectedReport::new("blob", "report.pdf", "application/pdf", 2048.0)
    }

    fn awaiting(json: &str) -> SoilFlow<&'static str> {
        let mut flow = SoilFlow::new();
        flow.select(report()).unwrap();
        flow.submit(Language::English).unwrap();
        let analysis: SoilAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(flow.receive(analysis), Ok(SoilStage::AwaitingLocation));
        flow
    }

    #[test]
    fn test_submit_requires_selection() {
        let mut flow: SoilFlow<&str> = SoilFlow::new();
        assert_eq!(
            flow.submit(Language::English).err(),
            Some(TransitionError::Validation(ValidationError::NoReportSelected))
        );
    }

    #[test]
    fn test_oversized_file_rejected() {
        let mut flow = SoilFlow::new();
        let big = SelectedReport::new("blob", "scan.jpg", "image/jpeg", MAX_REPORT_BYTES + 1.0);
        assert_eq!(
            flow.select(big).err(),
            Some(TransitionError::Validation(ValidationError::FileTooLarge))
        );
        assert_eq!(flow.stage(), SoilStage::Idle);
    }

    #[test]
    fn test_happy_path_and_reset() {
        let mut flow = SoilFlow::new();
        flow.select(report()).unwrap();
        let upload = flow.submit(Language::Hindi).unwrap();
        assert_eq!(upload.file_name, "report.pdf");
        assert_eq!(upload.district, "");
        assert_eq!(upload.language, Language::Hindi);
        assert_eq!(flow.stage(), SoilStage::Submitting);

        let analysis: SoilAnalysis =
            serde_json::from_str(r#"{"soil_params": {"ph": 6.8}, "soil_report_id": 7}"#).unwrap();
        assert_eq!(flow.receive(analysis), Ok(SoilStage::Complete));
        assert_eq!(flow.analysis().and_then(|a| a.soil_params.ph), Some(6.8));

        flow.reset().unwrap();
        assert_eq!(flow.stage(), SoilStage::Idle);
        assert!(flow.selection().is_none());
    }

    #[test]
    fn test_missing_location_completes_without_reupload() {
        let mut flow = awaiting(
            r#"{"missing_location": true, "soil_params": {"ph": 7.1},
                "location": {"district": "Nashik"}, "report_path": "uploads/r1.pdf"}"#,
        );
        assert_eq!(
            flow.location_prompt(),
            Some(LocationPrompt { ask_district: false, ask_state: true })
        );

        // only the state is validated
        assert_eq!(
            flow.supply_location("", " ", Language::English).err(),
            Some(TransitionError::Validation(ValidationError::MissingState))
        );
        assert_eq!(flow.stage(), SoilStage::AwaitingLocation);

        let submission = flow.supply_location("", "Maharashtra", Language::English).unwrap();
        let Submission::Complete(request) = submission else {
            panic!("expected completion request");
        };
        assert_eq!(request.district, "Nashik");
        assert_eq!(request.state, "Maharashtra");
        assert_eq!(request.report_path, "uploads/r1.pdf");
        assert_eq!(request.soil_params.ph, Some(7.1));
        assert_eq!(flow.stage(), SoilStage::Submitting);

        let done: SoilAnalysis = serde_json::from_str(r#"{"location": {"district": "Nashik", "state": "Maharashtra"}}"#).unwrap();
        assert_eq!(flow.receive(done), Ok(SoilStage::Complete));
    }

    #[test]
    fn test_missing_report_path_reuploads() {
        let mut flow = awaiting(r#"{"missing_location": true, "report_path": ""}"#);
        assert_eq!(
            flow.supply_location("", "", Language::English).err(),
            Some(TransitionError::Validation(ValidationError::MissingDistrict))
        );
        match flow.supply_location(" Pune ", "Maharashtra", Language::English).unwrap() {
            Submission::Upload(upload) => {
                assert_eq!(upload.report, "blob");
                assert_eq!(upload.district, "Pune");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_failure_returns_to_selection() {
        let mut flow = SoilFlow::new();
        flow.select(report()).unwrap();
        flow.submit(Language::English).unwrap();
        flow.fail("Server error: 500").unwrap();
        assert_eq!(flow.stage(), SoilStage::Selected);
        assert_eq!(flow.error(), Some("Server error: 500"));
        assert!(flow.selection().is_some());

        // inline error in a 200 body is a failure too
        flow.submit(Language::English).unwrap();
        assert!(flow.error().is_none());
        let analysis: SoilAnalysis = serde_json::from_str(r#"{"error": "OCR failed"}"#).unwrap();
        assert_eq!(flow.receive(analysis), Ok(SoilStage::Selected));
        assert_eq!(flow.error(), Some("OCR failed"));
    }

    #[test]
    fn test_dismiss_and_invalid_events() {
        let mut flow = awaiting(r#"{"missing_location": true, "report_path": "p"}"#);
        assert!(flow.select(report()).is_err());
        assert!(flow.reset().is_err());
        flow.dismiss_location().unwrap();
        assert_eq!(flow.stage(), SoilStage::Selected);
        assert_eq!(
            flow.fail("x"),
            Err(TransitionError::Invalid { event: "fail", stage: SoilStage::Selected })
        );
    }

    #[test]
    fn test_rejected_events_leave_state_untouched() {
        let mut flow = SoilFlow::new();
        flow.select(report()).unwrap();

        let refused = [flow.reset(), flow.dismiss_location(), flow.fail("late reply")];
        let messages: Vec<String> = refused
            .into_iter()
            .map(|r| r.unwrap_err().to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "cannot reset while Selected",
                "cannot dismiss location while Selected",
                "cannot fail while Selected",
            ]
        );
        assert_eq!(flow.stage(), SoilStage::Selected);
        assert_eq!(flow.error(), None);
        assert_eq!(flow.selection().map(|s| s.file_name.as_str()), Some("report.pdf"));
    }

    #[test]
    fn test_carousel_wraps_and_pauses() {
        let mut carousel = Carousel::new(3);
        carousel.prev();
        assert_eq!(carousel.index(), 2);
        carousel.tick();
        assert_eq!(carousel.index(), 0);

        carousel.set_paused(true);
        carousel.tick();
        assert_eq!(carousel.index(), 0);

        carousel.go_to(5);
        assert_eq!(carousel.index(), 0);

        let mut single = Carousel::new(1);
        single.tick();
        assert_eq!(single.index(), 0);
    }
}
