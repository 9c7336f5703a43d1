//! # Submission widget
//!
//! The ternary input as an explicit state machine:
//!
//! ```text
//! NoSelection -> PointSelected -> Submitting -> Submitted
//!                     ^               |
//!                     +---- failure --+
//! ```
//!
//! plus `SubmissionBlocked` whenever the per-period guard is found set. Only
//! the handlers on [`SubmissionWidget`] move between states. The remote insert
//! is split into [`SubmissionWidget::begin_submit`] and
//! [`SubmissionWidget::finish_submit`] so a UI can drop its borrow of the
//! widget while the request is in flight; [`SubmissionWidget::submit`] does
//! both in one call.

use tracing::{debug, error, info, warn};

use crate::geometry::{Point, Triangle, Viewport, CLICK_TOLERANCE};
use crate::store::{GuardStore, RecordStore};
use crate::{Confirmation, Period, Proportions, ResponseRecord, SurveyError};

const SAVING_MESSAGE: &str = "Saving...";
const SUCCESS_MESSAGE: &str = "Thank you, your response has been recorded.";

/// The latest accepted click
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub point: Point,
    pub proportions: Proportions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    NoSelection,
    PointSelected(Selection),
    /// Insert in flight; further confirmations are refused
    Submitting(Selection),
    /// Inserted during this mount
    Submitted(ResponseRecord),
    /// Guard was already set when checked
    SubmissionBlocked,
}

/// Tolerant containment followed by clamp-and-renormalise.
///
/// Clicks whose weights dip below `-CLICK_TOLERANCE` are rejected; anything
/// else is snapped onto the triangle so the shares are non-negative and sum
/// to 1.
pub fn accept_click(triangle: &Triangle, point: Point) -> Result<Proportions, SurveyError> {
    let weights = triangle.barycentric(point);
    if !weights.within_tolerance(CLICK_TOLERANCE) {
        return Err(SurveyError::OutOfBounds {
            x: point.x,
            y: point.y,
        });
    }
    Ok(weights.clamp_normalized().into())
}

pub struct SubmissionWidget<G: GuardStore> {
    period: Period,
    guard: G,
    viewport: Viewport,
    state: WidgetState,
    status: Option<String>,
    confirmation_open: bool,
}

impl<G: GuardStore> SubmissionWidget<G> {
    /// Create the widget for `period`, reading the guard once.
    pub fn mount(period: Period, guard: G) -> Self {
        Self::with_viewport(period, guard, Viewport::default())
    }

    pub fn with_viewport(period: Period, guard: G, viewport: Viewport) -> Self {
        let blocked = guard.get(&period.guard_key()).is_some();
        let state = if blocked {
            info!("Period {} already has a submission from this client", period);
            WidgetState::SubmissionBlocked
        } else {
            WidgetState::NoSelection
        };

        Self {
            period,
            guard,
            viewport,
            state,
            status: None,
            confirmation_open: false,
        }
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }

    pub fn into_guard(self) -> G {
        self.guard
    }

    /// True once this client has a recorded response for the period
    pub fn is_submitted(&self) -> bool {
        matches!(
            self.state,
            WidgetState::Submitted(_) | WidgetState::SubmissionBlocked
        )
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, WidgetState::Submitting(_))
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            WidgetState::PointSelected(selection) | WidgetState::Submitting(selection) => {
                Some(selection)
            }
            _ => None,
        }
    }

    /// Where to draw the selection marker, in viewport coordinates.
    ///
    /// Derived from the normalised proportions, so a click tolerated just
    /// outside an edge is drawn on that edge.
    pub fn marker(&self) -> Option<Point> {
        let selection = self.selection()?;
        let triangle = Triangle::from_viewport(self.viewport).ok()?;
        Some(triangle.to_cartesian(&selection.proportions.into()))
    }

    /// The record stored during this mount, if any
    pub fn last_submission(&self) -> Option<&ResponseRecord> {
        match &self.state {
            WidgetState::Submitted(record) => Some(record),
            _ => None,
        }
    }

    pub fn confirmation(&self) -> Confirmation {
        Confirmation {
            open: self.confirmation_open,
            data: self.last_submission().cloned(),
            period: self.period.to_string(),
        }
    }

    pub fn close_confirmation(&mut self) {
        self.confirmation_open = false;
    }

    fn guard_is_set(&self) -> bool {
        self.guard.get(&self.period.guard_key()).is_some()
    }

    fn fail<T>(&mut self, err: SurveyError) -> Result<T, SurveyError> {
        self.status = Some(err.user_message().to_string());
        Err(err)
    }

    /// Handle a click at `point`, given in viewport coordinates.
    ///
    /// A valid click replaces any previous selection. Rejected clicks leave
    /// the state untouched and only update the status text.
    pub fn click(&mut self, point: Point) -> Result<Selection, SurveyError> {
        match self.state {
            WidgetState::Submitted(_) | WidgetState::SubmissionBlocked => {
                return self.fail(SurveyError::AlreadySubmitted(self.period.to_string()));
            }
            WidgetState::Submitting(_) => return self.fail(SurveyError::SubmissionInProgress),
            WidgetState::NoSelection | WidgetState::PointSelected(_) => {}
        }

        if self.guard_is_set() {
            self.state = WidgetState::SubmissionBlocked;
            return self.fail(SurveyError::AlreadySubmitted(self.period.to_string()));
        }

        let triangle = match Triangle::from_viewport(self.viewport) {
            Ok(triangle) => triangle,
            Err(e) => {
                error!("Widget viewport is unusable: {}", e);
                return self.fail(e.into());
            }
        };

        let proportions = match accept_click(&triangle, point) {
            Ok(proportions) => proportions,
            Err(e) => {
                debug!("Rejected click: {}", e);
                return self.fail(e);
            }
        };

        let selection = Selection { point, proportions };
        self.state = WidgetState::PointSelected(selection.clone());
        self.status = None;
        Ok(selection)
    }

    /// Enter `Submitting` and hand back the record to insert.
    pub fn begin_submit(&mut self) -> Result<ResponseRecord, SurveyError> {
        let selection = match &self.state {
            WidgetState::Submitting(_) => return Err(SurveyError::SubmissionInProgress),
            WidgetState::Submitted(_) | WidgetState::SubmissionBlocked => {
                return self.fail(SurveyError::AlreadySubmitted(self.period.to_string()));
            }
            WidgetState::NoSelection => return self.fail(SurveyError::NoSelection),
            WidgetState::PointSelected(selection) => selection.clone(),
        };

        if self.guard_is_set() {
            self.state = WidgetState::SubmissionBlocked;
            return self.fail(SurveyError::AlreadySubmitted(self.period.to_string()));
        }

        let record = ResponseRecord::new(&self.period, &selection.proportions);
        self.state = WidgetState::Submitting(selection);
        self.status = Some(SAVING_MESSAGE.to_string());
        Ok(record)
    }

    /// Apply the outcome of the insert started by [`Self::begin_submit`].
    ///
    /// Success sets the guard and opens the confirmation. Failure returns to
    /// `PointSelected` with the same selection and leaves the guard alone.
    pub fn finish_submit(
        &mut self,
        outcome: Result<(), SurveyError>,
    ) -> Result<ResponseRecord, SurveyError> {
        let selection = match &self.state {
            WidgetState::Submitting(selection) => selection.clone(),
            other => {
                warn!("finish_submit called outside Submitting ({:?})", other);
                return Err(SurveyError::NotSubmitting);
            }
        };

        match outcome {
            Ok(()) => {
                let record = ResponseRecord::new(&self.period, &selection.proportions);
                if let Err(e) = self.guard.set(&self.period.guard_key(), "true") {
                    warn!("Response stored but guard flag could not be written: {}", e);
                }
                info!("Recorded response for period {}: {:?}", self.period, record);
                self.state = WidgetState::Submitted(record.clone());
                self.confirmation_open = true;
                self.status = Some(SUCCESS_MESSAGE.to_string());
                Ok(record)
            }
            Err(e) => {
                error!("Failed to record response for period {}: {}", self.period, e);
                self.state = WidgetState::PointSelected(selection);
                self.fail(e)
            }
        }
    }

    /// Insert the current selection into `store`.
    pub async fn submit<R: RecordStore + ?Sized>(
        &mut self,
        store: &R,
    ) -> Result<ResponseRecord, SurveyError> {
        let record = self.begin_submit()?;
        let outcome = store.insert_response(&record).await;
        self.finish_submit(outcome)
    }
}
