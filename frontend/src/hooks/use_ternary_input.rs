use shared::{
    Confirmation, GuardStore, Period, Point, RecordStore, ResponseRecord, Selection,
    SubmissionWidget, SurveyError, Viewport,
};
use std::cell::RefCell;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::guard_store::LocalStorageGuardStore;
use crate::services::logging::Logger;

const COMPONENT: &str = "ternary_input";

/// Render-time snapshot of the widget
#[derive(Clone, PartialEq)]
pub struct TernaryInputState {
    pub selection: Option<Selection>,
    /// Marker position in view-box coordinates
    pub marker: Option<Point>,
    pub status: Option<String>,
    pub submitted: bool,
    pub submitting: bool,
    pub last_submission: Option<ResponseRecord>,
    pub confirmation: Confirmation,
    pub viewport: Viewport,
}

#[derive(Clone)]
pub struct UseTernaryInputActions {
    /// Click position already mapped into view-box coordinates
    pub on_point: Callback<Point>,
    pub on_submit: Callback<()>,
    pub on_close_confirmation: Callback<()>,
}

pub struct UseTernaryInputResult {
    pub state: TernaryInputState,
    pub actions: UseTernaryInputActions,
}

type Widget = SubmissionWidget<LocalStorageGuardStore>;

/// Swap in a widget for `period` unless an insert is still in flight.
///
/// The in-flight insert must finish against the widget that started it so
/// its own period's guard gets written. Returns true when a remount happened.
fn remount_if_stale<G: GuardStore>(
    widget: &RefCell<SubmissionWidget<G>>,
    period: &Period,
    guard: impl FnOnce() -> G,
) -> bool {
    let stale = {
        let current = widget.borrow();
        current.period() != period && !current.is_submitting()
    };
    if stale {
        *widget.borrow_mut() = SubmissionWidget::mount(period.clone(), guard());
    }
    stale
}

/// Hook owning one [`SubmissionWidget`] per period.
///
/// The widget lives in a `RefCell`; every handler borrows it only for the
/// duration of one transition and never across the insert request.
#[hook]
pub fn use_ternary_input(period: &Period, api_client: &ApiClient) -> UseTernaryInputResult {
    let widget = use_mut_ref({
        let period = period.clone();
        move || Widget::mount(period, LocalStorageGuardStore)
    });
    let latest_period = use_mut_ref(|| period.clone());
    let force_update = use_force_update();
    let logger = Logger::for_client(api_client);
    *latest_period.borrow_mut() = period.clone();

    // Remount when the host switches periods
    use_effect_with(period.clone(), {
        let widget = widget.clone();
        let force_update = force_update.clone();
        move |period: &Period| {
            if remount_if_stale(&widget, period, || LocalStorageGuardStore) {
                force_update.force_update();
            }
            || ()
        }
    });

    let on_point = {
        let widget = widget.clone();
        let force_update = force_update.clone();
        let logger = logger.clone();
        Callback::from(move |point: Point| {
            if let Err(e) = widget.borrow_mut().click(point) {
                if !matches!(e, SurveyError::OutOfBounds { .. }) {
                    logger.info_with_component(COMPONENT, &e.to_string());
                }
            }
            force_update.force_update();
        })
    };

    let on_submit = {
        let widget = widget.clone();
        let force_update = force_update.clone();
        let api_client = api_client.clone();
        let latest_period = latest_period.clone();
        let logger = logger.clone();
        Callback::from(move |_: ()| {
            let begun = widget.borrow_mut().begin_submit();
            force_update.force_update();

            let record = match begun {
                Ok(record) => record,
                Err(SurveyError::SubmissionInProgress) => return,
                Err(e) => {
                    logger.info_with_component(COMPONENT, &e.to_string());
                    return;
                }
            };

            let widget = widget.clone();
            let force_update = force_update.clone();
            let api_client = api_client.clone();
            let latest_period = latest_period.clone();
            let logger = logger.clone();
            spawn_local(async move {
                let outcome = api_client.insert_response(&record).await;
                if let Err(e) = &outcome {
                    logger.error_with_component(COMPONENT, &format!("Saving response failed: {}", e));
                }

                match widget.borrow_mut().finish_submit(outcome) {
                    Ok(saved) => logger.info_with_component(
                        COMPONENT,
                        &format!("Response recorded for {}", saved.period),
                    ),
                    Err(SurveyError::InsertRejected(_)) | Err(SurveyError::InsertFailed(_)) => {}
                    Err(e) => logger.warn_with_component(COMPONENT, &e.to_string()),
                }

                // A period switch that arrived mid-flight takes effect now
                let period = latest_period.borrow().clone();
                remount_if_stale(&widget, &period, || LocalStorageGuardStore);
                force_update.force_update();
            });
        })
    };

    let on_close_confirmation = {
        let widget = widget.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            widget.borrow_mut().close_confirmation();
            force_update.force_update();
        })
    };

    let state = {
        let widget = widget.borrow();
        TernaryInputState {
            selection: widget.selection().cloned(),
            marker: widget.marker(),
            status: widget.status().map(str::to_string),
            submitted: widget.is_submitted(),
            submitting: widget.is_submitting(),
            last_submission: widget.last_submission().cloned(),
            confirmation: widget.confirmation(),
            viewport: widget.viewport(),
        }
    };

    UseTernaryInputResult {
        state,
        actions: UseTernaryInputActions {
            on_point,
            on_submit,
            on_close_confirmation,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MemoryGuardStore, WidgetState};

    fn widget_for(period: &str) -> RefCell<SubmissionWidget<MemoryGuardStore>> {
        RefCell::new(SubmissionWidget::mount(Period::new(period), MemoryGuardStore::new()))
    }

    #[test]
    fn test_period_switch_remounts_idle_widget() {
        let widget = widget_for("2024");
        widget.borrow_mut().click(Point::new(180.0, 250.0)).unwrap();

        assert!(remount_if_stale(&widget, &Period::new("2025"), MemoryGuardStore::new));
        assert_eq!(widget.borrow().period(), &Period::new("2025"));
        assert_eq!(widget.borrow().state(), &WidgetState::NoSelection);
    }

    #[test]
    fn test_same_period_keeps_widget() {
        let widget = widget_for("2025");
        widget.borrow_mut().click(Point::new(180.0, 250.0)).unwrap();

        assert!(!remount_if_stale(&widget, &Period::new("2025"), MemoryGuardStore::new));
        assert!(widget.borrow().selection().is_some());
    }

    #[test]
    fn test_period_switch_waits_for_in_flight_insert() {
        let widget = widget_for("2024");
        widget.borrow_mut().click(Point::new(180.0, 250.0)).unwrap();
        widget.borrow_mut().begin_submit().unwrap();

        // Switch arrives while the insert is pending
        assert!(!remount_if_stale(&widget, &Period::new("2025"), MemoryGuardStore::new));
        assert!(widget.borrow().is_submitting());

        let saved = widget.borrow_mut().finish_submit(Ok(())).unwrap();
        assert_eq!(saved.period, "2024");
        assert!(widget.borrow().guard().get("submitted-2024").is_some());

        // Deferred switch happens once the insert settled
        assert!(remount_if_stale(&widget, &Period::new("2025"), MemoryGuardStore::new));
        assert_eq!(widget.borrow().period(), &Period::new("2025"));
        assert_eq!(widget.borrow().state(), &WidgetState::NoSelection);
    }
}
