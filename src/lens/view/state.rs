//! View state and its transition function

use crate::lens::lookup::{LookupOutcome, LookupRecord};
use crate::lens::map::LatLng;
use crate::lens::validate::{is_valid_ip_format, FORMAT_ALERT};
use serde::Serialize;

/// Identifies one submission; only the latest one may complete the view
pub type RequestId = u64;

/// What the view is currently showing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "phase", content = "data", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing submitted, or cleared
    #[default]
    Idle,
    /// A lookup is outstanding
    Loading { request_id: RequestId },
    /// Last lookup succeeded
    Loaded(LookupRecord),
    /// Last lookup failed; the message goes to the error panel
    Failed(String),
}

/// Inputs to the view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    InputChanged(String),
    Submit,
    LookupCompleted {
        request_id: RequestId,
        outcome: LookupOutcome,
    },
    ShowMore,
    ShowLess,
}

/// Side effects requested by a transition, executed in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Blocking notification; the view state is left untouched
    Alert(String),
    /// Destroy the live map, if any
    DestroyMap,
    /// Show the map for `address`: re-center a map already bound to it, otherwise build one
    ShowMap { address: String, center: LatLng },
    /// Start exactly one lookup for `query`
    StartLookup { request_id: RequestId, query: String },
}

/// The expand/collapse control currently rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    SeeMore,
    SeeLess,
}

impl Toggle {
    pub fn label(&self) -> &'static str {
        match self {
            Toggle::SeeMore => "See More",
            Toggle::SeeLess => "See Less",
        }
    }
}

/// State of the lookup view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupView {
    query: String,
    phase: Phase,
    expanded: bool,
    last_request_id: RequestId,
}

impl LookupView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn result(&self) -> Option<&LookupRecord> {
        match &self.phase {
            Phase::Loaded(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.query.is_empty()
    }

    /// The result, if it belongs to the text currently typed
    pub fn visible_result(&self) -> Option<&LookupRecord> {
        self.result()
            .filter(|record| !self.query.is_empty() && record.ip == self.query)
    }

    /// The map container is visible under the same guard as the result panel
    pub fn map_visible(&self) -> bool {
        self.visible_result().is_some()
    }

    /// The single expand/collapse control to render, if any
    pub fn toggle(&self) -> Option<Toggle> {
        self.visible_result().map(|_| match self.expanded {
            true => Toggle::SeeLess,
            false => Toggle::SeeMore,
        })
    }

    /// Apply one event and return the effects the caller must run.
    pub fn apply(&mut self, event: ViewEvent) -> Vec<Effect> {
        match event {
            ViewEvent::InputChanged(text) => self.on_input(text),
            ViewEvent::Submit => self.on_submit(),
            ViewEvent::LookupCompleted {
                request_id,
                outcome,
            } => self.on_completed(request_id, outcome),
            ViewEvent::ShowMore => {
                if self.visible_result().is_some() {
                    self.expanded = true;
                }
                vec![]
            }
            ViewEvent::ShowLess => {
                self.expanded = false;
                vec![]
            }
        }
    }

    fn on_input(&mut self, text: String) -> Vec<Effect> {
        self.query = text;
        if matches!(self.phase, Phase::Failed(_)) {
            self.phase = Phase::Idle;
        }
        self.show_map_effect().into_iter().collect()
    }

    fn on_submit(&mut self) -> Vec<Effect> {
        if self.query.is_empty() {
            self.phase = Phase::Idle;
            self.expanded = false;
            return vec![Effect::DestroyMap];
        }
        if !is_valid_ip_format(&self.query) {
            return vec![Effect::Alert(FORMAT_ALERT.to_string())];
        }

        self.last_request_id += 1;
        self.phase = Phase::Loading {
            request_id: self.last_request_id,
        };
        self.expanded = false;
        vec![
            Effect::DestroyMap,
            Effect::StartLookup {
                request_id: self.last_request_id,
                query: self.query.clone(),
            },
        ]
    }

    fn on_completed(&mut self, request_id: RequestId, outcome: LookupOutcome) -> Vec<Effect> {
        match self.phase {
            Phase::Loading { request_id: pending } if pending == request_id => {}
            _ => return vec![],
        }

        match outcome {
            LookupOutcome::Success(record) => {
                self.phase = Phase::Loaded(record);
                self.show_map_effect().into_iter().collect()
            }
            LookupOutcome::Failure(failure) => {
                self.phase = Phase::Failed(failure.to_string());
                vec![Effect::DestroyMap]
            }
        }
    }

    fn show_map_effect(&self) -> Option<Effect> {
        let record = self.visible_result()?;
        let (lat, lng) = record.coordinates()?;
        Some(Effect::ShowMap {
            address: record.ip.clone(),
            center: LatLng::new(lat, lng),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::lookup::LookupFailure;
    use crate::lens::view::fixtures::record;

    fn submit(view: &mut LookupView, text: &str) -> Vec<Effect> {
        view.apply(ViewEvent::InputChanged(text.to_string()));
        view.apply(ViewEvent::Submit)
    }

    #[test]
    fn test_submit_valid_query_starts_lookup() {
        let mut view = LookupView::new();
        let effects = submit(&mut view, "8.8.8.8");
        assert_eq!(
            effects,
            vec![
                Effect::DestroyMap,
                Effect::StartLookup {
                    request_id: 1,
                    query: "8.8.8.8".to_string()
                }
            ]
        );
        assert!(view.is_loading());
        assert!(!view.can_submit());
    }

    #[test]
    fn test_invalid_format_alerts_and_keeps_result() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(1.0), Some(2.0))),
        });

        view.apply(ViewEvent::InputChanged("999.1.1.1".to_string()));
        let effects = view.apply(ViewEvent::Submit);
        assert_eq!(effects, vec![Effect::Alert(FORMAT_ALERT.to_string())]);
        assert!(view.result().is_some());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_empty_submit_clears_without_lookup() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", None, None)),
        });

        let effects = submit(&mut view, "");
        assert_eq!(effects, vec![Effect::DestroyMap]);
        assert_eq!(view.phase(), &Phase::Idle);
        assert!(!view.can_submit());
    }

    #[test]
    fn test_success_shows_map_when_guard_holds() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        let effects = view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(37.4), Some(-122.1))),
        });
        assert_eq!(
            effects,
            vec![Effect::ShowMap {
                address: "8.8.8.8".to_string(),
                center: LatLng::new(37.4, -122.1)
            }]
        );
        assert!(view.map_visible());
        assert_eq!(view.toggle(), Some(Toggle::SeeMore));
    }

    #[test]
    fn test_success_without_coordinates_has_no_map() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        let effects = view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(37.4), None)),
        });
        assert!(effects.is_empty());
        assert!(view.visible_result().is_some());
    }

    #[test]
    fn test_stale_result_guard() {
        let mut view = LookupView::new();
        submit(&mut view, "2001:4860:4860::8888");
        // the service answers with its canonical spelling
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("2001:4860:4860:0:0:0:0:8888", Some(1.0), Some(1.0))),
        });
        assert!(view.result().is_some());
        assert!(view.visible_result().is_none());
        assert!(!view.map_visible());
        assert_eq!(view.toggle(), None);
    }

    #[test]
    fn test_failure_replaces_result() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(1.0), Some(1.0))),
        });
        submit(&mut view, "1.2.3.4");
        let effects = view.apply(ViewEvent::LookupCompleted {
            request_id: 2,
            outcome: LookupFailure::ServiceError("Invalid IP".to_string()).into(),
        });
        assert_eq!(effects, vec![Effect::DestroyMap]);
        assert_eq!(view.error(), Some("Invalid IP"));
        assert!(view.result().is_none());
        assert!(!view.map_visible());
    }

    #[test]
    fn test_typing_clears_error() {
        let mut view = LookupView::new();
        submit(&mut view, "10.0.0.1");
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupFailure::Reserved.into(),
        });
        assert!(view.error().is_some());
        view.apply(ViewEvent::InputChanged("10.0.0.".to_string()));
        assert_eq!(view.error(), None);
        assert_eq!(view.phase(), &Phase::Idle);
    }

    #[test]
    fn test_superseded_completion_is_discarded() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        submit(&mut view, "1.1.1.1");

        let effects = view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(1.0), Some(1.0))),
        });
        assert!(effects.is_empty());
        assert_eq!(view.phase(), &Phase::Loading { request_id: 2 });

        view.apply(ViewEvent::LookupCompleted {
            request_id: 2,
            outcome: LookupOutcome::Success(record("1.1.1.1", Some(1.0), Some(1.0))),
        });
        assert_eq!(view.visible_result().map(|r| r.ip.as_str()), Some("1.1.1.1"));

        // a late duplicate of the current id after completion is ignored too
        let effects = view.apply(ViewEvent::LookupCompleted {
            request_id: 2,
            outcome: LookupFailure::NotFound.into(),
        });
        assert!(effects.is_empty());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_completion_after_clear_is_discarded() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        submit(&mut view, "");
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(1.0), Some(1.0))),
        });
        assert_eq!(view.phase(), &Phase::Idle);
    }

    #[test]
    fn test_toggle_is_exclusive() {
        let mut view = LookupView::new();
        view.apply(ViewEvent::ShowMore);
        assert!(!view.is_expanded());

        submit(&mut view, "8.8.8.8");
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(1.0), Some(1.0))),
        });
        assert_eq!(view.toggle(), Some(Toggle::SeeMore));
        view.apply(ViewEvent::ShowMore);
        assert_eq!(view.toggle(), Some(Toggle::SeeLess));
        view.apply(ViewEvent::ShowLess);
        assert_eq!(view.toggle(), Some(Toggle::SeeMore));

        // a new submission collapses the details
        view.apply(ViewEvent::ShowMore);
        submit(&mut view, "8.8.8.8");
        assert!(!view.is_expanded());
    }

    #[test]
    fn test_retyping_bound_address_recenters() {
        let mut view = LookupView::new();
        submit(&mut view, "8.8.8.8");
        view.apply(ViewEvent::LookupCompleted {
            request_id: 1,
            outcome: LookupOutcome::Success(record("8.8.8.8", Some(37.4), Some(-122.1))),
        });

        let effects = view.apply(ViewEvent::InputChanged("8.8.8.".to_string()));
        assert!(effects.is_empty());
        assert!(!view.map_visible());

        let effects = view.apply(ViewEvent::InputChanged("8.8.8.8".to_string()));
        assert_eq!(
            effects,
            vec![Effect::ShowMap {
                address: "8.8.8.8".to_string(),
                center: LatLng::new(37.4, -122.1)
            }]
        );
        assert!(view.map_visible());
    }
}
