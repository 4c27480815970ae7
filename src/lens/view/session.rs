//! Session driver connecting the view, the lookup lens and the map binder

use super::presenter::{self, Panel};
use super::state::{Effect, LookupView, Phase, RequestId, ViewEvent};
use crate::lens::lookup::{GeoSource, LookupFailure, LookupLens, LookupOutcome};
use crate::lens::map::{MapBinder, MapWidget};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

struct Completion {
    request_id: RequestId,
    outcome: LookupOutcome,
}

/// Delivers exactly one completion per request, even if the worker unwinds.
struct CompletionGuard {
    request_id: RequestId,
    sender: Option<Sender<Completion>>,
}

impl CompletionGuard {
    fn new(request_id: RequestId, sender: Sender<Completion>) -> Self {
        Self {
            request_id,
            sender: Some(sender),
        }
    }

    fn complete(mut self, outcome: LookupOutcome) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: LookupOutcome) {
        if let Some(sender) = self.sender.take() {
            let completion = Completion {
                request_id: self.request_id,
                outcome,
            };
            if sender.send(completion).is_err() {
                debug!("session closed before request {} completed", self.request_id);
            }
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.sender.is_some() {
            self.send(
                LookupFailure::TransportFailure("lookup worker exited without a result".to_string())
                    .into(),
            );
        }
    }
}

/// Interactive lookup session
///
/// Owns the view state and the map binder on the caller's thread; each lookup
/// runs on its own worker thread and reports back over a channel.
pub struct LookupSession<S, W: MapWidget> {
    view: LookupView,
    binder: MapBinder<W>,
    lens: Arc<LookupLens<S>>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl<S, W> LookupSession<S, W>
where
    S: GeoSource + Send + Sync + 'static,
    W: MapWidget,
{
    pub fn new(lens: LookupLens<S>, binder: MapBinder<W>) -> Self {
        let (sender, receiver) = channel();
        Self {
            view: LookupView::new(),
            binder,
            lens: Arc::new(lens),
            sender,
            receiver,
        }
    }

    pub fn view(&self) -> &LookupView {
        &self.view
    }

    pub fn binder(&self) -> &MapBinder<W> {
        &self.binder
    }

    /// Current result/error panel
    pub fn panel(&self) -> Panel {
        presenter::render(&self.view)
    }

    /// The live map, when its container is visible
    pub fn visible_map(&self) -> Option<&W::Handle> {
        match self.view.map_visible() {
            true => self.binder.handle(),
            false => None,
        }
    }

    /// Replace the input text
    pub fn input(&mut self, text: &str) {
        self.dispatch(ViewEvent::InputChanged(text.to_string()));
    }

    /// Submit the current input; returns blocking notifications to show the user
    pub fn submit(&mut self) -> Vec<String> {
        self.dispatch(ViewEvent::Submit)
    }

    /// Clear the input and anything shown for it
    pub fn clear(&mut self) {
        self.input("");
        self.submit();
    }

    pub fn show_more(&mut self) {
        self.dispatch(ViewEvent::ShowMore);
    }

    pub fn show_less(&mut self) {
        self.dispatch(ViewEvent::ShowLess);
    }

    /// Process completions until no lookup is outstanding or `timeout` elapses.
    ///
    /// Returns false on timeout. A timeout too large to form a deadline waits
    /// until the lookup completes.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while self.view.is_loading() {
            let completed = match deadline {
                Some(deadline) => {
                    self.next_completion(deadline.saturating_duration_since(Instant::now()))
                }
                None => self.next_completion_blocking(),
            };
            if !completed {
                return false;
            }
        }
        true
    }

    /// Process at most one completion, waiting up to `timeout` for it.
    pub fn next_completion(&mut self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(Completion {
                request_id,
                outcome,
            }) => {
                self.dispatch(ViewEvent::LookupCompleted {
                    request_id,
                    outcome,
                });
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn next_completion_blocking(&mut self) -> bool {
        match self.receiver.recv() {
            Ok(Completion {
                request_id,
                outcome,
            }) => {
                self.dispatch(ViewEvent::LookupCompleted {
                    request_id,
                    outcome,
                });
                true
            }
            Err(_) => false,
        }
    }

    fn dispatch(&mut self, event: ViewEvent) -> Vec<String> {
        if let ViewEvent::LookupCompleted { request_id, .. } = &event {
            if !matches!(self.view.phase(), Phase::Loading { request_id: pending } if pending == request_id)
            {
                warn!("discarding result of superseded request {}", request_id);
            }
        }

        let effects = self.view.apply(event);
        let mut alerts = vec![];
        for effect in effects {
            match effect {
                Effect::Alert(message) => alerts.push(message),
                Effect::DestroyMap => {
                    self.binder.teardown();
                }
                Effect::ShowMap { address, center } => {
                    let shown = match self.binder.recenter(&address) {
                        Ok(true) => Ok(()),
                        Ok(false) => self.binder.bind(&address, center),
                        Err(e) => Err(e),
                    };
                    if let Err(e) = shown {
                        warn!("unable to show map for {}: {:#}", address, e);
                    }
                }
                Effect::StartLookup { request_id, query } => self.spawn_lookup(request_id, query),
            }
        }
        alerts
    }

    fn spawn_lookup(&mut self, request_id: RequestId, query: String) {
        debug!("starting lookup {} for {}", request_id, query);
        let lens = Arc::clone(&self.lens);
        let guard = CompletionGuard::new(request_id, self.sender.clone());

        let spawned = thread::Builder::new()
            .name(format!("ipgeo-lookup-{}", request_id))
            .spawn(move || {
                let outcome = lens.lookup(&query);
                guard.complete(outcome);
            });

        // a failed spawn drops the closure, and with it the guard, which reports the failure
        if let Err(e) = spawned {
            warn!("unable to start lookup worker: {}", e);
        }
    }
}
