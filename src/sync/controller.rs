//! The synchronization controller.
//!
//! Owns both panes and decides when the translation service is called and
//! whether an answer may be applied. Every method runs to completion on the
//! UI thread; the only thing that happens elsewhere is the translation call
//! itself, whose answer is fed back through [`SyncController::pump`].
//!
//! Rules enforced here:
//! - a programmatic write never moves a pane's edit timestamp nor the active
//!   direction, so an applied result cannot trigger its own re-translation;
//! - a pane's text is never sent twice in a row, and empty text is never sent;
//! - an answer is applied only if its source pane still holds the exact text
//!   that was sent and the target pane has not been edited since dispatch.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::client::Translation;
use crate::constants::TRANSLATION_FAILED_NOTICE;
use crate::store::{SessionSnapshot, SessionStore};

use super::direction::{Direction, FocusTracker};
use super::dispatch::{Completion, Dispatcher, RequestId, TranslationRequest};
use super::pane::{Origin, Pane, PaneId};
use super::scheduler::IdleScheduler;

/// Receives the single display string for the diagnostics area.
pub trait DiagnosticsSink {
    fn show(&mut self, text: &str);
}

/// Discards everything. Handy when nothing renders diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn show(&mut self, _text: &str) {}
}

/// What happened to one completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied {
        id: RequestId,
        direction: Direction,
    },
    /// The source moved on (or the target was edited) while in flight.
    Discarded {
        id: RequestId,
        direction: Direction,
    },
    Failed {
        id: RequestId,
        direction: Direction,
    },
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    direction: Direction,
    dispatched_at: Instant,
}

pub struct SyncController<D, K = SystemClock> {
    panes: [Pane; 2],
    focus: FocusTracker,
    scheduler: IdleScheduler,
    dispatcher: D,
    clock: K,
    store: Box<dyn SessionStore>,
    sink: Box<dyn DiagnosticsSink>,
    diagnostics: String,
    next_id: u64,
    in_flight: BTreeMap<RequestId, InFlight>,
    last_outcome: Option<SyncOutcome>,
}

impl<D: Dispatcher, K: Clock> SyncController<D, K> {
    pub fn new(
        scheduler: IdleScheduler,
        dispatcher: D,
        clock: K,
        store: Box<dyn SessionStore>,
        sink: Box<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            panes: [Pane::new(PaneId::Source), Pane::new(PaneId::Derived)],
            focus: FocusTracker::new(),
            scheduler,
            dispatcher,
            clock,
            store,
            sink,
            diagnostics: String::new(),
            next_id: 0,
            in_flight: BTreeMap::new(),
            last_outcome: None,
        }
    }

    /// Seed both panes and the diagnostics text from the session store.
    ///
    /// Restored text is treated as already in sync: it is written
    /// programmatically and marked as requested so nothing is sent until the
    /// user edits again.
    pub fn restore(&mut self) -> SessionSnapshot {
        let snapshot = match self.store.load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("could not load saved session, starting empty: {err}");
                SessionSnapshot::default()
            }
        };
        let now = self.clock.now();
        for id in PaneId::ALL {
            let pane = &mut self.panes[id.index()];
            pane.set_content(snapshot.pane(id), Origin::Programmatic, now);
            pane.mark_requested();
        }
        snapshot.diagnostics.clone_into(&mut self.diagnostics);
        self.sink.show(&self.diagnostics);
        debug!(
            source_len = snapshot.source.len(),
            derived_len = snapshot.derived.len(),
            "session restored"
        );
        snapshot
    }

    /// Programmatic write that neither counts as activity nor dispatches.
    pub fn load_programmatic(&mut self, pane: PaneId, text: &str) {
        let now = self.clock.now();
        self.panes[pane.index()].set_content(text, Origin::Programmatic, now);
        self.persist_pane(pane);
    }

    /// A keystroke-level edit. Translation is left to the idle poll.
    pub fn on_user_edit(&mut self, pane: PaneId, text: &str) {
        let now = self.clock.now();
        self.panes[pane.index()].set_content(text, Origin::User, now);
        self.focus.record_activity(pane);
        self.persist_pane(pane);
    }

    /// Paste is an explicit intent signal: translate without waiting.
    pub fn on_paste(&mut self, pane: PaneId, text: &str) -> Option<RequestId> {
        self.on_user_edit(pane, text);
        self.trigger_translation(Direction::from_source(pane))
    }

    /// A whole document dropped onto a pane. Translates immediately.
    pub fn on_import(&mut self, pane: PaneId, text: &str) -> Option<RequestId> {
        self.on_user_edit(pane, text);
        info!(%pane, bytes = text.len(), "imported document");
        self.trigger_translation(Direction::from_source(pane))
    }

    /// Send the source pane of `direction` unless it is empty or was already
    /// sent.
    pub fn trigger_translation(&mut self, direction: Direction) -> Option<RequestId> {
        let pane = &mut self.panes[direction.source().index()];
        if !pane.needs_request() {
            return None;
        }
        // Mark before dispatch so a second trigger during flight is a no-op.
        let text = pane.mark_requested();
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.in_flight.insert(
            id,
            InFlight {
                direction,
                dispatched_at: self.clock.now(),
            },
        );
        debug!(%id, %direction, bytes = text.len(), "dispatching translation");
        self.dispatcher.dispatch(TranslationRequest {
            id,
            direction,
            text,
        });
        Some(id)
    }

    /// One idle-poll step. Call as often as convenient; it only acts once
    /// per poll interval.
    pub fn tick(&mut self) -> Option<RequestId> {
        let now = self.clock.now();
        if !self.scheduler.tick_due(now) {
            return None;
        }
        let direction = self.focus.active_direction();
        if self
            .scheduler
            .should_request(&self.panes[direction.source().index()], now)
        {
            self.trigger_translation(direction)
        } else {
            None
        }
    }

    /// Apply every answer that has arrived since the last call.
    pub fn pump(&mut self) -> Vec<SyncOutcome> {
        self.dispatcher
            .drain()
            .into_iter()
            .map(|completion| self.on_completion(completion))
            .collect()
    }

    pub fn on_completion(&mut self, completion: Completion) -> SyncOutcome {
        let Completion { request, result } = completion;
        if self.scheduler.is_cancelled() {
            return SyncOutcome::Discarded {
                id: request.id,
                direction: request.direction,
            };
        }
        let flight = self.in_flight.remove(&request.id);
        let outcome = match result {
            Ok(translation) => self.apply(&request, flight, translation),
            Err(err) => {
                warn!(id = %request.id, direction = %request.direction, "translation failed: {err}");
                let source = &mut self.panes[request.direction.source().index()];
                // A newer request owns the marker and the diagnostics.
                if !source.rollback_request(&request.text) {
                    debug!(id = %request.id, "failed request was superseded, ignoring");
                    let outcome = SyncOutcome::Discarded {
                        id: request.id,
                        direction: request.direction,
                    };
                    self.last_outcome = Some(outcome);
                    return outcome;
                }
                debug!(id = %request.id, "request marker rolled back for retry");
                self.set_diagnostics(TRANSLATION_FAILED_NOTICE);
                SyncOutcome::Failed {
                    id: request.id,
                    direction: request.direction,
                }
            }
        };
        self.last_outcome = Some(outcome);
        outcome
    }

    fn apply(
        &mut self,
        request: &TranslationRequest,
        flight: Option<InFlight>,
        translation: Translation,
    ) -> SyncOutcome {
        let direction = request.direction;
        let discarded = SyncOutcome::Discarded {
            id: request.id,
            direction,
        };
        if self.panes[direction.source().index()].is_stale(&request.text) {
            debug!(id = %request.id, %direction, "source changed while in flight, dropping answer");
            return discarded;
        }
        let target = &self.panes[direction.target().index()];
        if let (Some(flight), Some(edited)) = (flight, target.last_edit())
            && edited > flight.dispatched_at
        {
            debug!(id = %request.id, %direction, "target edited while in flight, dropping answer");
            return discarded;
        }

        let now = self.clock.now();
        self.panes[direction.target().index()].set_content(
            translation.text,
            Origin::Programmatic,
            now,
        );
        self.persist_pane(direction.target());
        let joined = translation.diagnostics.join("\n");
        self.set_diagnostics(&joined);
        info!(
            id = %request.id,
            %direction,
            diagnostics = translation.diagnostics.len(),
            "translation applied"
        );
        SyncOutcome::Applied {
            id: request.id,
            direction,
        }
    }

    fn set_diagnostics(&mut self, text: &str) {
        text.clone_into(&mut self.diagnostics);
        self.sink.show(text);
        if let Err(err) = self.store.save_diagnostics(text) {
            warn!("could not persist diagnostics: {err}");
        }
    }

    fn persist_pane(&mut self, id: PaneId) {
        let text = self.panes[id.index()].content();
        if let Err(err) = self.store.save_pane(id, text) {
            warn!(pane = %id, "could not persist pane: {err}");
        }
    }

    /// Stop the idle poll and flush state. Answers still in flight are
    /// ignored from here on.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        self.in_flight.clear();
        for id in PaneId::ALL {
            self.persist_pane(id);
        }
        let diagnostics = self.diagnostics.clone();
        if let Err(err) = self.store.save_diagnostics(&diagnostics) {
            warn!("could not persist diagnostics: {err}");
        }
        debug!("sync controller shut down");
    }

    pub fn pane(&self, id: PaneId) -> &Pane {
        &self.panes[id.index()]
    }

    pub fn active_direction(&self) -> Direction {
        self.focus.active_direction()
    }

    pub fn diagnostics(&self) -> &str {
        &self.diagnostics
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.last_outcome
    }

    pub fn scheduler(&self) -> &IdleScheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::client::TranslateError;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct Recording {
        sent: Vec<TranslationRequest>,
    }

    impl Dispatcher for Recording {
        fn dispatch(&mut self, request: TranslationRequest) {
            self.sent.push(request);
        }
    }

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<String>>>);

    impl DiagnosticsSink for SharedSink {
        fn show(&mut self, text: &str) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    impl SharedSink {
        fn last(&self) -> Option<String> {
            self.0.borrow().last().cloned()
        }
    }

    fn controller() -> (SyncController<Recording, ManualClock>, ManualClock, SharedSink) {
        let clock = ManualClock::new();
        let sink = SharedSink::default();
        let ctl = SyncController::new(
            IdleScheduler::new(Duration::from_secs(1), Duration::from_secs(3)),
            Recording::default(),
            clock.clone(),
            Box::new(MemoryStore::new()),
            Box::new(sink.clone()),
        );
        (ctl, clock, sink)
    }

    fn ok(request: &TranslationRequest, text: &str, diagnostics: &[&str]) -> Completion {
        Completion {
            request: request.clone(),
            result: Ok(Translation::new(
                text,
                diagnostics.iter().map(|d| d.to_string()).collect(),
            )),
        }
    }

    #[test]
    fn user_edit_does_not_dispatch() {
        let (mut ctl, _, _) = controller();
        ctl.on_user_edit(PaneId::Source, "80000002");
        assert!(ctl.dispatcher().sent.is_empty());
        assert_eq!(ctl.active_direction(), Direction::SourceToDerived);
    }

    #[test]
    fn trigger_twice_dispatches_once() {
        let (mut ctl, _, _) = controller();
        ctl.on_user_edit(PaneId::Source, "X");
        assert!(ctl.trigger_translation(Direction::SourceToDerived).is_some());
        assert!(ctl.trigger_translation(Direction::SourceToDerived).is_none());
        assert_eq!(ctl.dispatcher().sent.len(), 1);
    }

    #[test]
    fn empty_source_never_dispatches() {
        let (mut ctl, _, _) = controller();
        ctl.on_user_edit(PaneId::Derived, "");
        assert!(ctl.trigger_translation(Direction::DerivedToSource).is_none());
        assert!(ctl.on_paste(PaneId::Source, "").is_none());
        assert!(ctl.dispatcher().sent.is_empty());
    }

    #[test]
    fn stale_answer_is_dropped() {
        let (mut ctl, _, _) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        let req = ctl.dispatcher().sent[0].clone();
        ctl.on_user_edit(PaneId::Source, "B");
        let outcome = ctl.on_completion(ok(&req, "dism of A", &[]));
        assert!(matches!(outcome, SyncOutcome::Discarded { .. }));
        assert_eq!(ctl.pane(PaneId::Derived).content(), "");
    }

    #[test]
    fn older_answer_after_newer_dispatch_is_dropped() {
        let (mut ctl, _, _) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        ctl.on_user_edit(PaneId::Source, "B");
        ctl.trigger_translation(Direction::SourceToDerived);
        let first = ctl.dispatcher().sent[0].clone();
        let second = ctl.dispatcher().sent[1].clone();

        assert!(matches!(
            ctl.on_completion(ok(&second, "dism B", &[])),
            SyncOutcome::Applied { .. }
        ));
        assert!(matches!(
            ctl.on_completion(ok(&first, "dism A", &[])),
            SyncOutcome::Discarded { .. }
        ));
        assert_eq!(ctl.pane(PaneId::Derived).content(), "dism B");
    }

    #[test]
    fn applied_answer_is_programmatic() {
        let (mut ctl, clock, _) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        let req = ctl.dispatcher().sent[0].clone();
        clock.advance(Duration::from_secs(1));
        ctl.on_completion(ok(&req, "dism", &[]));
        let derived = ctl.pane(PaneId::Derived);
        assert_eq!(derived.content(), "dism");
        assert_eq!(derived.last_edit(), None);
        assert_eq!(ctl.active_direction(), Direction::SourceToDerived);
    }

    #[test]
    fn applied_answer_does_not_retranslate_on_later_ticks() {
        let (mut ctl, clock, _) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        let req = ctl.dispatcher().sent[0].clone();
        ctl.on_completion(ok(&req, "dism", &[]));
        for _ in 0..10 {
            clock.advance(Duration::from_secs(1));
            assert!(ctl.tick().is_none());
        }
        assert_eq!(ctl.dispatcher().sent.len(), 1);
    }

    #[test]
    fn diagnostics_are_joined_and_cleared() {
        let (mut ctl, _, sink) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        let req = ctl.dispatcher().sent[0].clone();
        ctl.on_completion(ok(&req, "", &["line 1: x", "line 2: y"]));
        assert_eq!(sink.last().as_deref(), Some("line 1: x\nline 2: y"));

        ctl.on_user_edit(PaneId::Source, "B");
        ctl.trigger_translation(Direction::SourceToDerived);
        let req = ctl.dispatcher().sent[1].clone();
        ctl.on_completion(ok(&req, "ok", &[]));
        assert_eq!(sink.last().as_deref(), Some(""));
        assert_eq!(ctl.diagnostics(), "");
    }

    #[test]
    fn failure_reports_notice_and_allows_retry() {
        let (mut ctl, clock, sink) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        let req = ctl.dispatcher().sent[0].clone();
        let outcome = ctl.on_completion(Completion {
            request: req,
            result: Err(TranslateError::WorkerGone),
        });
        assert!(matches!(outcome, SyncOutcome::Failed { .. }));
        assert_eq!(sink.last().as_deref(), Some(TRANSLATION_FAILED_NOTICE));
        assert_eq!(ctl.pane(PaneId::Derived).content(), "");

        clock.advance(Duration::from_secs(5));
        ctl.tick();
        clock.advance(Duration::from_secs(1));
        assert!(ctl.tick().is_some());
        assert_eq!(ctl.dispatcher().sent.len(), 2);
        assert_eq!(ctl.dispatcher().sent[1].text, "A");
    }

    #[test]
    fn failure_of_superseded_request_keeps_newer_marker() {
        let (mut ctl, _, _) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        ctl.on_user_edit(PaneId::Source, "B");
        ctl.trigger_translation(Direction::SourceToDerived);
        let first = ctl.dispatcher().sent[0].clone();
        ctl.on_completion(Completion {
            request: first,
            result: Err(TranslateError::WorkerGone),
        });
        assert_eq!(ctl.pane(PaneId::Source).last_requested(), "B");
    }

    #[test]
    fn superseded_failure_leaves_synced_diagnostics_alone() {
        let (mut ctl, _, sink) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        ctl.on_user_edit(PaneId::Source, "B");
        ctl.trigger_translation(Direction::SourceToDerived);
        let first = ctl.dispatcher().sent[0].clone();
        let second = ctl.dispatcher().sent[1].clone();

        ctl.on_completion(ok(&second, "dism B", &[]));
        let outcome = ctl.on_completion(Completion {
            request: first,
            result: Err(TranslateError::WorkerGone),
        });

        assert!(matches!(outcome, SyncOutcome::Discarded { .. }));
        assert_eq!(ctl.last_outcome(), Some(outcome));
        assert_eq!(ctl.diagnostics(), "");
        assert_eq!(sink.last().as_deref(), Some(""));
        assert_eq!(ctl.pane(PaneId::Derived).content(), "dism B");
        assert_eq!(ctl.pane(PaneId::Source).last_requested(), "B");
    }

    #[test]
    fn target_edit_during_flight_wins() {
        let (mut ctl, clock, _) = controller();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.trigger_translation(Direction::SourceToDerived);
        let req = ctl.dispatcher().sent[0].clone();
        clock.advance(Duration::from_millis(200));
        ctl.on_user_edit(PaneId::Derived, "hand written");
        let outcome = ctl.on_completion(ok(&req, "dism", &[]));
        assert!(matches!(outcome, SyncOutcome::Discarded { .. }));
        assert_eq!(ctl.pane(PaneId::Derived).content(), "hand written");
        assert_eq!(ctl.active_direction(), Direction::DerivedToSource);
    }

    #[test]
    fn tick_waits_for_idle_threshold() {
        let (mut ctl, clock, _) = controller();
        ctl.tick();
        ctl.on_user_edit(PaneId::Source, "A");
        clock.advance(Duration::from_secs(1));
        assert!(ctl.tick().is_none());
        clock.advance(Duration::from_secs(1));
        assert!(ctl.tick().is_none());
        clock.advance(Duration::from_secs(1));
        assert!(ctl.tick().is_some());
    }

    #[test]
    fn tick_follows_last_edited_pane() {
        let (mut ctl, clock, _) = controller();
        ctl.tick();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.on_user_edit(PaneId::Derived, "nop");
        clock.advance(Duration::from_secs(3));
        ctl.tick();
        let sent = &ctl.dispatcher().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].direction, Direction::DerivedToSource);
        assert_eq!(sent[0].text, "nop");
    }

    #[test]
    fn restore_does_not_schedule_translation() {
        let clock = ManualClock::new();
        let store = MemoryStore::with_snapshot(SessionSnapshot {
            source: "[Inf HP]".into(),
            derived: "nop".into(),
            diagnostics: "old warning".into(),
        });
        let sink = SharedSink::default();
        let mut ctl = SyncController::new(
            IdleScheduler::new(Duration::from_secs(1), Duration::from_secs(3)),
            Recording::default(),
            clock.clone(),
            Box::new(store),
            Box::new(sink.clone()),
        );
        ctl.restore();
        assert_eq!(ctl.pane(PaneId::Source).content(), "[Inf HP]");
        assert_eq!(sink.last().as_deref(), Some("old warning"));
        ctl.tick();
        clock.advance(Duration::from_secs(10));
        assert!(ctl.tick().is_none());
    }

    #[test]
    fn shutdown_cancels_polling_and_ignores_late_answers() {
        let (mut ctl, clock, _) = controller();
        ctl.tick();
        ctl.on_user_edit(PaneId::Source, "A");
        ctl.shutdown();
        clock.advance(Duration::from_secs(10));
        assert!(ctl.tick().is_none());
        assert!(ctl.scheduler().is_cancelled());
        assert_eq!(ctl.in_flight(), 0);
    }
}
