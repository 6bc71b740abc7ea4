use std::time::Duration;

use proptest::prelude::*;

use dmnt_sync::client::Translation;
use dmnt_sync::clock::ManualClock;
use dmnt_sync::store::MemoryStore;
use dmnt_sync::sync::{
    Completion, Dispatcher, IdleScheduler, NullSink, PaneId, SyncController, TranslationRequest,
};

/// Answers are held back until an `Answer` step releases the oldest one.
#[derive(Default)]
struct Held {
    sent: Vec<TranslationRequest>,
    pending: Vec<TranslationRequest>,
    ready: Vec<Completion>,
}

impl Held {
    fn release_oldest(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let request = self.pending.remove(0);
        // Output is tagged so anything derived from it is recognisable.
        let text = format!("T({})", request.text);
        self.ready.push(Completion {
            request,
            result: Ok(Translation::new(text, Vec::new())),
        });
    }
}

impl Dispatcher for Held {
    fn dispatch(&mut self, request: TranslationRequest) {
        self.sent.push(request.clone());
        self.pending.push(request);
    }

    fn drain(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.ready)
    }
}

#[derive(Debug, Clone)]
enum Step {
    Type(PaneId, String),
    Paste(PaneId, String),
    Wait(u64),
    Answer,
}

fn pane() -> impl Strategy<Value = PaneId> {
    prop_oneof![Just(PaneId::Source), Just(PaneId::Derived)]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (pane(), "[0-9A-F]{0,4}").prop_map(|(p, t)| Step::Type(p, t)),
        (pane(), "[0-9A-F]{1,4}").prop_map(|(p, t)| Step::Paste(p, t)),
        (0u64..5_000).prop_map(Step::Wait),
        Just(Step::Answer),
    ]
}

proptest! {
    #[test]
    fn applied_answers_never_feed_back(steps in prop::collection::vec(step(), 1..60)) {
        let clock = ManualClock::new();
        let mut ctl = SyncController::new(
            IdleScheduler::new(Duration::from_millis(1000), Duration::from_millis(3000)),
            Held::default(),
            clock.clone(),
            Box::new(MemoryStore::new()),
            Box::new(NullSink),
        );

        for step in steps {
            match step {
                Step::Type(p, t) => ctl.on_user_edit(p, &t),
                Step::Paste(p, t) => {
                    ctl.on_paste(p, &t);
                }
                Step::Wait(ms) => {
                    clock.advance(Duration::from_millis(ms));
                    ctl.tick();
                }
                Step::Answer => ctl.dispatcher_mut().release_oldest(),
            }
            ctl.pump();
        }

        let sent = &ctl.dispatcher().sent;
        for request in sent {
            // Only typed or pasted text ever leaves; never a translation.
            prop_assert!(!request.text.contains("T("), "fed back: {:?}", request);
            prop_assert!(!request.text.is_empty());
        }
        for pair in sent.windows(2) {
            prop_assert!(
                !(pair[0].direction == pair[1].direction && pair[0].text == pair[1].text),
                "sent twice in a row: {:?}",
                pair
            );
        }
    }
}
