use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::client::{TranslateError, Translation, TranslationClient};

use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One outgoing call. `text` is the source content captured at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub id: RequestId,
    pub direction: Direction,
    pub text: String,
}

#[derive(Debug)]
pub struct Completion {
    pub request: TranslationRequest,
    pub result: Result<Translation, TranslateError>,
}

/// Carries requests to a translation client without blocking the caller.
///
/// `dispatch` must return immediately; answers come back later through
/// `drain`.
pub trait Dispatcher {
    fn dispatch(&mut self, request: TranslationRequest);

    fn drain(&mut self) -> Vec<Completion> {
        Vec::new()
    }
}

impl<T: Dispatcher + ?Sized> Dispatcher for Box<T> {
    fn dispatch(&mut self, request: TranslationRequest) {
        (**self).dispatch(request)
    }

    fn drain(&mut self) -> Vec<Completion> {
        (**self).drain()
    }
}

/// Runs each request on its own worker thread and funnels the answers into a
/// channel read from the UI thread.
pub struct BackgroundDispatcher<C> {
    client: Arc<C>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl<C: TranslationClient + 'static> BackgroundDispatcher<C> {
    pub fn new(client: C) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client: Arc::new(client),
            tx,
            rx,
        }
    }
}

impl<C: TranslationClient + 'static> Dispatcher for BackgroundDispatcher<C> {
    fn dispatch(&mut self, request: TranslationRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let worker_request = request.clone();
        let spawned = thread::Builder::new()
            .name(format!("translate-{}", request.id.0))
            .spawn(move || {
                let result = client.translate(&worker_request.text, worker_request.direction);
                // The receiver only disappears at shutdown.
                let _ = tx.send(Completion {
                    request: worker_request,
                    result,
                });
            });
        if let Err(err) = spawned {
            tracing::warn!(id = %request.id, "could not start translation worker: {err}");
            let _ = self.tx.send(Completion {
                request,
                result: Err(TranslateError::WorkerGone),
            });
        }
    }

    fn drain(&mut self) -> Vec<Completion> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}
