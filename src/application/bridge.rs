//! Hand-off of progress events from a download worker thread to the UI
//! context.
//!
//! The worker only ever posts immutable events; the UI side drains them in
//! the order they were posted and applies them to its own state. Nothing on
//! the worker side touches UI state.

use futures::Stream;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::domain::{ProgressEvent, SessionId};

/// A progress event tagged with the session that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub session: SessionId,
    pub event: ProgressEvent,
}

/// Producer half, handed to the worker.
#[derive(Debug, Clone)]
pub struct UiDispatcher {
    tx: UnboundedSender<Dispatched>,
}

/// Consumer half, owned by the UI context.
#[derive(Debug)]
pub struct UiReceiver {
    rx: UnboundedReceiver<Dispatched>,
}

pub fn dispatcher() -> (UiDispatcher, UiReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiDispatcher { tx }, UiReceiver { rx })
}

impl UiDispatcher {
    /// Queue `event` for the UI context. Never blocks. Returns `false` once
    /// the receiving side is gone, in which case the event has nowhere to go.
    pub fn post(&self, session: SessionId, event: ProgressEvent) -> bool {
        match self.tx.send(Dispatched { session, event }) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("UI receiver closed, dropping event for session {}", session);
                false
            }
        }
    }
}

impl UiReceiver {
    /// Everything queued so far, oldest first, without waiting.
    pub fn drain(&mut self) -> Vec<Dispatched> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(item) => events.push(item),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Stream of events that ends once every dispatcher has been dropped.
    pub fn into_stream(self) -> impl Stream<Item = Dispatched> + Send + 'static {
        futures::stream::unfold(self.rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
    }
}
