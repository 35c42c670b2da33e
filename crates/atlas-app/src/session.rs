//! Session loop
//!
//! One task owns the [`App`] and drains an event channel. Fetches run as
//! spawned tasks and post their result back as `LoadFinished`, so state is
//! only ever touched from the loop.

use crate::app::{App, LoadOutcome};
use crate::event::{AppEvent, LoadTicket, UiEvent};
use crate::notify::Notifier;
use crate::state::{MarkerSummary, StatusReport};
use atlas_feed::CountrySource;
use atlas_render::MapRenderer;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Cloneable sender side of a running session
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl SessionHandle {
    /// Queue a UI event. Returns false once the session has stopped.
    pub fn send(&self, event: UiEvent) -> bool {
        self.tx.send(AppEvent::Ui(event)).is_ok()
    }

    /// Snapshot of the current state, `None` once the session has stopped
    pub async fn status(&self) -> Option<StatusReport> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(AppEvent::Status(reply)).ok()?;
        rx.await.ok()
    }

    /// Visible markers, `None` once the session has stopped
    pub async fn markers(&self) -> Option<Vec<MarkerSummary>> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(AppEvent::Markers(reply)).ok()?;
        rx.await.ok()
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(AppEvent::Shutdown);
    }
}

pub struct Session<S, R: MapRenderer, N: Notifier> {
    app: App<R, N>,
    source: Arc<S>,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<S, R, N> Session<S, R, N>
where
    S: CountrySource + 'static,
    R: MapRenderer,
    N: Notifier,
{
    pub fn new(app: App<R, N>, source: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            app,
            source: Arc::new(source),
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run until `Shutdown`, returning the app for inspection.
    ///
    /// The initial load is issued immediately, the map being ready to draw.
    pub async fn run(mut self) -> App<R, N> {
        info!("Session started");
        let ticket = self.app.begin_load();
        self.spawn_load(ticket);

        while let Some(event) = self.rx.recv().await {
            match event {
                AppEvent::Ui(ui) => {
                    debug!("UI event {:?}", ui);
                    if let Some(ticket) = self.app.handle(ui) {
                        self.spawn_load(ticket);
                    }
                }
                AppEvent::LoadFinished { ticket, result } => {
                    if self.app.finish_load(ticket, result) == LoadOutcome::Stale {
                        warn!("Load {:?} finished after a newer one was issued", ticket);
                    }
                }
                AppEvent::Status(reply) => {
                    let _ = reply.send(self.app.state().report());
                }
                AppEvent::Markers(reply) => {
                    let _ = reply.send(self.app.state().visible_markers());
                }
                AppEvent::Shutdown => break,
            }
        }

        info!("Session stopped");
        self.app
    }

    fn spawn_load(&self, ticket: LoadTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = atlas_feed::load(source.as_ref()).await;
            let _ = tx.send(AppEvent::LoadFinished { ticket, result });
        });
    }
}
