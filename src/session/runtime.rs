//! Async executor for controller effects.
//!
//! Every effect becomes a spawned task that reports back by sending an `Event` into
//! the session channel. Only `SessionRuntime` touches the controller, so all state
//! changes happen one event at a time on the task that drives the loop.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::core::error::AppError;
use crate::download::backend::Backend;
use crate::download::save::FileSaver;
use crate::session::controller::{Controller, Effect, Event};
use crate::session::state::{DownloadState, FetchState};

/// Cloneable entry point for events that originate outside the loop (Ctrl-C, UI).
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl SessionHandle {
    /// Queue an event. Returns false once the session has been dropped.
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn cancel(&self) -> bool {
        self.send(Event::Cancel)
    }
}

pub struct SessionRuntime {
    controller: Controller,
    backend: Arc<dyn Backend>,
    saver: Arc<dyn FileSaver>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl SessionRuntime {
    pub fn new(backend: Arc<dyn Backend>, saver: Arc<dyn FileSaver>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        log::debug!("Session created with {} backend", backend.name());
        Self {
            controller: Controller::new(),
            backend,
            saver,
            events_tx,
            events_rx,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.events_tx.clone(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Apply an event now and start whatever it asks for.
    pub fn dispatch(&mut self, event: Event) {
        for effect in self.controller.handle(event) {
            self.spawn_effect(effect);
        }
    }

    /// Wait for the next queued event and apply it. Returns false if the channel closed.
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Drive the loop until `done` holds, calling `observe` after every applied event.
    pub async fn run_until<D, O>(&mut self, mut done: D, mut observe: O)
    where
        D: FnMut(&Controller) -> bool,
        O: FnMut(&Controller),
    {
        observe(&self.controller);
        while !done(&self.controller) {
            if !self.next_event().await {
                break;
            }
            observe(&self.controller);
        }
    }

    /// Submit a URL and wait for the fetch to settle.
    pub async fn fetch(&mut self, url: &str) -> FetchState {
        self.dispatch(Event::Submit(url.to_string()));
        self.run_until(|c| !c.fetch_state().is_fetching(), |_| {}).await;
        self.controller.fetch_state().clone()
    }

    /// Start a download with the current selection and wait until it ends.
    pub async fn download(&mut self) -> DownloadState {
        self.download_observed(|_| {}).await
    }

    pub async fn download_observed<O>(&mut self, observe: O) -> DownloadState
    where
        O: FnMut(&Controller),
    {
        self.dispatch(Event::Download);
        self.run_until(download_settled, observe).await;
        self.controller.download_state().clone()
    }

    fn spawn_effect(&self, effect: Effect) {
        let tx = self.events_tx.clone();

        match effect {
            Effect::FetchInfo { generation, url } => {
                let backend = Arc::clone(&self.backend);
                tokio::spawn(async move {
                    let result = supervised(async move { backend.fetch_info(&url).await }).await;
                    let _ = tx.send(Event::FetchFinished { generation, result });
                });
            }
            Effect::StartDownload {
                attempt,
                request,
                cancel,
            } => {
                let backend = Arc::clone(&self.backend);
                let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();

                // Forward transfer progress into the session as events
                let progress_events = tx.clone();
                tokio::spawn(async move {
                    while let Some(progress) = progress_rx.recv().await {
                        if progress_events
                            .send(Event::DownloadProgress { attempt, progress })
                            .is_err()
                        {
                            break;
                        }
                    }
                });

                tokio::spawn(async move {
                    let result =
                        supervised(async move { backend.download(&request, cancel, progress_tx).await }).await;
                    let _ = tx.send(Event::DownloadFinished { attempt, result });
                });
            }
            Effect::Save {
                attempt,
                filename,
                payload,
            } => {
                let saver = Arc::clone(&self.saver);
                tokio::spawn(async move {
                    let result = supervised(async move { saver.save(&filename, &payload.bytes).await }).await;
                    let _ = tx.send(Event::SaveFinished { attempt, result });
                });
            }
            Effect::DismissNoticeAfter { id, after } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Event::DismissNotice(id));
                });
            }
            Effect::HideProgressAfter { attempt, after } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Event::HideProgress { attempt });
                });
            }
        }
    }
}

/// Run `work` on its own task so a panic still produces a completion event.
async fn supervised<T, F>(work: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Session task failed: {}", e);
            Err(AppError::Task(e))
        }
    }
}

/// Nothing in flight and no save pending.
fn download_settled(controller: &Controller) -> bool {
    !controller.has_in_flight() && !matches!(controller.download_state(), DownloadState::Saving { .. })
}
