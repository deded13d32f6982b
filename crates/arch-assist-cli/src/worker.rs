//! Background worker thread for catalog loads and captures

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use arch_assist_core::{CaptureAdapter, CaptureError, Catalog, Error};
use tracing::{debug, error};

use crate::app::{AppMessage, WorkerMessage};

/// Background worker owning the async runtime
pub struct Worker {
    handle: Option<JoinHandle<()>>,
    tx: Sender<WorkerMessage>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(adapter: CaptureAdapter, app_tx: Sender<AppMessage>) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel::<WorkerMessage>();

        let handle = thread::spawn(move || {
            run_worker(worker_rx, app_tx, adapter);
        });

        Self {
            handle: Some(handle),
            tx: worker_tx,
        }
    }

    /// Get a sender for sending messages to the worker
    pub fn sender(&self) -> Sender<WorkerMessage> {
        self.tx.clone()
    }

    /// Shutdown the worker and wait for it to finish
    pub fn shutdown(mut self) {
        let _ = self.tx.send(WorkerMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(rx: Receiver<WorkerMessage>, app_tx: Sender<AppMessage>, adapter: CaptureAdapter) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => Some(runtime),
        Err(e) => {
            error!("failed to start worker runtime: {}", e);
            None
        }
    };

    loop {
        match rx.recv() {
            Ok(WorkerMessage::Capture(ticket)) => {
                debug!("worker capturing {}", ticket.step().label());
                let result = match &runtime {
                    Some(rt) => rt.block_on(adapter.request_capture()),
                    None => Err(CaptureError::CaptureFailed(
                        "background runtime unavailable".to_string(),
                    )),
                };
                let _ = app_tx.send(AppMessage::CaptureFinished { ticket, result });
            }
            Ok(WorkerMessage::LoadCatalog(path)) => {
                let result = load_catalog(runtime.as_ref(), path);
                let _ = app_tx.send(AppMessage::CatalogLoaded(result));
            }
            Ok(WorkerMessage::Shutdown) | Err(_) => {
                break;
            }
        }
    }
}

fn load_catalog(
    runtime: Option<&tokio::runtime::Runtime>,
    path: PathBuf,
) -> arch_assist_core::Result<Catalog> {
    match runtime {
        Some(rt) => rt.block_on(Catalog::load(&path)),
        None => Err(Error::CatalogLoad {
            path,
            reason: "background runtime unavailable".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_assist_core::{CaptureFlow, CaptureStep};
    use std::time::{Duration, Instant};

    #[test]
    fn test_worker_reports_host_unavailable() {
        let (app_tx, app_rx) = mpsc::channel();
        let worker = Worker::spawn(CaptureAdapter::unavailable(), app_tx);

        let mut flow = CaptureFlow::default();
        flow.start(true, Instant::now());
        let ticket = flow.begin_capture(CaptureStep::First).unwrap();
        worker.sender().send(WorkerMessage::Capture(ticket)).unwrap();

        match app_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppMessage::CaptureFinished { ticket: got, result } => {
                assert_eq!(got, ticket);
                assert_eq!(result.unwrap_err(), CaptureError::HostUnavailable);
            }
            other => panic!("unexpected message: {:?}", other),
        }
        worker.shutdown();
    }

    #[test]
    fn test_worker_loads_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.json");
        std::fs::write(&path, r#"{"Metals": ["Iron"]}"#).unwrap();

        let (app_tx, app_rx) = mpsc::channel();
        let worker = Worker::spawn(CaptureAdapter::unavailable(), app_tx);
        worker.sender().send(WorkerMessage::LoadCatalog(path)).unwrap();

        match app_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppMessage::CatalogLoaded(result) => assert_eq!(result.unwrap().len(), 1),
            other => panic!("unexpected message: {:?}", other),
        }
        worker.shutdown();
    }
}
