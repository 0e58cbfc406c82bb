//! Bridge between the synchronous UI loop and the tokio runtime.
//!
//! Every view gets a mount guard when it is shown. Fetches spawned under a
//! guard are cancelled when the view is torn down, and any result that still
//! slips through carries a stale mount id and is dropped by [`Tasks::is_current`].

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ApiError};
use crate::models::{Category, MonthlyReport, Transaction, User};
use crate::session::SessionStore;

/// Result of one piece of background work.
#[derive(Debug)]
pub(crate) enum Payload {
    Dashboard(Result<MonthlyReport, ApiError>),
    Transactions(Result<(Vec<Transaction>, Vec<Category>), ApiError>),
    Categories(Result<Vec<Category>, ApiError>),
    Report(Result<MonthlyReport, ApiError>),
    /// Create or update finished. `message` is shown on success.
    Saved {
        message: String,
        result: Result<(), ApiError>,
    },
    Deleted {
        message: String,
        result: Result<(), ApiError>,
    },
    Exported(Result<PathBuf, String>),
    /// Login or registration. The error is already user-facing text.
    Authenticated(Result<User, String>),
}

#[derive(Debug)]
pub(crate) struct AppEvent {
    pub(crate) mount: u64,
    pub(crate) payload: Payload,
}

pub(crate) struct Tasks {
    handle: Handle,
    client: Arc<ApiClient>,
    download_dir: PathBuf,
    tx: mpsc::UnboundedSender<AppEvent>,
    mount_id: u64,
    mount: CancellationToken,
}

impl Tasks {
    pub(crate) fn new(
        handle: Handle,
        client: Arc<ApiClient>,
        download_dir: PathBuf,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tasks = Self {
            handle,
            client,
            download_dir,
            tx,
            mount_id: 0,
            mount: CancellationToken::new(),
        };
        (tasks, rx)
    }

    pub(crate) fn session(&self) -> &Arc<SessionStore> {
        self.client.session()
    }

    pub(crate) fn download_dir(&self) -> &PathBuf {
        &self.download_dir
    }

    pub(crate) fn mount_id(&self) -> u64 {
        self.mount_id
    }

    /// Tears down the current view's guard and opens a new one.
    pub(crate) fn remount(&mut self) -> u64 {
        self.mount.cancel();
        self.mount = CancellationToken::new();
        self.mount_id += 1;
        tracing::trace!(mount = self.mount_id, "View mounted");
        self.mount_id
    }

    pub(crate) fn is_current(&self, event: &AppEvent) -> bool {
        event.mount == self.mount_id && !self.mount.is_cancelled()
    }

    /// Read-only work for the current view. Dropped outright when the view
    /// goes away.
    pub(crate) fn fetch<F, Fut>(&self, f: F)
    where
        F: FnOnce(Arc<ApiClient>) -> Fut + Send + 'static,
        Fut: Future<Output = Payload> + Send + 'static,
    {
        let tx = self.tx.clone();
        let cancel = self.mount.clone();
        let mount = self.mount_id;
        let client = Arc::clone(&self.client);
        self.handle.spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!(mount, "Fetch cancelled with its view");
                }
                payload = f(client) => {
                    if !cancel.is_cancelled() {
                        let _ = tx.send(AppEvent { mount, payload });
                    }
                }
            }
        });
    }

    /// Mutations run to completion even if the view changes; only the
    /// result is discarded.
    pub(crate) fn submit<F, Fut>(&self, f: F)
    where
        F: FnOnce(Arc<ApiClient>) -> Fut + Send + 'static,
        Fut: Future<Output = Payload> + Send + 'static,
    {
        let tx = self.tx.clone();
        let mount = self.mount_id;
        let client = Arc::clone(&self.client);
        self.handle.spawn(async move {
            let payload = f(client).await;
            let _ = tx.send(AppEvent { mount, payload });
        });
    }
}
