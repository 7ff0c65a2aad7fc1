// ── Action dispatcher ──
//
// Gates and sequences the four user intents (add, wake, remove,
// refresh) behind the single-flight guard, runs the network call, and
// reconciles the outcome into the list snapshot and feedback events.
//
// Concurrency model: cooperative and event-driven. The guard is
// checked-and-set atomically before any network call and released
// unconditionally (via a drop guard) on every exit path. An intent
// arriving while the guard is held is dropped, not queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use wolhub_api::{TransportConfig, WolClient};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::feedback::{Feedback, Intent, ListView, Notification};
use crate::model::{DeviceForm, IdentityKey};

const FEEDBACK_CHANNEL_SIZE: usize = 64;

// ── Dispatch outcome ─────────────────────────────────────────────────

/// What became of a dispatched intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The operation ran to completion; `ok` reflects the server's
    /// verdict. Failure details arrive through the feedback channel.
    Completed { ok: bool },
    /// The guard was busy; the intent was silently discarded.
    Dropped,
}

impl Dispatch {
    pub fn was_dropped(self) -> bool {
        self == Self::Dropped
    }

    pub fn succeeded(self) -> bool {
        self == Self::Completed { ok: true }
    }
}

// ── Dispatcher ───────────────────────────────────────────────────────

/// The operation orchestrator. Cheaply cloneable via `Arc`.
///
/// Owns the only two pieces of shared state in the system: the
/// single-flight guard and the last-fetched device snapshot. The view
/// layer observes both and never mutates either.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    client: WolClient,
    identity: IdentityKey,
    busy: AtomicBool,
    list_tx: watch::Sender<ListView>,
    feedback_tx: broadcast::Sender<Feedback>,
}

impl Dispatcher {
    /// Build a dispatcher from resolved configuration.
    pub fn new(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = WolClient::new(config.server.as_str(), &transport)?;
        Ok(Self::from_client(client, config.identity))
    }

    /// Wrap an existing client (used by tests).
    pub fn from_client(client: WolClient, identity: IdentityKey) -> Self {
        let (list_tx, _) = watch::channel(ListView::default());
        let (feedback_tx, _) = broadcast::channel(FEEDBACK_CHANNEL_SIZE);

        Self {
            inner: Arc::new(Inner {
                client,
                identity,
                busy: AtomicBool::new(false),
                list_tx,
                feedback_tx,
            }),
        }
    }

    /// The configured identifying field.
    pub fn identity(&self) -> IdentityKey {
        self.inner.identity
    }

    /// Subscribe to device list snapshots.
    pub fn list_view(&self) -> watch::Receiver<ListView> {
        self.inner.list_tx.subscribe()
    }

    /// Subscribe to feedback events (op lifecycle + notifications).
    pub fn feedback(&self) -> broadcast::Receiver<Feedback> {
        self.inner.feedback_tx.subscribe()
    }

    /// Whether a network operation is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    // ── Intents ──────────────────────────────────────────────────────

    /// Register the device described by `form`, then refresh the list.
    ///
    /// On success the form-clear signal and a success notification are
    /// emitted; on failure the form is left intact and the error
    /// notification carries the server detail when one exists.
    pub async fn submit_add(&self, form: DeviceForm) -> Dispatch {
        let Some(_busy) = self.acquire(Intent::Add) else {
            return Dispatch::Dropped;
        };

        let device = form.assemble();
        match self.inner.client.create(&device).await {
            Ok(()) => {
                self.notify(Notification::success("Device added successfully!"));
                self.emit(Feedback::ClearForm);
                self.reload_list().await;
                Dispatch::Completed { ok: true }
            }
            Err(err) => {
                self.notify(Notification::error(failure_message(Intent::Add, &err)));
                Dispatch::Completed { ok: false }
            }
        }
    }

    /// Ask the server to wake the device keyed by `identifier`.
    ///
    /// The success notification is the server's `{message}` verbatim.
    /// Waking does not change the registry, so no refresh follows.
    pub async fn wake(&self, identifier: &str) -> Dispatch {
        let Some(_busy) = self.acquire(Intent::Wake) else {
            return Dispatch::Dropped;
        };

        match self.inner.client.wake(identifier).await {
            Ok(receipt) => {
                self.notify(Notification::success(receipt.message));
                Dispatch::Completed { ok: true }
            }
            Err(err) => {
                self.notify(Notification::error(failure_message(Intent::Wake, &err)));
                Dispatch::Completed { ok: false }
            }
        }
    }

    /// Delete the device keyed by `identifier`, then refresh the list.
    ///
    /// Interactive confirmation is the view layer's job and happens
    /// before this is called; a declined confirmation never reaches
    /// the dispatcher and never touches the guard.
    pub async fn remove(&self, identifier: &str) -> Dispatch {
        let Some(_busy) = self.acquire(Intent::Remove) else {
            return Dispatch::Dropped;
        };

        match self.inner.client.remove(identifier).await {
            Ok(()) => {
                self.notify(Notification::success("Device deleted successfully!"));
                self.reload_list().await;
                Dispatch::Completed { ok: true }
            }
            Err(err) => {
                self.notify(Notification::error(failure_message(Intent::Remove, &err)));
                Dispatch::Completed { ok: false }
            }
        }
    }

    /// Fetch the device set and publish a fresh snapshot.
    ///
    /// Guarded like every other intent, so a refresh never stacks on
    /// an in-flight operation and cannot be re-entered. Failure
    /// publishes a persistent inline error state, not a toast.
    pub async fn refresh(&self) -> Dispatch {
        let Some(_busy) = self.acquire(Intent::Refresh) else {
            return Dispatch::Dropped;
        };

        let ok = self.reload_list().await;
        Dispatch::Completed { ok }
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Check-then-set the guard in one atomic step. Returns `None`
    /// (intent dropped) when an operation is already in flight.
    fn acquire(&self, intent: Intent) -> Option<BusyToken<'_>> {
        if self
            .inner
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(?intent, "operation in flight; intent dropped");
            return None;
        }

        self.emit(Feedback::OpStarted(intent));
        Some(BusyToken {
            inner: &self.inner,
            intent,
        })
    }

    /// Fetch the list and replace the snapshot wholesale. Runs inside
    /// an already-held guard (post-mutation refreshes share the hold
    /// with the mutation that triggered them).
    async fn reload_list(&self) -> bool {
        match self.inner.client.list().await {
            Ok(devices) => {
                self.inner.list_tx.send_replace(ListView::Loaded(devices));
                true
            }
            Err(err) => {
                warn!(error = %err, "device list refresh failed");
                self.inner
                    .list_tx
                    .send_replace(ListView::Failed(failure_message(Intent::Refresh, &err)));
                false
            }
        }
    }

    fn notify(&self, note: Notification) {
        self.emit(Feedback::Notify(note));
    }

    fn emit(&self, event: Feedback) {
        // No subscribers is fine (e.g. one-shot CLI before it attaches).
        let _ = self.inner.feedback_tx.send(event);
    }
}

/// Releases the guard on drop, so every exit path — including network
/// failures — restores interactivity.
struct BusyToken<'a> {
    inner: &'a Inner,
    intent: Intent,
}

impl Drop for BusyToken<'_> {
    fn drop(&mut self) {
        self.inner.busy.store(false, Ordering::Release);
        let _ = self
            .inner
            .feedback_tx
            .send(Feedback::OpFinished(self.intent));
    }
}

// ── Failure wording ──────────────────────────────────────────────────

/// Map an API failure to notification text: server `detail` verbatim
/// when present, otherwise the per-operation fallback; transport-level
/// failures get the generic per-operation wording.
fn failure_message(intent: Intent, err: &wolhub_api::Error) -> String {
    if let Some(detail) = err.detail() {
        return detail.to_owned();
    }
    if err.is_transport() {
        match intent {
            Intent::Add => "Error adding device".into(),
            Intent::Wake => "Error waking device".into(),
            Intent::Remove => "Error deleting device".into(),
            Intent::Refresh => "Error loading devices".into(),
        }
    } else {
        match intent {
            Intent::Add => "Failed to add device".into(),
            Intent::Wake => "Failed to wake device".into(),
            Intent::Remove => "Failed to delete device".into(),
            Intent::Refresh => "Failed to fetch devices".into(),
        }
    }
}
