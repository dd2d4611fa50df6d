//! Event dispatch.
//!
//! The [`Dispatcher`] turns raw events from a connection into middleware
//! invocations. Each event is processed in its own Tokio task:
//!
//! 1. The connection's own handling runs first ([`Connection::on_raw_event`]).
//! 2. The event name is mapped onto [`EventKind`]; unknown names still flow.
//! 3. A fresh [`Context`] holding the raw arguments is built.
//! 4. A task running the root middleware with the terminal continuation is
//!    spawned, and `dispatch` returns without waiting for it.
//!
//! A fault or panic while processing one event is logged and counted by the
//! task that hit it. Other events, earlier or later, are unaffected.
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::builder(connection)
//!     .root(root_chain)
//!     .catalog(Catalog::default())
//!     .build()?;
//!
//! dispatcher.dispatch("message", vec![json!({"content": "hello"})]);
//! ```
//!
//! [`Connection::on_raw_event`]: strand_core::Connection::on_raw_event

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use strand_core::{
    Args, BoxError, BoxedConnection, BoxedMiddleware, Context, EventKind, IntoMiddleware, Kwargs,
    Next, Outcome, decorate,
};
use strand_framework::{Catalog, MiddlewareService, Normalize};
use tokio::runtime::Handle;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower::timeout::Timeout;
use tower::timeout::error::Elapsed;
use tracing::{Instrument, debug, debug_span, error, info, trace, warn};

use crate::config::{DispatchConfig, StrandConfig};
use crate::error::{RuntimeError, RuntimeResult};

/// A raw event as delivered by a connection: a name and positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// The event name, e.g. `"message"`.
    pub name: String,
    /// Positional arguments, in delivery order.
    #[serde(default)]
    pub args: Args,
}

impl RawEvent {
    /// Creates a raw event.
    pub fn new(name: impl Into<String>, args: Args) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Creates a bounded channel for feeding raw events to [`Dispatcher::listen`].
pub fn event_channel(capacity: usize) -> (mpsc::Sender<RawEvent>, mpsc::Receiver<RawEvent>) {
    mpsc::channel(capacity.max(1))
}

/// Dispatch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events handed to a task.
    pub dispatched: u64,
    /// Events the root chain handled.
    pub handled: u64,
    /// Events the root chain ignored.
    pub ignored: u64,
    /// Events whose processing faulted, panicked or timed out.
    pub failed: u64,
}

impl DispatchStats {
    /// Events dispatched but not finished yet.
    pub fn in_flight(&self) -> u64 {
        self.dispatched
            .saturating_sub(self.handled + self.ignored + self.failed)
    }
}

impl std::fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Events: {} dispatched ({} handled, {} ignored, {} failed, {} in flight)",
            self.dispatched,
            self.handled,
            self.ignored,
            self.failed,
            self.in_flight()
        )
    }
}

#[derive(Debug, Default)]
struct Counters {
    dispatched: AtomicU64,
    handled: AtomicU64,
    ignored: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// State shared by the dispatcher and its event tasks.
struct Shared {
    connection: BoxedConnection,
    service: MiddlewareService,
    timeout: Option<Duration>,
    log_ignored: bool,
    counters: Counters,
}

impl Shared {
    /// Processes one event to completion. Never fails; outcomes are recorded.
    async fn process(self: Arc<Self>, ctx: Context) {
        let result = AssertUnwindSafe(self.run_root(ctx)).catch_unwind().await;

        match result {
            Ok(Ok(outcome)) if outcome.is_ignored() => {
                self.counters.ignored.fetch_add(1, Ordering::Relaxed);
                if self.log_ignored {
                    info!("Event ignored");
                } else {
                    trace!("Event ignored");
                }
            }
            Ok(Ok(outcome)) => {
                self.counters.handled.fetch_add(1, Ordering::Relaxed);
                trace!(data = outcome.data().is_some(), "Event handled");
            }
            Ok(Err(err)) if err.is::<Elapsed>() => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(timeout = ?self.timeout, "Event processing timed out");
            }
            Ok(Err(err)) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(error = %err, "Event processing failed");
            }
            Err(panic) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(panic = panic_message(&*panic), "Event processing panicked");
            }
        }
    }

    async fn run_root(&self, ctx: Context) -> Result<Outcome, BoxError> {
        let service = self.service.clone();
        match self.timeout {
            Some(limit) => Timeout::new(service, limit).oneshot(ctx).await,
            None => service.oneshot(ctx).await.map_err(Into::into),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Routes raw events from one connection through a root middleware.
///
/// Cheap to clone; clones share the same root, connection and counters.
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
    handle: Handle,
}

impl Dispatcher {
    /// Starts building a dispatcher for events from `connection`.
    pub fn builder(connection: BoxedConnection) -> DispatcherBuilder {
        DispatcherBuilder::new(connection)
    }

    /// Builds a dispatcher from loaded configuration.
    ///
    /// The root is normalized with the configured catalog.
    pub fn from_config(
        connection: BoxedConnection,
        root: impl IntoMiddleware,
        config: &StrandConfig,
    ) -> RuntimeResult<Self> {
        Self::builder(connection)
            .root(root)
            .catalog(config.catalog()?)
            .config(&config.dispatch)
            .build()
    }

    /// Returns the connection events are dispatched from.
    pub fn connection(&self) -> &BoxedConnection {
        &self.shared.connection
    }

    /// Dispatches one raw event and returns immediately.
    ///
    /// The returned handle completes when the event's chain has finished.
    /// Dropping it does not cancel processing.
    pub fn dispatch(&self, name: &str, args: Args) -> JoinHandle<()> {
        let shared = &self.shared;
        shared.connection.on_raw_event(name, &args);

        let kind = EventKind::from_name(name);
        if !kind.is_known() {
            debug!(event = name, "Dispatching unrecognized event");
        }

        shared.counters.dispatched.fetch_add(1, Ordering::Relaxed);

        let ctx = Context::with_connection(shared.connection.clone(), kind, args, Kwargs::new());
        let span = debug_span!("dispatch", event = name, connection = shared.connection.id());

        self.handle
            .spawn(Arc::clone(shared).process(ctx).instrument(span))
    }

    /// Dispatches a [`RawEvent`].
    pub fn dispatch_event(&self, event: RawEvent) -> JoinHandle<()> {
        self.dispatch(&event.name, event.args)
    }

    /// Dispatches events from `events` until the channel closes or `shutdown`
    /// is cancelled.
    ///
    /// Events already dispatched keep running after this returns.
    pub async fn listen(&self, mut events: mpsc::Receiver<RawEvent>, shutdown: CancellationToken) {
        debug!(connection = self.connection().id(), "Dispatcher listening");

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    info!("Shutdown requested, dispatcher stopping");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => {
                        self.dispatch_event(event);
                    }
                    None => {
                        debug!("Event channel closed, dispatcher stopping");
                        break;
                    }
                },
            }
        }

        debug!(stats = %self.stats(), "Dispatcher stopped");
    }

    /// Dispatches events from `events` until the channel closes, Ctrl+C is
    /// pressed or SIGTERM is received.
    pub async fn run(&self, events: mpsc::Receiver<RawEvent>) -> RuntimeResult<()> {
        let shutdown = CancellationToken::new();
        let listener = self.listen(events, shutdown.clone());
        tokio::pin!(listener);

        info!("Strand dispatcher is now running. Press Ctrl+C to stop.");

        tokio::select! {
            () = &mut listener => return Ok(()),
            signal = wait_for_shutdown() => signal?,
        }

        shutdown.cancel();
        listener.await;
        Ok(())
    }

    /// Returns a snapshot of the dispatch counters.
    pub fn stats(&self) -> DispatchStats {
        self.shared.counters.snapshot()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("connection", &self.shared.connection.id())
            .field("service", &self.shared.service)
            .field("timeout", &self.shared.timeout)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
async fn wait_for_shutdown() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder {
    connection: BoxedConnection,
    root: Option<BoxedMiddleware>,
    terminal: Next,
    catalog: Option<Catalog>,
    handle: Option<Handle>,
    timeout: Option<Duration>,
    log_ignored: bool,
}

impl DispatcherBuilder {
    fn new(connection: BoxedConnection) -> Self {
        Self {
            connection,
            root: None,
            terminal: Next::noop(),
            catalog: None,
            handle: None,
            timeout: None,
            log_ignored: false,
        }
    }

    /// Sets the root middleware every event is run through. Required.
    pub fn root(mut self, root: impl IntoMiddleware) -> Self {
        self.root = Some(root.into_middleware());
        self
    }

    /// Sets the continuation reached when the whole root chain forwards.
    ///
    /// Defaults to [`Next::noop`].
    pub fn terminal(mut self, terminal: Next) -> Self {
        self.terminal = terminal;
        self
    }

    /// Normalizes every event with `catalog` before the root runs.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Runs event tasks on `handle` instead of the ambient runtime.
    pub fn handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Fails processing of any event that takes longer than `limit`.
    ///
    /// This is a guard applied by the dispatcher around the root only.
    /// Middleware themselves are never cancelled or timed out by the chain,
    /// and no limit applies unless one is set here.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Logs ignored events at `info` instead of `trace`.
    pub fn log_ignored(mut self, enabled: bool) -> Self {
        self.log_ignored = enabled;
        self
    }

    /// Applies dispatch settings from configuration.
    pub fn config(mut self, config: &DispatchConfig) -> Self {
        self.timeout = config.timeout();
        self.log_ignored = config.log_ignored;
        self
    }

    /// Builds the dispatcher.
    ///
    /// Fails if no root was set, or if no runtime handle was given and this
    /// is called outside a Tokio runtime.
    pub fn build(self) -> RuntimeResult<Dispatcher> {
        let root = self.root.ok_or(RuntimeError::MissingRoot)?;
        let root = match self.catalog {
            Some(catalog) => decorate(Normalize::new(catalog), root).into_middleware(),
            None => root,
        };

        let handle = match self.handle {
            Some(handle) => handle,
            None => Handle::try_current()?,
        };

        debug!(
            connection = self.connection.id(),
            root = root.name(),
            timeout = ?self.timeout,
            "Dispatcher built"
        );

        Ok(Dispatcher {
            shared: Arc::new(Shared {
                connection: self.connection,
                service: MiddlewareService::new(root, self.terminal),
                timeout: self.timeout,
                log_ignored: self.log_ignored,
                counters: Counters::default(),
            }),
            handle,
        })
    }
}
