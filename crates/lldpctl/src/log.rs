//! Diagnostics hook for applications embedding the client.
//!
//! The library logs through `tracing`. Applications that want the
//! messages delivered to a plain callback register one with [`register`]
//! and install [`CallbackLayer`] in their subscriber; every event is then
//! forwarded as a `(Severity, message)` pair.

use std::fmt::{self, Write as _};
use std::sync::{Arc, RwLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Severity handed to the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Warning caused by a system error (the event has an `error` field)
    Warn,
    /// Warning without an underlying error
    Warnx,
    Info,
    Debug,
}

impl Severity {
    fn of(level: Level, has_error: bool) -> Self {
        match level {
            Level::ERROR | Level::WARN if has_error => Self::Warn,
            Level::ERROR | Level::WARN => Self::Warnx,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

type Callback = Arc<dyn Fn(Severity, &str) + Send + Sync>;

static CALLBACK: RwLock<Option<Callback>> = RwLock::new(None);

/// Installs the process-wide log callback, replacing any previous one.
pub fn register(callback: impl Fn(Severity, &str) + Send + Sync + 'static) {
    if let Ok(mut slot) = CALLBACK.write() {
        *slot = Some(Arc::new(callback));
    }
}

/// Removes the process-wide log callback.
pub fn unregister() {
    if let Ok(mut slot) = CALLBACK.write() {
        *slot = None;
    }
}

fn registered() -> Option<Callback> {
    CALLBACK.read().ok().and_then(|slot| slot.clone())
}

/// Target of the event emitted by [`fatal`].
const FATAL_TARGET: &str = "lldpctl::fatal";

/// Logs `message` as an error and terminates the process.
pub fn fatal(message: &str) -> ! {
    report_fatal(message);
    std::process::exit(1)
}

/// Delivers a fatal message once to the subscriber and once to the
/// registered callback.
fn report_fatal(message: &str) {
    tracing::error!(target: FATAL_TARGET, "{message}");
    if let Some(callback) = registered() {
        callback(Severity::Warnx, &format!("fatal: {message}"));
    }
}

// ============================================================================
// Layer
// ============================================================================

/// `tracing` layer forwarding events to a callback.
#[derive(Clone, Default)]
pub struct CallbackLayer {
    /// Own callback; the registered one is used when absent
    callback: Option<Callback>,
}

impl fmt::Debug for CallbackLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackLayer")
            .field("own_callback", &self.callback.is_some())
            .finish()
    }
}

impl CallbackLayer {
    /// Forwards to the callback installed with [`register`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: impl Fn(Severity, &str) + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }
}

impl<S: Subscriber> Layer<S> for CallbackLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // `fatal` hands its message to the registered callback itself
        if self.callback.is_none() && event.metadata().target() == FATAL_TARGET {
            return;
        }
        let Some(callback) = self.callback.clone().or_else(registered) else {
            return;
        };
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let severity = Severity::of(*event.metadata().level(), visitor.error.is_some());
        callback(severity, &visitor.render());
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    error: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn render(self) -> String {
        let mut text = self.message;
        text.push_str(&self.fields);
        if let Some(error) = self.error {
            let _ = write!(text, ": {error}");
        }
        text
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "error" => self.error = Some(value.to_string()),
            name => {
                let _ = write!(self.fields, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "error" => self.error = Some(format!("{value:?}")),
            name => {
                let _ = write!(self.fields, " {name}={value:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing_subscriber::layer::SubscriberExt;

    /// Serializes tests touching the process-wide callback.
    static REGISTERED: Mutex<()> = Mutex::new(());

    fn capture(f: impl FnOnce()) -> Vec<(Severity, String)> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let layer = CallbackLayer::with_callback(move |severity, message| {
            sink.lock().unwrap().push((severity, message.to_string()));
        });
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        let out = seen.lock().unwrap().clone();
        out
    }

    #[test]
    fn test_severity_mapping() {
        let seen = capture(|| {
            tracing::warn!(error = "broken pipe", "send failed");
            tracing::warn!("neighbor table full");
            tracing::error!("fatal-ish");
            tracing::info!("connected");
            tracing::debug!("frame");
            tracing::trace!("bytes");
        });
        let severities: Vec<Severity> = seen.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            severities,
            [
                Severity::Warn,
                Severity::Warnx,
                Severity::Warnx,
                Severity::Info,
                Severity::Debug,
                Severity::Debug,
            ]
        );
        assert_eq!(seen[0].1, "send failed: broken pipe");
    }

    #[test]
    fn test_fields_rendered() {
        let seen = capture(|| tracing::info!(port = "eth0", count = 2, "neighbors"));
        assert_eq!(seen[0].1, "neighbors port=eth0 count=2");
    }

    #[test]
    fn test_registered_callback() {
        let _guard = REGISTERED.lock().unwrap_or_else(|e| e.into_inner());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        register(move |severity, message| {
            sink.lock().unwrap().push((severity, message.to_string()));
        });
        let subscriber = tracing_subscriber::registry().with(CallbackLayer::new());
        tracing::subscriber::with_default(subscriber, || tracing::info!("hello"));
        unregister();

        assert_eq!(*seen.lock().unwrap(), [(Severity::Info, "hello".to_string())]);
    }

    #[test]
    fn test_fatal_reaches_callback_once() {
        let _guard = REGISTERED.lock().unwrap_or_else(|e| e.into_inner());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        register(move |severity, message| {
            sink.lock().unwrap().push((severity, message.to_string()));
        });
        let subscriber = tracing_subscriber::registry().with(CallbackLayer::new());
        tracing::subscriber::with_default(subscriber, || report_fatal("socket vanished"));
        unregister();

        assert_eq!(
            *seen.lock().unwrap(),
            [(Severity::Warnx, "fatal: socket vanished".to_string())]
        );
    }

    #[test]
    fn test_fatal_reaches_own_callback() {
        let _guard = REGISTERED.lock().unwrap_or_else(|e| e.into_inner());
        let seen = capture(|| report_fatal("socket vanished"));
        assert_eq!(seen, [(Severity::Warnx, "socket vanished".to_string())]);
    }
}
