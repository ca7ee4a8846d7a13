//! An embeddable event-notification and leveled-logging core for SDKs and
//! runtimes.
//!
//! # Overview
//!
//! The crate revolves around two independent components that a host system
//! owns and wires together at startup:
//!
//! * [`LevelFilteredLogger`] receives `(severity, message)` records from host
//!   code, drops everything below a configurable minimum [`Severity`], and
//!   forwards the rest to a pluggable [`LogSink`]. Configure it through
//!   [`LoggerConfig`].
//! * [`NotificationCenter`] lets external code subscribe callbacks keyed by
//!   [`EventCategory`] and delivers fired [`Notification`]s to all matching
//!   subscribers, synchronously, in registration order. Typed event shapes
//!   such as [`DecisionEvent`] and [`TrackEvent`] come with `subscribe_*` and
//!   `notify_*` helpers.
//!
//! Neither component knows about the other. Both are safe to share across
//! threads behind an `Arc`.
//!
//! # Error Handling
//!
//! Runtime operations never fail: log records below the threshold are
//! silently dropped, sink failures are swallowed and counted, panicking
//! subscriber callbacks are caught without aborting the dispatch, and
//! unsubscribing an unknown id just returns `false`. The [`Error`] enum only
//! surfaces configuration-time problems such as an unrecognized severity
//! name.
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate (target
//! `relay`) for its own diagnostics, e.g. to report subscriber callbacks that
//! panicked during dispatch. [`LevelFilteredLogger`] is the host-facing
//! capability and is deliberately not used for crate internals.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod config;
mod error;
mod events;
mod logger;
mod notification_center;
mod severity;

pub use config::LoggerConfig;
pub use error::{Error, Result};
pub use events::{
    ActivateEvent, DatafileChangeEvent, DecisionEvent, EventAttributes, EventCategory, LogEvent,
    Notification, TrackEvent,
};
pub use logger::{ConsoleSink, LevelFilteredLogger, LogSink};
pub use notification_center::{NotificationCenter, SubscriptionId};
pub use severity::Severity;
