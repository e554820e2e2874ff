//! Collects test lifecycle events from a host test framework and renders
//! them into a single static HTML report.
//!
//! The host drives a [`session::session::Session`] holding an
//! [`report::collector::HtmlReporter`]; the bundled libtest adapter
//! ([`event::libtest`]) is one such host.

pub mod cli;
pub mod error;
pub mod event;
pub mod report;
pub mod session;

pub use error::ReportError;
pub use event::event_model::{ExceptionInfo, Outcome, OutcomeEvent, StartTestEvent, TestOutcomeEvent};
pub use report::collector::{HtmlReporter, ReportConfig};
pub use session::plugin::Plugin;
pub use session::session::Session;
