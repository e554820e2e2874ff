use tracing::{debug, error};

use crate::error::ReportError;
use crate::event::event_model::{OutcomeEvent, StartTestEvent};
use crate::session::plugin::Plugin;

/// Explicitly scoped set of registered plugins for one test run.
///
/// Hooks fan out to every plugin in registration order. Plugins may be borrowed (`Box::new(&mut reporter)`) so the caller can
/// inspect them once the session is dropped.
#[derive(Default)]
pub struct Session<'a> {
    plugins: Vec<Box<dyn Plugin + 'a>>,
}

impl<'a> Session<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin + 'a>) {
        debug!(plugin = plugin.name(), "registered plugin");
        self.plugins.push(plugin);
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn start_test(&mut self, event: &StartTestEvent) {
        for plugin in &mut self.plugins {
            plugin.start_test(event);
        }
    }

    pub fn test_outcome(&mut self, event: &dyn OutcomeEvent) {
        for plugin in &mut self.plugins {
            plugin.test_outcome(event);
        }
    }

    /// Run every plugin's end-of-run hook, even after one fails, and return
    /// the first error.
    pub fn after_summary_report(&mut self) -> Result<(), ReportError> {
        let mut first_err = None;
        for plugin in &mut self.plugins {
            if let Err(e) = plugin.after_summary_report() {
                error!(plugin = plugin.name(), "end-of-run hook failed: {}", e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
