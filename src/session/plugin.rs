use crate::error::ReportError;
use crate::event::event_model::{OutcomeEvent, StartTestEvent};

/// Lifecycle hooks a host test framework calls on its registered extensions.
///
/// Every hook has a no-op default so an extension only implements what it
/// listens to. Hooks are invoked sequentially; an extension is never shared
/// between concurrent runs.
pub trait Plugin {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// A test is about to run.
    fn start_test(&mut self, _event: &StartTestEvent) {}

    /// A test finished with the given outcome.
    fn test_outcome(&mut self, _event: &dyn OutcomeEvent) {}

    /// The run is over and the host has printed its own summary.
    fn after_summary_report(&mut self) -> Result<(), ReportError> {
        Ok(())
    }
}

impl<P: Plugin + ?Sized> Plugin for &mut P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn start_test(&mut self, event: &StartTestEvent) {
        (**self).start_test(event)
    }

    fn test_outcome(&mut self, event: &dyn OutcomeEvent) {
        (**self).test_outcome(event)
    }

    fn after_summary_report(&mut self) -> Result<(), ReportError> {
        (**self).after_summary_report()
    }
}
