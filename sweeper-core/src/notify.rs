use tracing::{error, info};

/// Delivery boundary for run summaries.
///
/// The host application owns the actual transport (site message, chat
/// forward, ...); the cleaner only hands over the human-readable summary
/// and whether the run succeeded.
pub trait Reporter {
    fn report(&self, summary: &str, succeeded: bool);
}

/// Default reporter that writes summaries to the log.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, summary: &str, succeeded: bool) {
        if succeeded {
            info!("{summary}");
        } else {
            error!("{summary}");
        }
    }
}
