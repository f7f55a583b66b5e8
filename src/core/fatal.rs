//! Loud termination for unrecoverable addressing failures

use super::types::RelocError;
use std::process;
use tracing::error;

/// Logs the failure with full diagnostic context and aborts the process.
///
/// Continuing after a failed resolution risks handing out a wrong address
/// into foreign memory; callers that cannot recover route through here
/// instead of propagating further. Library code itself only ever returns
/// [`RelocError`]; invoking this is the consumer's decision.
pub fn report_and_fail(context: &str, err: &RelocError) -> ! {
    error!(target: "relokit", context, %err, "unrecoverable addressing failure");
    process::abort();
}

/// Result extension that converts fatal errors into loud termination.
pub trait FatalExt<T> {
    /// Unwraps the value, aborting with diagnostics on error
    fn or_fail(self, context: &str) -> T;
}

impl<T> FatalExt<T> for Result<T, RelocError> {
    fn or_fail(self, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => report_and_fail(context, &err),
        }
    }
}
