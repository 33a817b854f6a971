//! Error logging for handler results.

use std::fmt::Display;

/// Adds `log` to `Result`.
pub trait ResultExt<T, E> {
    /// Emit an error event naming `context` and the calling handler's source
    /// line, then hand the result back untouched.
    ///
    /// ```ignore
    /// use dealflow_server::ResultExt;
    ///
    /// let outcome = runner.run(&request).await.log("executing workflow")?;
    /// ```
    fn log(self, context: impl Display) -> Result<T, E>;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    #[track_caller]
    fn log(self, context: impl Display) -> Result<T, E> {
        if let Err(e) = &self {
            let at = std::panic::Location::caller();
            tracing::error!(
                target: "dealflow_server",
                error = %e,
                at = %format_args!("{}:{}", at.file(), at.line()),
                "{} failed",
                context
            );
        }
        self
    }
}
