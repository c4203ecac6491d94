//! Boundary outcomes and error chaining
//!
//! Converts failures escaping external operations (database calls, spawned
//! tasks) into plain values at the call site, and attaches context messages
//! to an underlying error without losing the root cause.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

/// Boxed error used at boundaries where the concrete failure type is open.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a boundary call: exactly one variant is populated.
///
/// Callers discriminate by variant, never by inspecting the success value;
/// `Ok(0)` and `Ok("")` are legitimate successes.
#[derive(Debug)]
pub enum Outcome<T, E> {
    Ok(T),
    Err(E),
}

impl<T, E> Outcome<T, E> {
    /// Await a fallible operation and capture its result as a value.
    ///
    /// The error is passed through untouched: this is a boundary adapter,
    /// not a context-adding step. No logging, no retry.
    pub async fn of<F>(op: F) -> Outcome<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        match op.await {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Err(error),
        }
    }

    /// Run a synchronous fallible computation and capture its result.
    pub fn of_sync<F>(op: F) -> Outcome<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        match op() {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Err(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    pub fn err(self) -> Option<E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }
}

impl<T, E: Into<BoxedError>> Outcome<T, E> {
    /// Re-raise the failure with an added context message.
    ///
    /// Intended for failures that came from an external or lower-level
    /// operation. A failure representing this layer's own invariant
    /// violation should be raised as a fresh domain error instead.
    pub fn context(self, message: impl Into<String>) -> Result<T, Chained> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(Chained::wrap(error, message)),
        }
    }
}

impl<T> Outcome<T, BoxedError> {
    /// Like [`Outcome::of`], additionally converting a panic escaping the
    /// operation into an error value instead of unwinding past this point.
    ///
    /// Panic payloads carry no error type, so they are folded into one
    /// defined representation, [`PanicPayload`].
    pub async fn shielded<F, E>(op: F) -> Outcome<T, BoxedError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<BoxedError>,
    {
        match AssertUnwindSafe(op).catch_unwind().await {
            Ok(Ok(value)) => Outcome::Ok(value),
            Ok(Err(error)) => Outcome::Err(error.into()),
            Err(payload) => Outcome::Err(Box::new(PanicPayload::from_any(payload))),
        }
    }

    /// Synchronous variant of [`Outcome::shielded`].
    pub fn shielded_sync<F, E>(op: F) -> Outcome<T, BoxedError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxedError>,
    {
        match std::panic::catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => Outcome::Ok(value),
            Ok(Err(error)) => Outcome::Err(error.into()),
            Err(payload) => Outcome::Err(Box::new(PanicPayload::from_any(payload))),
        }
    }
}

/// Error carrying a context message on top of an underlying cause.
///
/// Chains form by repeated wrapping: each wrap creates a new node pointing
/// at a pre-existing error, so the chain is acyclic and finite.
#[derive(Debug)]
pub struct Chained {
    message: String,
    source: BoxedError,
}

impl Chained {
    /// Wrap an existing failure with a new context message.
    ///
    /// The cause must be a real upstream failure; wrapping a freshly
    /// constructed placeholder adds no diagnostic value.
    pub fn wrap<E, M>(source: E, message: M) -> Self
    where
        E: Into<BoxedError>,
        M: Into<String>,
    {
        Self {
            message: message.into(),
            source: source.into(),
        }
    }

    /// The context message, without the cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the wrapper and return the immediate cause.
    pub fn unwrap(self) -> BoxedError {
        self.source
    }
}

impl fmt::Display for Chained {
    /// Renders `message: cause`, recursively through chained causes, so the
    /// whole chain reads outermost context first on a single line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.source)
    }
}

impl std::error::Error for Chained {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let cause: &(dyn std::error::Error + 'static) = self.source.as_ref();
        Some(cause)
    }
}

/// A panic payload captured at a shielded boundary.
#[derive(Debug)]
pub struct PanicPayload {
    message: String,
}

impl PanicPayload {
    fn from_any(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic: {}", self.message)
    }
}

impl std::error::Error for PanicPayload {}

/// Follow `source` links to the terminal error of a chain.
///
/// Terminates after at most chain-length steps; chains cannot loop because
/// every wrap points at an error that existed before it.
pub fn root_cause<'a>(
    error: &'a (dyn std::error::Error + 'static),
) -> &'a (dyn std::error::Error + 'static) {
    let mut current = error;
    while let Some(next) = current.source() {
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_failure(message: &str) -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, message.to_string())
    }

    #[tokio::test]
    async fn of_captures_resolved_value() {
        let outcome: Outcome<i32, io::Error> = Outcome::of(async { Ok(42) }).await;
        assert!(outcome.is_ok());
        assert_eq!(outcome.ok(), Some(42));
    }

    #[tokio::test]
    async fn of_captures_falsy_success_values() {
        let outcome: Outcome<i32, io::Error> = Outcome::of(async { Ok(0) }).await;
        assert!(outcome.is_ok());
        assert_eq!(outcome.ok(), Some(0));
    }

    #[tokio::test]
    async fn of_passes_error_through_unmodified() {
        let outcome: Outcome<i32, io::Error> =
            Outcome::of(async { Err(io_failure("connection refused")) }).await;
        assert!(outcome.is_err());
        let error = outcome.err().unwrap();
        assert_eq!(error.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(error.to_string(), "connection refused");
    }

    #[test]
    fn of_sync_captures_both_arms() {
        let ok: Outcome<&str, io::Error> = Outcome::of_sync(|| Ok("done"));
        assert_eq!(ok.ok(), Some("done"));

        let err: Outcome<&str, io::Error> = Outcome::of_sync(|| Err(io_failure("denied")));
        assert_eq!(err.err().unwrap().to_string(), "denied");
    }

    #[test]
    fn context_wraps_only_the_err_arm() {
        let ok: Outcome<i32, io::Error> = Outcome::of_sync(|| Ok(7));
        assert_eq!(ok.context("reading row").unwrap(), 7);

        let err: Outcome<i32, io::Error> = Outcome::of_sync(|| Err(io_failure("disk full")));
        let chained = err.context("reading row").unwrap_err();
        assert_eq!(chained.to_string(), "reading row: disk full");
    }

    #[test]
    fn unwrap_returns_the_exact_cause() {
        let chained = Chained::wrap(io_failure("disk full"), "writing report");
        let cause = chained.unwrap().downcast::<io::Error>().unwrap();
        assert_eq!(cause.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(cause.to_string(), "disk full");
    }

    #[test]
    fn display_renders_chain_outermost_first() {
        let inner = Chained::wrap(io_failure("disk full"), "B");
        let outer = Chained::wrap(inner, "A");
        assert_eq!(outer.to_string(), "A: B: disk full");
    }

    #[test]
    fn root_cause_walks_to_terminal_error() {
        let inner = Chained::wrap(io_failure("disk full"), "B");
        let outer = Chained::wrap(inner, "A");
        let root = root_cause(&outer);
        assert_eq!(root.to_string(), "disk full");
        assert!(root.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn root_cause_of_plain_error_is_itself() {
        let plain = io_failure("disk full");
        let root = root_cause(&plain);
        assert_eq!(root.to_string(), "disk full");
    }

    #[test]
    fn repeated_wraps_are_independent_values() {
        let first = Chained::wrap(io_failure("disk full"), "writing report");
        let second = Chained::wrap(io_failure("disk full"), "writing report");
        assert_eq!(first.to_string(), second.to_string());

        let first_cause = first.unwrap().downcast::<io::Error>().unwrap();
        let second_cause = second.unwrap().downcast::<io::Error>().unwrap();
        assert_eq!(first_cause.to_string(), second_cause.to_string());
    }

    #[tokio::test]
    async fn shielded_converts_panics_into_errors() {
        let outcome: Outcome<i32, BoxedError> =
            Outcome::shielded::<_, io::Error>(async { panic!("boom") }).await;
        let error = outcome.err().unwrap();
        let payload = error.downcast::<PanicPayload>().unwrap();
        assert_eq!(payload.to_string(), "panic: boom");
    }

    #[test]
    fn shielded_sync_passes_values_and_catches_panics() {
        let ok: Outcome<i32, BoxedError> = Outcome::shielded_sync::<_, io::Error>(|| Ok(1));
        assert_eq!(ok.ok(), Some(1));

        let panicked: Outcome<i32, BoxedError> =
            Outcome::shielded_sync::<_, io::Error>(|| panic!("boom"));
        assert!(panicked.err().unwrap().downcast_ref::<PanicPayload>().is_some());
    }
}
