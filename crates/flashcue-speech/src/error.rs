//! Speech backend error types.

use flashcue_core::SpeechError;

/// Errors a platform speech backend can report for an utterance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The utterance was cut short by `cancel()` or a newer utterance.
    #[error("Utterance interrupted")]
    Interrupted,

    /// The utterance was dropped from the queue before it started.
    #[error("Utterance canceled")]
    Canceled,

    /// The platform has no speech capability.
    #[error("Speech synthesis unavailable")]
    Unavailable,

    /// Genuine engine failure (synthesis failed, audio device busy, ...).
    #[error("Speech engine error: {0}")]
    Engine(String),
}

impl BackendError {
    /// Map a platform error code onto the taxonomy.
    ///
    /// Unknown codes are treated as engine errors carrying the code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "interrupted" => Self::Interrupted,
            "canceled" | "cancelled" => Self::Canceled,
            "not-supported" | "unavailable" => Self::Unavailable,
            other => Self::Engine(other.to_string()),
        }
    }

    /// Whether this is the platform's echo of a stop rather than a failure.
    #[must_use]
    pub const fn is_stop_echo(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Canceled)
    }
}

/// Convert a backend outcome into the port-level result.
///
/// Stop echoes resolve normally: stopping speech to move on is a control
/// action, not an error.
pub fn into_port_result(result: Result<(), BackendError>) -> Result<(), SpeechError> {
    match result {
        Ok(()) => Ok(()),
        Err(e @ (BackendError::Interrupted | BackendError::Canceled)) => {
            tracing::debug!(reason = %e, "Utterance ended by stop");
            Ok(())
        }
        Err(BackendError::Unavailable) => Err(SpeechError::Unavailable),
        Err(BackendError::Engine(message)) => Err(SpeechError::Engine(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_codes_map_onto_taxonomy() {
        assert_eq!(BackendError::from_code("interrupted"), BackendError::Interrupted);
        assert_eq!(BackendError::from_code("canceled"), BackendError::Canceled);
        assert_eq!(BackendError::from_code("not-supported"), BackendError::Unavailable);
        assert_eq!(
            BackendError::from_code("audio-busy"),
            BackendError::Engine("audio-busy".into())
        );
    }

    #[test]
    fn stop_echoes_are_not_failures() {
        assert_eq!(into_port_result(Err(BackendError::Interrupted)), Ok(()));
        assert_eq!(into_port_result(Err(BackendError::Canceled)), Ok(()));
        assert_eq!(
            into_port_result(Err(BackendError::Engine("synthesis-failed".into()))),
            Err(SpeechError::Engine("synthesis-failed".into()))
        );
        assert_eq!(
            into_port_result(Err(BackendError::Unavailable)),
            Err(SpeechError::Unavailable)
        );
    }
}
