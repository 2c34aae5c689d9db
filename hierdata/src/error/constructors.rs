//! Constructors and classification helpers for `HieraError`.

use std::error::Error;

use camino::Utf8Path;

use super::HieraError;

impl HieraError {
    /// Construct a [`HieraError::Configuration`] from a message.
    ///
    /// # Examples
    ///
    /// ```
    /// use hierdata::HieraError;
    /// let err = HieraError::configuration("`backends` must be a list");
    /// assert!(matches!(err, HieraError::Configuration { .. }));
    /// ```
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Construct a [`HieraError::Load`] for a candidate file and backend.
    #[must_use]
    pub fn load(
        path: &Utf8Path,
        backend: &str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Load {
            path: path.to_owned(),
            backend: backend.to_owned(),
            source: source.into(),
        }
    }

    /// Construct a [`HieraError::Interpolation`] for a raw markup string.
    #[must_use]
    pub fn interpolation(value: &str, message: impl Into<String>) -> Self {
        Self::Interpolation {
            value: value.to_owned(),
            message: message.into(),
        }
    }

    /// Construct a [`HieraError::NotFound`] for `key`.
    #[must_use]
    pub fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_owned(),
        }
    }

    /// Returns `true` for the only recoverable error kind, [`HieraError::NotFound`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hierdata::HieraError;
    /// assert!(HieraError::not_found("a.b").is_not_found());
    /// assert!(!HieraError::NoBackends.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
