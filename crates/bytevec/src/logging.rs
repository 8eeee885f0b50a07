//! Logging shims.
//!
//! Expand to `log` calls when the `logging` feature is enabled and to
//! nothing otherwise. Records use the default target, the module path.

macro_rules! debug {
    ($($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::debug!($($arg)+);
    )
}

macro_rules! trace {
    ($($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::trace!($($arg)+);
    )
}
