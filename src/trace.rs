//! Diagnostics for template parsing and rendering.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate. The
//! macros expand to nothing when the feature is disabled.

/// Emit a debug-level event once a template has been parsed.
///
/// ```ignore
/// trace_parse!(&canonical, map.len());
/// ```
macro_rules! trace_parse {
    ($canonical:expr, $placeholders:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(
            canonical = %$canonical,
            placeholders = $placeholders,
            "sql_placeholder.parse"
        );
    };
}

/// Emit a debug-level event for one render call.
///
/// ```ignore
/// trace_render!(&canonical, values.len());
/// ```
macro_rules! trace_render {
    ($canonical:expr, $bound:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(canonical = %$canonical, bound = $bound, "sql_placeholder.render");
    };
}

/// Emit a warn-level event when a render call is missing mandatory values.
///
/// ```ignore
/// trace_missing!(&canonical, missing.len());
/// ```
macro_rules! trace_missing {
    ($canonical:expr, $missing:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(
            canonical = %$canonical,
            missing = $missing,
            "sql_placeholder.missing_values"
        );
    };
}
