// This is free and unencumbered software released into the public domain.

//! CLI helpers (error reporting, verbosity handling).
//!
//! This module must compile even when the crate feature `cli` is disabled,
//! because the library is built in non-CLI configurations.

#[cfg(feature = "cli")]
use crate::shared::PreviewError;

#[cfg(feature = "cli")]
use asimov_module::SysexitsError::{self, *};

#[cfg(feature = "cli")]
use clientele::StandardOptions;

#[cfg(feature = "cli")]
pub fn handle_error(err: &PreviewError, flags: &StandardOptions) -> SysexitsError {
    #[cfg(feature = "tracing")]
    {
        use asimov_module::tracing::{debug, error};

        error!(target: "camera_preview", %err, "preview command failed");

        if flags.debug || flags.verbose >= 2 {
            debug!(target: "camera_preview", ?err, "detailed error");
        }
    }

    report_error(err, flags);
    map_error_to_sysexit(err)
}

#[cfg(feature = "cli")]
pub fn info_user(flags: &StandardOptions, msg: &str) {
    if flags.debug || flags.verbose >= 1 {
        eprintln!("INFO: {msg}");
    }

    #[cfg(feature = "tracing")]
    asimov_module::tracing::info!(target: "camera_preview", "{msg}");
}

#[cfg(feature = "cli")]
pub fn warn_user(flags: &StandardOptions, msg: &str) {
    if flags.debug || flags.verbose >= 1 {
        eprintln!("WARN: {msg}");
    }

    #[cfg(feature = "tracing")]
    asimov_module::tracing::warn!(target: "camera_preview", "{msg}");
}

#[cfg(feature = "cli")]
fn report_error(err: &PreviewError, flags: &StandardOptions) {
    use std::error::Error as _;
    use std::io::Write;

    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "ERROR: {err}");

    if flags.debug || flags.verbose >= 2 {
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = writeln!(stderr, "  Caused by: {}", cause);
            source = cause.source();
        }
    }
}

#[cfg(feature = "cli")]
pub fn map_error_to_sysexit(err: &PreviewError) -> SysexitsError {
    match err {
        err if err.is_usage() => EX_USAGE,
        PreviewError::NoCamera | PreviewError::NotBound => EX_UNAVAILABLE,
        _ => EX_SOFTWARE,
    }
}

// When `cli` is disabled, keep the module linkable without exposing CLI-only types.
#[cfg(not(feature = "cli"))]
#[inline]
pub fn info_user(_msg: &str) {}

#[cfg(not(feature = "cli"))]
#[inline]
pub fn warn_user(_msg: &str) {}
