//! Structured logging helpers.
//!
//! Scan logs share a fixed field set: `component`, `epoch`, `captured`,
//! `total`, `mode`. Frame contents, passphrases and seeds are never logged.

/// Log an event tagged with the emitting component.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a scan event with the standard progress fields.
#[macro_export]
macro_rules! log_scan_event {
    ($level:ident, $component:expr, $msg:expr, $epoch:expr, $progress:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            component = $component,
            epoch = $epoch,
            captured = $progress.captured,
            total = ?$progress.total,
            mode = ?$progress.mode,
            $($($field)*,)?
            $msg
        )
    };
}
