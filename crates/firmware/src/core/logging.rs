//! Logging abstraction
//!
//! Unified logging macros across targets:
//! - Embedded (`defmt-log` feature): routed to defmt
//! - Host tests: `println!`/`eprintln!`
//! - Host non-test: no-op
//!
//! Keep log arguments free of side effects: in the no-op configuration
//! they are never evaluated.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-log")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt-log"), test))]
        std::println!("[INFO] {}", std::format!($($arg)*));
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-log")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt-log"), test))]
        std::println!("[WARN] {}", std::format!($($arg)*));
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-log")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt-log"), test))]
        std::eprintln!("[ERROR] {}", std::format!($($arg)*));
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-log")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt-log"), test))]
        std::println!("[DEBUG] {}", std::format!($($arg)*));
    }};
}
