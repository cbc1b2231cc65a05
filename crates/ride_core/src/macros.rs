//! log macros, one target per area so hosts can filter each independently

/// Writes a debug! message to the app::location logger
#[macro_export]
macro_rules! location_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::location", $($arg)+)
    };
}

/// Writes an info! message to the app::location logger
#[macro_export]
macro_rules! location_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::location", $($arg)+)
    };
}

/// Writes a warn! message to the app::location logger
#[macro_export]
macro_rules! location_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::location", $($arg)+)
    };
}

/// Writes an error! message to the app::location logger
#[macro_export]
macro_rules! location_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::location", $($arg)+)
    };
}

/// Writes a debug! message to the app::roster logger
#[macro_export]
macro_rules! roster_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::roster", $($arg)+)
    };
}

/// Writes an info! message to the app::roster logger
#[macro_export]
macro_rules! roster_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::roster", $($arg)+)
    };
}

/// Writes a debug! message to the app::geocoding logger
#[macro_export]
macro_rules! geocoding_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::geocoding", $($arg)+)
    };
}

/// Writes a warn! message to the app::geocoding logger
#[macro_export]
macro_rules! geocoding_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::geocoding", $($arg)+)
    };
}

/// Writes a debug! message to the app::map logger
#[macro_export]
macro_rules! map_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::map", $($arg)+)
    };
}

/// Writes an error! message to the app::map logger
#[macro_export]
macro_rules! map_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::map", $($arg)+)
    };
}
