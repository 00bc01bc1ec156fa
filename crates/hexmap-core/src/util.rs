//! Stage timing through the `log` facade.
//!
//! `std::time::Instant` is unavailable on `wasm32-unknown-unknown`; there the
//! timer only logs the stage name and the WASM layer measures wall time with
//! `js_sys::Date::now()` instead.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// RAII timer that logs the elapsed time of a generation stage on drop.
pub struct Timed {
    name: &'static str,
    level: log::Level,
    #[cfg(not(target_arch = "wasm32"))]
    start: Instant,
}

impl Timed {
    fn start(name: &'static str, level: log::Level) -> Self {
        Self {
            name,
            level,
            #[cfg(not(target_arch = "wasm32"))]
            start: Instant::now(),
        }
    }

    /// Logs at INFO when dropped.
    pub fn info(name: &'static str) -> Self {
        log::debug!("{name}...");
        Self::start(name, log::Level::Info)
    }

    /// Logs at DEBUG when dropped.
    pub fn debug(name: &'static str) -> Self {
        log::trace!("{name}...");
        Self::start(name, log::Level::Debug)
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        log::log!(self.level, "{}: {:.3?}", self.name, self.start.elapsed());
        #[cfg(target_arch = "wasm32")]
        log::log!(self.level, "{}: done", self.name);
    }
}
