//! Lap stopwatch for the per-pass step metrics.

/// Milliseconds from an arbitrary origin. `Date::now` on wasm (no `Instant`
/// there), a process-wide `Instant` natively.
#[inline]
fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::sync::OnceLock;
        use std::time::Instant;
        static ORIGIN: OnceLock<Instant> = OnceLock::new();
        ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
    }
}

/// Measures a whole step (`elapsed_ms`) and each pass inside it (`lap_ms`).
#[derive(Clone, Copy, Debug)]
pub(crate) struct PerfTimer {
    origin_ms: f64,
    lap_ms: f64,
}

impl PerfTimer {
    pub(crate) fn start() -> Self {
        let now = now_ms();
        PerfTimer { origin_ms: now, lap_ms: now }
    }

    /// Since `start`, laps included.
    pub(crate) fn elapsed_ms(&self) -> f64 {
        now_ms() - self.origin_ms
    }

    /// Since the previous lap (or `start`).
    pub(crate) fn lap_ms(&mut self) -> f64 {
        let now = now_ms();
        let lap = now - self.lap_ms;
        self.lap_ms = now;
        lap
    }
}
