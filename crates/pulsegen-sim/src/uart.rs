//! Receiver model of the legacy clock's serial input.
//!
//! The clock counts one second for every character it receives. Only the
//! shape of the low phase matters: a zero byte is the start bit plus eight
//! zero data bits, so the line has to stay low for nine bit times give or
//! take half a bit, and must not fall again before the stop bit is sampled.

use pulsegen_pulse::SerialFrame;
use serde::Serialize;

/// Rejected frames kept for the report.
const REJECTED_KEPT: usize = 32;

/// How the receiver read one low phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameVerdict {
    /// A clean 0x00 character.
    ZeroByte,
    /// Released before the last data bit was sampled.
    TooShort,
    /// Still low when the stop bit was sampled.
    TooLong,
}

/// One low phase seen on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReceivedFrame {
    /// Falling edge, in simulated nanoseconds.
    pub start_ns: u64,
    /// Low duration.
    pub low_ns: u64,
    /// Decoding result.
    pub verdict: FrameVerdict,
}

/// Running totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UartCounters {
    /// Characters decoded as 0x00.
    pub zero_bytes: u64,
    /// Low phases too short for a character.
    pub too_short: u64,
    /// Low phases that swallowed the stop bit.
    pub too_long: u64,
    /// Start bits that arrived before the previous stop bit was sampled.
    pub stop_bit_violations: u64,
}

impl UartCounters {
    /// Every frame that did not decode cleanly.
    #[must_use]
    pub fn errors(&self) -> u64 {
        self.too_short + self.too_long + self.stop_bit_violations
    }
}

/// Edge-driven receiver.
#[derive(Debug, Clone)]
pub struct UartMonitor {
    frame: SerialFrame,
    line_high: bool,
    fell_at_ns: Option<u64>,
    counters: UartCounters,
    rejected: Vec<ReceivedFrame>,
}

impl UartMonitor {
    /// An idle receiver for `frame`.
    #[must_use]
    pub fn new(frame: SerialFrame) -> Self {
        Self {
            frame,
            line_high: true,
            fell_at_ns: None,
            counters: UartCounters::default(),
            rejected: Vec::new(),
        }
    }

    /// The line changed to `high` at `at_ns`. Repeated levels are ignored.
    pub fn edge(&mut self, at_ns: u64, high: bool) {
        if high == self.line_high {
            return;
        }
        self.line_high = high;
        if high {
            self.rise(at_ns);
        } else {
            self.fall(at_ns);
        }
    }

    fn fall(&mut self, at_ns: u64) {
        let (_, stop_sample) = self.frame.zero_byte_low_window_ns();
        if let Some(previous) = self.fell_at_ns
            && ns_to_f64(at_ns.saturating_sub(previous)) < stop_sample
        {
            self.counters.stop_bit_violations += 1;
        }
        self.fell_at_ns = Some(at_ns);
    }

    fn rise(&mut self, at_ns: u64) {
        let Some(start_ns) = self.fell_at_ns else {
            return;
        };
        let low_ns = at_ns.saturating_sub(start_ns);
        let (min, _) = self.frame.zero_byte_low_window_ns();
        let verdict = if self.frame.accepts_low_ns(ns_to_f64(low_ns)) {
            FrameVerdict::ZeroByte
        } else if ns_to_f64(low_ns) < min {
            FrameVerdict::TooShort
        } else {
            FrameVerdict::TooLong
        };
        match verdict {
            FrameVerdict::ZeroByte => self.counters.zero_bytes += 1,
            FrameVerdict::TooShort => self.counters.too_short += 1,
            FrameVerdict::TooLong => self.counters.too_long += 1,
        }
        if verdict != FrameVerdict::ZeroByte && self.rejected.len() < REJECTED_KEPT {
            self.rejected.push(ReceivedFrame {
                start_ns,
                low_ns,
                verdict,
            });
        }
    }

    /// Totals so far.
    #[must_use]
    pub fn counters(&self) -> UartCounters {
        self.counters
    }

    /// The first rejected frames.
    #[must_use]
    pub fn rejected(&self) -> &[ReceivedFrame] {
        &self.rejected
    }

    /// Current line level.
    #[must_use]
    pub fn line_high(&self) -> bool {
        self.line_high
    }
}

#[allow(clippy::cast_precision_loss)]
fn ns_to_f64(ns: u64) -> f64 {
    ns as f64
}
