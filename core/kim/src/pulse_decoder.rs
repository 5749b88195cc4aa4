//! Groups classified tone pulses into KIM-1 frame bits, synthesising
//! placeholder bits across signal dropouts.

use crate::bitstream::Fix;
use crate::classifier::PulseClass;

const T_BIT_SECS: f64 = 7.452 / 1000.0;
const GAP_THRESHOLD_SECS: f64 = 10.0 / 1000.0;

/// A diagnostic event emitted while decoding pulses into bits, mirroring
/// the original tool's `'?'`/`'#'`/per-bit trace markers. The CLI is the
/// only consumer; the library never prints anything itself.
#[derive(Debug, Clone, Copy)]
pub enum DecodeEvent {
    /// A bit was decoded from a clean `9-9-6`/`9-6-6` run.
    Bit(bool),
    /// A run of pulses did not match any known `(c9, c6)` pattern.
    AmbiguousRun { c9: u32, c6: u32 },
    /// A placeholder bit was synthesised to bridge a dropout.
    SynthesizedBit,
}

/// Groups a stream of [`PulseClass`] values into bits, synthesising
/// placeholder `1` bits (and recording [`Fix`]es for them) across dropouts
/// longer than 10ms.
pub struct PulseDecoder {
    c9: u32,
    c6: u32,
    was_six: bool,
    time: f64,
    first: bool,
    last_valid_bit_time: f64,
    bits: Vec<bool>,
    fixes: Vec<Fix>,
}

impl Default for PulseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseDecoder {
    pub fn new() -> Self {
        Self {
            c9: 0,
            c6: 0,
            was_six: true,
            time: 0.0,
            first: true,
            last_valid_bit_time: -1.0,
            bits: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Feed one classified pulse. `time` is the pulse's source timestamp,
    /// in seconds, used only to drive gap filling and to stamp [`Fix`]es.
    ///
    /// Returns any diagnostic events produced by this pulse (zero, one, or
    /// two: a run completion can both synthesise bits and then emit the
    /// real bit).
    pub fn push(&mut self, class: PulseClass, time: f64, events: &mut Vec<DecodeEvent>) {
        self.time = time;
        let is_six = matches!(class, PulseClass::Six);

        if self.was_six && !is_six {
            self.finish_run(events);
        }
        match is_six {
            true => self.c6 += 1,
            false => self.c9 += 1,
        }
        self.was_six = is_six;
    }

    fn finish_run(&mut self, events: &mut Vec<DecodeEvent>) {
        let c9 = snap_c9(self.c9);
        let c6 = snap_c6(self.c6);

        if c9 == 10 && c6 == 11 {
            self.emit_bit(true, events);
        } else if c9 == 18 && c6 == 6 {
            self.emit_bit(false, events);
        } else {
            events.push(DecodeEvent::AmbiguousRun {
                c9: self.c9,
                c6: self.c6,
            });
        }

        self.c9 = 0;
        self.c6 = 0;
    }

    fn emit_bit(&mut self, bit: bool, events: &mut Vec<DecodeEvent>) {
        if !self.first {
            while self.time - self.last_valid_bit_time > GAP_THRESHOLD_SECS {
                self.fixes.push(Fix {
                    bit_index: self.bits.len(),
                    source_timestamp: self.last_valid_bit_time,
                });
                self.bits.push(true);
                self.last_valid_bit_time += T_BIT_SECS;
                events.push(DecodeEvent::SynthesizedBit);
            }
        }
        self.first = false;
        self.last_valid_bit_time = self.time;

        self.bits.push(bit);
        events.push(DecodeEvent::Bit(bit));
    }

    /// Consume the decoder, returning the accumulated bits and fixes.
    pub fn into_parts(self) -> (Vec<bool>, Vec<Fix>) {
        (self.bits, self.fixes)
    }
}

fn snap_c9(c9: u32) -> u32 {
    match c9 {
        9 | 10 | 11 => 10,
        17 | 18 | 19 => 18,
        other => other,
    }
}

fn snap_c6(c6: u32) -> u32 {
    match c6 {
        10 | 11 | 12 => 11,
        5 | 6 | 7 => 6,
        other => other,
    }
}
