//! Combinatorial recovery: try every way of resolving a bitstream's
//! unresolved bits and collect the distinct records that decode cleanly.

use crate::bitstream::Bitstream;
use crate::error::{KimError, KimResult};
use crate::frame::{self, Record};

/// Configuration for [`recover`].
#[derive(Debug, Clone, Copy)]
pub struct RecoverConfig {
    /// Reject bitstreams with more unresolved bits than this, since trying
    /// every combination would be impractical.
    pub max_fixes: usize,
}

impl Default for RecoverConfig {
    fn default() -> Self {
        Self { max_fixes: 20 }
    }
}

/// Tries every materialisation of `bitstream`'s unresolved bits, extracting
/// the first record from each, and returns the distinct records found.
///
/// Materialisations that fail to decode (no SYN, bad checksum, etc.) are
/// silently dropped; only structurally distinct successes are returned.
pub fn recover(bitstream: &Bitstream, config: &RecoverConfig) -> KimResult<Vec<Record>> {
    let fix_count = bitstream.fix_count();
    if fix_count > config.max_fixes {
        return Err(KimError::TooManyUnknowns {
            count: fix_count,
            max: config.max_fixes,
        });
    }

    let combinations = 1u64 << fix_count;
    let mut found: Vec<Record> = Vec::new();

    for k in 0..combinations {
        let bits = bitstream.materialise(k);
        if let Ok((record, _)) = frame::extract(&bits, 0) {
            if !found.contains(&record) {
                found.push(record);
            }
        }
    }

    Ok(found)
}
