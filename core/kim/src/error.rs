//! Error types for the KIM-1 tape codec.

use thiserror::Error;

/// Result type alias for KIM-1 codec operations.
pub type KimResult<T> = Result<T, KimError>;

/// Errors that can occur while decoding or encoding a KIM-1 tape image.
#[derive(Debug, Error)]
pub enum KimError {
    /// No SYN preamble (`0x16` bytes) was found anywhere in the bitstream.
    #[error("no SYN preamble found")]
    NoSyn,

    /// A SYN run was found but was not followed by `'*'`.
    #[error("no '*' start marker after SYN preamble")]
    NoStar,

    /// No `'/'` checksum separator was found after the data start.
    #[error("no '/' checksum separator found")]
    SlashNotFound,

    /// No EOT (`0x04`) terminator was found after the checksum separator.
    #[error("no EOT terminator found")]
    EotNotFound,

    /// The checksum field between `'/'` and EOT was not exactly 40 bits.
    #[error("checksum field is {actual} bits, expected 40")]
    ChecksumFieldBadLength {
        /// The bit count actually found between `'/'` and EOT.
        actual: usize,
    },

    /// A byte in the ASCII-hex payload or checksum field was not `0-9A-F`.
    #[error("byte {byte:#04x} at bit offset {bit_offset} is not an ASCII hex digit")]
    BadAsciiHex {
        /// The offending byte value.
        byte: u8,
        /// The bit offset at which it occurred.
        bit_offset: usize,
    },

    /// The payload's ASCII-hex digit count was odd.
    #[error("payload has an odd number of ASCII hex digits")]
    OddPayload,

    /// The declared checksum did not match the computed one.
    #[error("checksum mismatch: declared {declared:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        /// The checksum read from the tape.
        declared: u16,
        /// The checksum computed from the payload.
        computed: u16,
    },

    /// A `Fix`'s `bit_index` fell outside the owning bitstream.
    #[error("fix at bit index {index} is out of range for a bitstream of length {len}")]
    FixOutOfRange {
        /// The out-of-range index.
        index: usize,
        /// The length of the bitstream it was supposed to index into.
        len: usize,
    },

    /// A bitstream's fix list was not sorted by `bit_index`, or had duplicates.
    #[error("fixes are not sorted by bit_index, or contain duplicates")]
    FixesNotSorted,

    /// The bitstream has more unresolved bits than the configured cap allows.
    #[error("{count} unresolved bits exceeds the cap of {max}")]
    TooManyUnknowns {
        /// The number of unresolved bits found.
        count: usize,
        /// The configured cap.
        max: usize,
    },

    /// The input WAV file is not mono 8-bit PCM.
    #[error("unsupported WAV input: {reason}")]
    UnsupportedWav {
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// An I/O error occurred reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KimError {
    /// Create a new unsupported-WAV error with the given reason.
    pub fn unsupported_wav(reason: impl Into<String>) -> Self {
        KimError::UnsupportedWav {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_mismatch_display() {
        let err = KimError::ChecksumMismatch {
            declared: 0x0167,
            computed: 0x0001,
        };
        let msg = err.to_string();
        assert!(msg.contains("0167"));
        assert!(msg.contains("0001"));
    }

    #[test]
    fn test_unsupported_wav_helper() {
        let err = KimError::unsupported_wav("expected mono");
        assert!(matches!(err, KimError::UnsupportedWav { .. }));
        assert!(err.to_string().contains("expected mono"));
    }

    #[test]
    fn test_too_many_unknowns_display() {
        let err = KimError::TooManyUnknowns { count: 30, max: 20 };
        let msg = err.to_string();
        assert!(msg.contains("30"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let kim_err: KimError = io_err.into();
        assert!(matches!(kim_err, KimError::Io(_)));
    }
}
