//! KIM-1 cassette tape codec: decodes PCM WAV tape recordings into binary
//! memory images, and encodes memory images back into tape audio.

pub mod bitstream;
pub mod classifier;
pub mod conditioner;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod pulse_decoder;
pub mod recover;
pub mod wav;

pub use bitstream::{Bitstream, Fix};
pub use classifier::{PulseClass, ZeroCrossClassifier};
pub use encoder::Encoder;
pub use error::{KimError, KimResult};
pub use frame::{Record, extract};
pub use pulse_decoder::{DecodeEvent, PulseDecoder};
pub use recover::{RecoverConfig, recover};
pub use wav::{WavSamples, read_pcm8_mono, write_pcm8_mono};
