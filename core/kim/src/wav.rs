//! Minimal mono 8-bit PCM WAV reader/writer.
//!
//! KIM-1 tape audio only ever needs one RIFF/WAVE shape: `fmt `
//! (PCM, mono, 8 bits/sample) followed by `data`. This walks chunks by hand
//! rather than pulling in a general-purpose WAV crate, since every format
//! deviation is something we want to reject, not silently tolerate.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{KimError, KimResult};

/// Mono 8-bit PCM samples read from (or to be written to) a WAV file.
pub struct WavSamples {
    /// The WAV file's declared sample rate, in Hz.
    pub sample_rate: u32,
    /// The raw unsigned 8-bit PCM samples.
    pub samples: Vec<u8>,
}

fn read_chunk_id<R: Read>(reader: &mut R) -> KimResult<[u8; 4]> {
    let mut id = [0u8; 4];
    reader.read_exact(&mut id)?;
    Ok(id)
}

/// Read a mono 8-bit PCM WAV file, rejecting any other format.
pub fn read_pcm8_mono<R: Read + Seek>(reader: &mut R) -> KimResult<WavSamples> {
    if &read_chunk_id(reader)? != b"RIFF" {
        return Err(KimError::unsupported_wav("missing RIFF header"));
    }
    reader.read_u32::<LittleEndian>()?; // overall chunk size, unused
    if &read_chunk_id(reader)? != b"WAVE" {
        return Err(KimError::unsupported_wav("missing WAVE format tag"));
    }

    let mut sample_rate = None;
    let mut channels = None;
    let mut bits_per_sample = None;
    let mut audio_format = None;
    let mut samples = None;

    loop {
        let id = match read_chunk_id(reader) {
            Ok(id) => id,
            Err(KimError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        let size = reader.read_u32::<LittleEndian>()?;

        match &id {
            b"fmt " => {
                audio_format = Some(reader.read_u16::<LittleEndian>()?);
                channels = Some(reader.read_u16::<LittleEndian>()?);
                sample_rate = Some(reader.read_u32::<LittleEndian>()?);
                reader.read_u32::<LittleEndian>()?; // byte rate
                reader.read_u16::<LittleEndian>()?; // block align
                bits_per_sample = Some(reader.read_u16::<LittleEndian>()?);
                if size > 16 {
                    reader.seek(SeekFrom::Current((size - 16) as i64))?;
                }
            }
            b"data" => {
                let mut buf = vec![0u8; size as usize];
                reader.read_exact(&mut buf)?;
                samples = Some(buf);
            }
            _ => {
                reader.seek(SeekFrom::Current(size as i64))?;
            }
        }
        if size % 2 != 0 {
            reader.seek(SeekFrom::Current(1))?;
        }
    }

    if audio_format != Some(1) {
        return Err(KimError::unsupported_wav("not integer PCM"));
    }
    if channels != Some(1) {
        return Err(KimError::unsupported_wav("expected mono audio"));
    }
    if bits_per_sample != Some(8) {
        return Err(KimError::unsupported_wav("expected 8 bits per sample"));
    }

    Ok(WavSamples {
        sample_rate: sample_rate.ok_or_else(|| KimError::unsupported_wav("missing fmt chunk"))?,
        samples: samples.ok_or_else(|| KimError::unsupported_wav("missing data chunk"))?,
    })
}

/// Write `samples` as a mono 8-bit PCM WAV file at `sample_rate` Hz.
pub fn write_pcm8_mono<W: Write>(writer: &mut W, sample_rate: u32, samples: &[u8]) -> KimResult<()> {
    let data_size = samples.len() as u32;

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(36 + data_size)?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(16)?;
    writer.write_u16::<LittleEndian>(1)?; // PCM
    writer.write_u16::<LittleEndian>(1)?; // mono
    writer.write_u32::<LittleEndian>(sample_rate)?;
    writer.write_u32::<LittleEndian>(sample_rate)?; // byte rate: rate * channels * bytes/sample
    writer.write_u16::<LittleEndian>(1)?; // block align
    writer.write_u16::<LittleEndian>(8)?; // bits per sample

    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_size)?;
    writer.write_all(samples)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_then_read_round_trips() {
        let samples = vec![0u8, 64, 128, 192, 255];
        let mut buf = Vec::new();
        write_pcm8_mono(&mut buf, 44100, &samples).unwrap();

        let mut cursor = Cursor::new(buf);
        let read_back = read_pcm8_mono(&mut cursor).unwrap();
        assert_eq!(read_back.sample_rate, 44100);
        assert_eq!(read_back.samples, samples);
    }

    #[test]
    fn test_rejects_non_riff() {
        let mut cursor = Cursor::new(b"JUNKxxxxxxxxxxxxxxxxxxxx".to_vec());
        assert!(matches!(
            read_pcm8_mono(&mut cursor),
            Err(KimError::UnsupportedWav { .. })
        ));
    }

    #[test]
    fn test_rejects_stereo() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36u32 + 2).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&2u16.to_le_bytes()); // stereo
        buf.extend_from_slice(&44100u32.to_le_bytes());
        buf.extend_from_slice(&88200u32.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&8u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&[0u8, 0u8]);

        let mut cursor = Cursor::new(buf);
        assert!(matches!(
            read_pcm8_mono(&mut cursor),
            Err(KimError::UnsupportedWav { .. })
        ));
    }
}
