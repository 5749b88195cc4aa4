use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use kim::{Bitstream, Encoder, PulseDecoder, RecoverConfig, Record, ZeroCrossClassifier, conditioner, read_pcm8_mono, recover, write_pcm8_mono};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Raw payload bytes (the decoded memory image, id and address excluded).
    Data,
    /// The framed KIM-1 byte stream (SYN preamble, markers, ASCII hex, EOT).
    Kim,
    /// The bit sequence as `'0'`/`'1'` characters.
    Bits,
    /// Re-encoded as a tape-audio WAV file.
    Wav,
}

/// Decode a KIM-1 cassette tape recording into a memory image, recovering
/// from dropouts where possible.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input WAV file (8-bit mono PCM).
    #[arg(default_value = "input.wav")]
    input: PathBuf,

    /// Smoothing window half-width passed to the signal conditioner.
    #[arg(long, default_value_t = 0)]
    smooth: usize,

    /// Suppress per-bit decode diagnostics.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    silent: bool,

    /// Print extra diagnostics: dropped crossings, ambiguous runs, fixes.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
    verbose: bool,

    /// How to resolve unresolved bits before recovery, one character per
    /// fix (cycling): '0' or '1' forces that value, anything else ('x' by
    /// convention) leaves the bit enumerated.
    #[arg(long, default_value = "")]
    patch: String,

    /// Dump the raw bitstream as a grouped `'0'`/`'1'` string to stderr.
    #[arg(long)]
    bitstream: bool,

    /// Dump the bitstream as a hex+ASCII byte table to stderr, skipping the
    /// given number of leading bits.
    #[arg(long)]
    bytestream: Option<usize>,

    /// Write the first recovered record in this format. May be repeated to
    /// write multiple formats in one run.
    #[arg(long = "output", value_enum)]
    outputs: Vec<OutputFormat>,

    /// Reject recovery once more than this many bits are unresolved.
    #[arg(long = "max-unknowns", default_value_t = 20)]
    max_unknowns: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut file = File::open(&args.input).with_context(|| format!("opening {}", args.input.display()))?;
    let wav = read_pcm8_mono(&mut file).with_context(|| format!("reading {} as PCM WAV", args.input.display()))?;
    println!("read {} samples at {} Hz", wav.samples.len(), wav.sample_rate);

    let conditioned = conditioner::smooth(&wav.samples, args.smooth);

    let mut classifier = ZeroCrossClassifier::new();
    let mut decoder = PulseDecoder::new();
    let mut events = Vec::new();

    for (i, &sample) in conditioned.iter().enumerate() {
        match classifier.push(sample) {
            Some(class) => {
                let time = i as f64 * kim::classifier::SAMPLE_DELTA_SECS;
                decoder.push(class, time, &mut events);
            }
            None if args.verbose => eprint!("*"),
            None => {}
        }
    }

    if args.verbose {
        eprintln!();
        for event in &events {
            match event {
                kim::DecodeEvent::Bit(b) => eprint!("{}", *b as u8),
                kim::DecodeEvent::AmbiguousRun { c9, c6 } => eprint!("?({c9},{c6})"),
                kim::DecodeEvent::SynthesizedBit => eprint!("#"),
            }
        }
        eprintln!();
    }

    let (bits, fixes) = decoder.into_parts();
    let mut bitstream = Bitstream::new(bits, fixes).context("assembling bitstream")?;

    if args.bitstream {
        eprintln!("{}", bitstream.to_binary_string());
    }
    if let Some(offset) = args.bytestream {
        eprintln!("{}", bitstream.to_hex_dump(offset));
    }

    if !args.silent {
        for fix in bitstream.fixes() {
            eprintln!("unresolved bit #{} near t={:.4}s", fix.bit_index, fix.source_timestamp);
        }
    }

    bitstream.apply_patch(&args.patch);

    let config = RecoverConfig {
        max_fixes: args.max_unknowns,
    };
    let records = recover(&bitstream, &config).context("recovering records")?;
    println!("recovered {} distinct record(s)", records.len());

    if !args.outputs.is_empty() && records.is_empty() {
        bail!("--output requested but no records were recovered");
    }

    if let Some(record) = records.first() {
        for format in &args.outputs {
            write_output(*format, record, &args.input)?;
        }
    }

    Ok(())
}

fn write_output(format: OutputFormat, record: &Record, input: &PathBuf) -> Result<()> {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    match format {
        OutputFormat::Data => {
            let path = format!("{stem}.data.bin");
            std::fs::write(&path, &record.payload).with_context(|| format!("writing {path}"))?;
            println!("wrote payload data to {path}");
        }
        OutputFormat::Kim => {
            let path = format!("{stem}.kim");
            let bytes = Encoder::new().encode_bytes(record);
            std::fs::write(&path, &bytes).with_context(|| format!("writing {path}"))?;
            println!("wrote KIM byte stream to {path}");
        }
        OutputFormat::Bits => {
            let path = format!("{stem}.bits.txt");
            let bits = Encoder::new().encode_bits(record);
            let text: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
            std::fs::write(&path, text).with_context(|| format!("writing {path}"))?;
            println!("wrote bit string to {path}");
        }
        OutputFormat::Wav => {
            let path = format!("{stem}.out.wav");
            let samples = Encoder::new().encode_wav(record);
            let file = File::create(&path).with_context(|| format!("creating {path}"))?;
            let mut writer = BufWriter::new(file);
            write_pcm8_mono(&mut writer, 44_100, &samples).with_context(|| format!("writing {path}"))?;
            println!("wrote tape audio to {path}");
        }
    }
    Ok(())
}
