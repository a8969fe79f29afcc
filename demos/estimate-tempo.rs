//! Prints the most probable tempo of an audio file.
//!
//! Run with `$ cargo run --release --features wav --example estimate-tempo -- <file.wav>`

use log::LevelFilter;
use std::fs::File;
use std::io::BufReader;
use std::process::exit;
use tempo_estimator::wav::read_wav;
use tempo_estimator::{AnalysisRange, FileFormat, TempoAnalyzer};

fn init_logger() {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .with_colors(true)
        .with_utc_timestamps()
        .init()
        .unwrap();
}

fn main() {
    init_logger();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: estimate-tempo <file>");
        exit(1);
    };

    let mut file = BufReader::new(File::open(&path).unwrap());
    let sniffed = FileFormat::detect_reader(&mut file).unwrap();
    log::info!("{path}: detected format {}", sniffed.format);

    if sniffed.format != FileFormat::Wav {
        eprintln!("only WAV files can be decoded, got {}", sniffed.format);
        exit(1);
    }

    let mut buffer = read_wav(sniffed.chain(file)).unwrap();
    log::info!(
        "{} frames, {} channel(s) at {} Hz",
        buffer.frame_count(),
        buffer.channels(),
        buffer.sample_rate()
    );

    let mut analyzer = TempoAnalyzer::default();
    let estimate = analyzer.estimate(&mut buffer, AnalysisRange::full()).unwrap();
    println!("{estimate}");
}
