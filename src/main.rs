use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use vpiano::{translate_with, write_file, TranslateOptions};

/// Translate a virtual piano sheet into a MIDI file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Sheet to translate; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Output MIDI file [default: song.mid]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML file with translation options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tempo before the first TEMPO: token
    #[arg(long)]
    bpm: Option<u32>,

    /// Print the parsed events as YAML instead of writing MIDI
    #[arg(long)]
    dump_events: bool,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "vpiano=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_sheet(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut options = match &args.config {
        Some(path) => match TranslateOptions::load(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => TranslateOptions::default(),
    };
    if let Some(bpm) = args.bpm {
        if let Err(msg) = vpiano::ast::check_bpm(bpm) {
            eprintln!("--bpm {}", msg);
            process::exit(1);
        }
        options.initial_bpm = bpm;
    }
    if let Some(output) = args.output {
        options.output = output;
    }

    let source = match read_sheet(args.input.as_ref()) {
        Ok(content) => content,
        Err(e) => {
            let name = args
                .input
                .as_ref()
                .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
            eprintln!("Error reading '{}': {}", name, e);
            process::exit(1);
        }
    };

    if source.trim().is_empty() {
        eprintln!("Sheet is empty, nothing to translate");
        process::exit(1);
    }

    let translation = translate_with(&source, &options);
    for warning in &translation.warnings {
        eprintln!("warning: {}", warning);
    }

    if args.dump_events {
        match serde_yaml::to_string(&translation.sheet) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("Error formatting events: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = write_file(&translation.bytes, &options.output) {
        eprintln!("{}", e);
        process::exit(1);
    }
    eprintln!(
        "Wrote MIDI to {} ({} notes, {} ticks)",
        options.output.display(),
        translation.sheet.note_count(),
        translation.sheet.duration_ticks()
    );
}
