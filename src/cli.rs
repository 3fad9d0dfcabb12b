// Command-line front end for ichingcode.
//
// Explicit subcommands and long-form options over the library: `encode`
// reads binary input and prints hexagram (or base64) text, `decode` turns
// a literal string or a text file back into bytes.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};

use crate::codec::Alphabet;
use crate::codec::alphabet::{DATA_SYMBOLS, PADDING_SYMBOLS};
use crate::io::{self as codec_io, DecodeStats, EncodeStats};
use crate::scheme::Scheme;

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Binary-to-text encoder using I Ching hexagrams.
#[derive(Parser, Debug)]
#[command(
    name = "ichingcode",
    version,
    about = "Encode binary data as I Ching hexagrams",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode binary input as text.
    Encode(EncodeArgs),
    /// Decode text back into binary.
    Decode(DecodeArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemeArg {
    Iching,
    Base64,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Iching => Scheme::Iching,
            SchemeArg::Base64 => Scheme::Base64,
        }
    }
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Text scheme to produce.
    #[arg(long, value_enum, default_value_t = SchemeArg::Iching)]
    scheme: SchemeArg,

    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Check/compute only (do not write output).
    #[arg(long = "check-only")]
    no_output: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Text scheme to read.
    #[arg(long, value_enum, default_value_t = SchemeArg::Iching)]
    scheme: SchemeArg,

    /// Encoded text given directly on the command line.
    #[arg(long, short = 't', conflicts_with_all = ["input", "output_pos"])]
    text: Option<String>,

    /// Input text file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Check/compute only (do not write output).
    #[arg(long = "check-only")]
    no_output: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    scheme: Scheme,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    no_output: bool,
    text: Option<String>,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let quiet = cli.quiet;
    let verbose = cli.verbose.min(2);
    let force = cli.force;
    let json_output = cli.json_output;

    match cli.command {
        Cmd::Encode(args) => Options {
            command: Command::Encode,
            scheme: args.scheme.into(),
            use_stdout: args.stdout,
            force,
            quiet,
            verbose,
            no_output: args.no_output,
            text: None,
            input_file: args.input.or(args.input_pos),
            output_file: args.output.or(args.output_pos),
            json_output,
        },
        Cmd::Decode(args) => {
            // With --text there is no input file, so a lone positional names
            // the output.
            let (input_file, output_file) = match (&args.text, args.output) {
                (Some(_), None) => (None, args.input_pos.or(args.output_pos)),
                (_, output) => (args.input.or(args.input_pos), output.or(args.output_pos)),
            };
            Options {
                command: Command::Decode,
                scheme: args.scheme.into(),
                use_stdout: args.stdout,
                force,
                quiet,
                verbose,
                no_output: args.no_output,
                text: args.text,
                input_file,
                output_file,
                json_output,
            }
        }
        Cmd::Config => Options {
            command: Command::Config,
            scheme: Scheme::default(),
            use_stdout: false,
            force,
            quiet,
            verbose,
            no_output: false,
            text: None,
            input_file: None,
            output_file: None,
            json_output,
        },
    }
}

/// Cross-argument checks clap cannot express declaratively.
fn validate(cli: &Cli) -> Result<(), clap::Error> {
    if let Cmd::Decode(args) = &cli.command {
        // With --text and -o, a positional has nothing left to name.
        if let (Some(_), Some(_), Some(path)) = (&args.text, &args.output, &args.input_pos) {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                format!(
                    "'--text' cannot be used with an input file: {}",
                    path.display()
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("ichingcode".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        if validate(&cli).is_err() {
            return;
        }
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn log_filter(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    }
}

fn hex_digest(digest: &[u8; 32]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, String> {
    match path {
        Some(path) => File::open(path)
            .map(|f| Box::new(BufReader::with_capacity(BUF_SIZE, f)) as Box<dyn Read>)
            .map_err(|e| format!("input file: {}: {e}", path.display())),
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(opts: &Options) -> Result<Box<dyn Write>, String> {
    if opts.no_output {
        return Ok(Box::new(io::sink()));
    }
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                return Err(format!(
                    "output file exists, use -f to overwrite: {}",
                    path.display()
                ));
            }
            File::create(path)
                .map(|f| Box::new(BufWriter::with_capacity(BUF_SIZE, f)) as Box<dyn Write>)
                .map_err(|e| format!("output file: {}: {e}", path.display()))
        }
    }
}

fn describe(opts: &Options) -> String {
    match opts.command {
        Command::Encode => format!("encoding binary data to {}", opts.scheme),
        Command::Decode => format!("decoding data from {}", opts.scheme),
        Command::Config => "printing configuration".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("ichingcode version {version} (Rust)");
    eprintln!("Licensed under the MIT License");

    let file_io = cfg!(feature = "file-io") as u8;
    let parallel = cfg!(feature = "parallel") as u8;
    let alphabet = Alphabet::iching();

    eprintln!("FILE_IO={file_io}");
    eprintln!("PARALLEL={parallel}");
    eprintln!("DATA_SYMBOLS={DATA_SYMBOLS}");
    eprintln!("PADDING_SYMBOLS={PADDING_SYMBOLS}");
    eprintln!("SYMBOL_WIDTH={}", alphabet.width());
    eprintln!("PAD={}", alphabet.pad());
    eprintln!("sizeof(usize)={}", std::mem::size_of::<usize>());

    0
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    // Read the whole input before touching the output so a failed read
    // leaves no empty file.
    let mut data = Vec::new();
    let read = open_input(opts.input_file.as_deref()).and_then(|mut reader| {
        reader
            .read_to_end(&mut data)
            .map_err(|e| format!("cannot read input: {e}"))
    });
    if let Err(e) = read {
        eprintln!("ichingcode: {e}");
        return 1;
    }
    let writer = match open_output(opts) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("ichingcode: {e}");
            return 1;
        }
    };

    let stats = match codec_io::encode_stream(&data[..], writer, opts.scheme) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ichingcode: encode error: {e}");
            return 1;
        }
    };

    report_encode(opts, &stats);
    0
}

fn report_encode(opts: &Options, stats: &EncodeStats) {
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "ichingcode: encoder: input size: {}, symbols: {}, padding: {}",
            stats.input_size, stats.symbols, stats.padding
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "encode",
            "scheme": opts.scheme.name(),
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "symbols": stats.symbols,
            "padding": stats.padding,
            "input_sha256": stats.input_sha256.as_ref().map(hex_digest),
        });
        eprintln!("{json:#}");
    }
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    // Decode fully before touching the output so bad input leaves no file.
    let mut decoded = Vec::new();
    let result = match &opts.text {
        Some(text) => codec_io::decode_str(text, &mut decoded, opts.scheme),
        None => match open_input(opts.input_file.as_deref()) {
            Ok(reader) => codec_io::decode_stream(reader, &mut decoded, opts.scheme),
            Err(e) => {
                eprintln!("ichingcode: {e}");
                return 1;
            }
        },
    };
    let stats = match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ichingcode: could not decode input: {e}");
            return 1;
        }
    };

    let mut writer = match open_output(opts) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("ichingcode: {e}");
            return 1;
        }
    };
    if let Err(e) = writer.write_all(&decoded).and_then(|()| writer.flush()) {
        eprintln!("ichingcode: cannot save: {e}");
        return 1;
    }

    report_decode(opts, &stats);
    0
}

fn report_decode(opts: &Options, stats: &DecodeStats) {
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "ichingcode: decoder: symbols: {}, padding: {}, output size: {}",
            stats.symbols, stats.padding, stats.output_size
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "decode",
            "scheme": opts.scheme.name(),
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "symbols": stats.symbols,
            "padding": stats.padding,
            "output_sha256": stats.output_sha256.as_ref().map(hex_digest),
        });
        eprintln!("{json:#}");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    if let Err(e) = validate(&cli) {
        e.exit();
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.quiet, cli.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout && !opts.quiet {
        if let Some(path) = &opts.output_file {
            eprintln!(
                "ichingcode: warning: -c option overrides output filename: {}",
                path.display()
            );
        }
    }
    if opts.use_stdout {
        opts.output_file = None;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!("ichingcode: {}", describe(&opts));
    }

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("ichingcode".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        validate(&cli).expect("cli validation failed");
        resolve_options(cli)
    }

    #[test]
    fn encode_subcommand_maps_correctly() {
        let opts = parse_opts(&["encode", "--scheme", "base64", "in.bin", "out.txt"]);
        assert_eq!(opts.command, Command::Encode);
        assert_eq!(opts.scheme, Scheme::Base64);
        assert_eq!(opts.input_file, Some(PathBuf::from("in.bin")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.txt")));
        assert!(opts.text.is_none());
    }

    #[test]
    fn scheme_defaults_to_iching() {
        assert_eq!(parse_opts(&["encode", "in"]).scheme, Scheme::Iching);
        assert_eq!(parse_opts(&["decode", "in"]).scheme, Scheme::Iching);
    }

    #[test]
    fn decode_literal_text_with_positional_output() {
        let opts = parse_opts(&["decode", "--text", "䷀䷀䷀䷀", "out.bin"]);
        assert_eq!(opts.command, Command::Decode);
        assert_eq!(opts.text.as_deref(), Some("䷀䷀䷀䷀"));
        assert!(opts.input_file.is_none());
        assert_eq!(opts.output_file, Some(PathBuf::from("out.bin")));

        let opts = parse_opts(&["decode", "-t", "abc", "-o", "x.bin"]);
        assert_eq!(opts.output_file, Some(PathBuf::from("x.bin")));
    }

    #[test]
    fn decode_file_input() {
        let opts = parse_opts(&["--quiet", "decode", "--check-only", "in.txt", "out.bin"]);
        assert!(opts.quiet);
        assert!(opts.no_output);
        assert_eq!(opts.input_file, Some(PathBuf::from("in.txt")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.bin")));
    }

    #[test]
    fn text_conflicts_with_input() {
        let argv = ["ichingcode", "decode", "--text", "x", "--input", "in.txt"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn text_with_output_rejects_input_file() {
        let argv = ["ichingcode", "decode", "--text", "x", "in.txt", "-o", "out.bin"];
        let cli = Cli::try_parse_from(argv).unwrap();
        let err = validate(&cli).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        // Without -o the positional is the output.
        let argv = ["ichingcode", "decode", "--text", "x", "out.bin"];
        assert!(validate(&Cli::try_parse_from(argv).unwrap()).is_ok());
    }

    #[test]
    fn global_stdio_and_force_flags() {
        let opts = parse_opts(&["--force", "encode", "--stdout", "in", "out"]);
        assert!(opts.use_stdout);
        assert!(opts.force);
    }

    #[test]
    fn verbose_is_capped() {
        let verbose = parse_opts(&["--verbose", "--verbose", "--verbose", "encode", "in"]);
        assert_eq!(verbose.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["ichingcode", "-q", "-v", "encode"]).is_err());
    }

    #[test]
    fn config_command_maps() {
        assert_eq!(parse_opts(&["config"]).command, Command::Config);
    }

    #[test]
    fn log_filter_levels() {
        assert_eq!(log_filter(true, 2), "error");
        assert_eq!(log_filter(false, 0), "warn");
        assert_eq!(log_filter(false, 1), "info");
        assert_eq!(log_filter(false, 2), "debug");
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let mut d = [0u8; 32];
        d[0] = 0xAB;
        d[31] = 0x01;
        let s = hex_digest(&d);
        assert_eq!(s.len(), 64);
        assert!(s.starts_with("ab00"));
        assert!(s.ends_with("01"));
    }

    #[test]
    fn describe_mentions_scheme() {
        let opts = parse_opts(&["decode", "--scheme", "base64", "in"]);
        assert_eq!(describe(&opts), "decoding data from base64");
    }

    #[test]
    fn fuzz_parser_tolerates_garbage() {
        fuzz_try_parse_args(&["decode".into(), "--bogus".into()]);
        fuzz_try_parse_args(&[]);
    }
}
