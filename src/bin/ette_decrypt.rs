//! `ette-decrypt` - print the plaintext of an encrypted ette file
//!
//! Decrypts a container written by the editor and writes the flat text to
//! stdout, optionally syntax colored.

#![forbid(unsafe_code)]

use ette::crypto::ENCRYPTED_SUFFIX;
use ette::highlight::{SyntaxRegistry, Theme};
use ette::{Document, LogLevel, storage};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

// ============================================================================
// CLI Parsing
// ============================================================================

const HELP_TEXT: &str = "ette-decrypt - print the plaintext of an encrypted ette file

USAGE:
    ette-decrypt [OPTIONS] <FILE> <PASSWORD>

OPTIONS:
    -h, --help      Print this help message and exit
    -V, --version   Print version and exit
    --check         Only verify the password; exit status 0 if it opens FILE
    --color         Syntax color the output by FILE's extension
    --verbose       Log progress to stderr

EXAMPLES:
    ette-decrypt notes.aes256cbc test
    ette-decrypt --color main.c.aes256cbc test
";

/// Parsed command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub file: PathBuf,
    pub password: String,
    pub check_only: bool,
    pub color: bool,
    pub verbose: bool,
}

/// Outcome of argument parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// Successfully parsed configuration.
    Config(Config),
    /// User requested help.
    Help,
    /// User requested the version.
    Version,
    /// Parse error with message.
    Error(String),
}

impl Config {
    /// Parse configuration from command-line arguments.
    pub fn from_args<I>(args: I) -> ParseResult
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter();

        // Skip program name
        args.next();

        for arg in args {
            let arg_str = arg.to_string_lossy();
            match arg_str.as_ref() {
                "-h" | "--help" => return ParseResult::Help,
                "-V" | "--version" => return ParseResult::Version,
                "--check" => config.check_only = true,
                "--color" => config.color = true,
                "--verbose" => config.verbose = true,
                other if other.starts_with("--") => {
                    return ParseResult::Error(format!("Unknown option: {other}"));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        match (positional.next(), positional.next(), positional.next()) {
            (Some(file), Some(password), None) => {
                config.file = PathBuf::from(file);
                config.password = password.to_string_lossy().into_owned();
                ParseResult::Config(config)
            }
            (Some(_), Some(_), Some(extra)) => ParseResult::Error(format!(
                "Unexpected argument: {}",
                extra.to_string_lossy()
            )),
            _ => ParseResult::Error("Usage: ette-decrypt <FILE> <PASSWORD>".to_string()),
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() {
    match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => {
            if let Err(err) = run(&config) {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
        ParseResult::Help => print!("{HELP_TEXT}"),
        ParseResult::Version => println!("ette version {}", env!("CARGO_PKG_VERSION")),
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn run(config: &Config) -> ette::Result<()> {
    if config.verbose {
        ette::set_log_callback(|level, message| {
            let tag = match level {
                LogLevel::Debug => "debug",
                LogLevel::Info => "info",
                LogLevel::Warn => "warn",
                LogLevel::Error => "error",
            };
            eprintln!("[{tag}] {message}");
        });
    }

    let bytes = std::fs::read(&config.file)?;
    let mut document = storage::open_encrypted(&bytes, &config.password)?;
    if config.check_only {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    if config.color {
        let filename = config.file.to_string_lossy();
        let filename = filename.trim_end_matches(ENCRYPTED_SUFFIX);
        document.set_syntax(SyntaxRegistry::with_builtins().for_filename(filename));
        write_colored(&document, &Theme::ansi(), &mut stdout)?;
    } else {
        stdout.write_all(&storage::save(&document))?;
    }
    stdout.flush()?;
    Ok(())
}

fn write_colored(document: &Document, theme: &Theme, out: &mut impl Write) -> io::Result<()> {
    let mut line = Vec::new();
    for (render, hl) in document.render() {
        line.clear();
        theme.paint_row(render, hl, &mut line);
        line.push(b'\n');
        out.write_all(&line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ParseResult {
        Config::from_args(
            std::iter::once("ette-decrypt")
                .chain(args.iter().copied())
                .map(OsString::from),
        )
    }

    #[test]
    fn positional_arguments() {
        let ParseResult::Config(config) = parse(&["notes.aes256cbc", "test"]) else {
            panic!("expected config");
        };
        assert_eq!(config.file, PathBuf::from("notes.aes256cbc"));
        assert_eq!(config.password, "test");
        assert!(!config.color);
    }

    #[test]
    fn flags_anywhere() {
        let ParseResult::Config(config) = parse(&["--color", "a.c", "pw", "--check"]) else {
            panic!("expected config");
        };
        assert!(config.color);
        assert!(config.check_only);
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"]), ParseResult::Help);
        assert_eq!(parse(&["x", "-V"]), ParseResult::Version);
    }

    #[test]
    fn argument_errors() {
        assert!(matches!(parse(&[]), ParseResult::Error(_)));
        assert!(matches!(parse(&["only-file"]), ParseResult::Error(_)));
        assert!(matches!(parse(&["a", "b", "c"]), ParseResult::Error(_)));
        assert!(matches!(parse(&["--bogus", "a", "b"]), ParseResult::Error(_)));
    }

    #[test]
    fn colored_output_ends_rows() {
        let document = storage::open_plain(b"int x;\n");
        let mut out = Vec::new();
        write_colored(&document, &Theme::ansi(), &mut out).unwrap();
        assert!(out.ends_with(b"\x1b[39m\n"));
        assert!(out.starts_with(b"int"));
    }
}
