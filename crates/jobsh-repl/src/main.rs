//! jobsh CLI entry point.
//!
//! Usage:
//!   jobsh            # Interactive shell
//!   jobsh -p         # No prompt (for driving from a script)
//!   jobsh -v         # Print diagnostics such as "Added job" lines
//!   jobsh -V         # Version

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use jobsh_kernel::ShellConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with job output (RUST_LOG)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Shell(ShellConfig),
    Usage,
    Version,
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();

    match parse_args(&args) {
        Command::Shell(config) => {
            let code = jobsh_repl::run(config)?;
            Ok(ExitCode::from(code as u8))
        }
        Command::Usage => {
            print_usage();
            Ok(ExitCode::FAILURE)
        }
        Command::Version => {
            println!(
                "jobsh {} ({} {})",
                env!("CARGO_PKG_VERSION"),
                env!("JOBSH_GIT_HASH"),
                env!("JOBSH_BUILD_DATE")
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Flags may be given separately or grouped (`-vp`). Operands are ignored.
fn parse_args(args: &[String]) -> Command {
    let mut config = ShellConfig::interactive();

    for arg in args {
        let Some(flags) = arg.strip_prefix('-') else {
            continue;
        };
        for flag in flags.chars() {
            match flag {
                'v' => config = config.with_verbose(true),
                'p' => config = config.with_emit_prompt(false),
                'V' => return Command::Version,
                _ => return Command::Usage,
            }
        }
    }
    Command::Shell(config)
}

fn print_usage() {
    println!("Usage: jobsh [-hvpV]");
    println!("   -h   print this message");
    println!("   -v   print additional diagnostic information");
    println!("   -p   do not emit a command prompt");
    println!("   -V   print version and exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn shell(words: &[&str]) -> ShellConfig {
        match parse_args(&args(words)) {
            Command::Shell(config) => config,
            other => panic!("expected shell, got {other:?}"),
        }
    }

    #[test]
    fn defaults_prompt_quietly() {
        let config = shell(&[]);
        assert!(config.emit_prompt);
        assert!(!config.verbose);
    }

    #[test]
    fn grouped_flags() {
        let config = shell(&["-vp"]);
        assert!(config.verbose);
        assert!(!config.emit_prompt);
    }

    #[test]
    fn help_and_unknown_print_usage() {
        assert_eq!(parse_args(&args(&["-h"])), Command::Usage);
        assert_eq!(parse_args(&args(&["-x"])), Command::Usage);
        assert_eq!(parse_args(&args(&["-V"])), Command::Version);
    }
}
