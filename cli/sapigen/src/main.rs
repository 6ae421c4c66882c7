//! sapigen: command-line front end for the Sandboxed API proxy generator.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ApiOverrides;

#[derive(Parser)]
#[command(name = "sapigen", version, about = "Sandboxed API proxy class generator")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the proxy class header
    Generate {
        /// Declaration file (.toml) or serialized model (.json)
        input: PathBuf,
        /// Write the header here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail if the existing output differs from what would be generated
        #[arg(long, requires = "output")]
        check: bool,
        #[command(flatten)]
        api: ApiOverrides,
    },
    /// Print each exposed function's signature and wrapper selection
    Signatures {
        /// Declaration file (.toml) or serialized model (.json)
        input: PathBuf,
        #[command(flatten)]
        api: ApiOverrides,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry the generated header.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            check,
            api,
        } => commands::generate::run(&input, output.as_deref(), check, &api),
        Commands::Signatures { input, api } => commands::signatures::run(&input, &api),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "sapigen",
            "generate",
            "zlib.sapi.toml",
            "-o",
            "zlib_sapi.sapi.h",
            "--function",
            "deflate",
            "--function",
            "inflate",
            "--embed-dir",
            "sandboxed_api/examples/zlib",
            "--embed-name",
            "zlib-sapi",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Generate { output, api, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(output, Some(PathBuf::from("zlib_sapi.sapi.h")));
        assert_eq!(api.functions, vec!["deflate", "inflate"]);
        assert_eq!(api.embed_name.as_deref(), Some("zlib-sapi"));
    }

    #[test]
    fn embed_flags_come_in_pairs() {
        let result = Cli::try_parse_from(["sapigen", "generate", "a.toml", "--embed-dir", "d"]);
        assert!(result.is_err());
    }

    #[test]
    fn header_guard_flags_conflict() {
        let result = Cli::try_parse_from([
            "sapigen",
            "generate",
            "a.toml",
            "--header-guard",
            "A_H_",
            "--no-header-guard",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn check_requires_output() {
        assert!(Cli::try_parse_from(["sapigen", "generate", "a.toml", "--check"]).is_err());
    }
}
