//! Command line interface
//!
//! The binary is a single-purpose daemon, so the CLI is flat: every flag
//! overrides its environment counterpart.

use std::path::PathBuf;

use clap::Parser;

/// Lumen - local text-generation bridge over HTTP
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on (overrides LUMEN_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Restrict the listener to loopback addresses (overrides LUMEN_LOCAL_ONLY)
    #[arg(long)]
    pub local_only: bool,

    /// Engine command to run per generation call (overrides LUMEN_ENGINE_CMD)
    #[arg(long)]
    pub engine: Option<String>,

    /// Model file the engine should load (overrides LUMEN_MODEL)
    #[arg(long)]
    pub model: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from([
            "lumen",
            "--port",
            "9000",
            "--local-only",
            "--engine",
            "llama-cli -ngl 99",
        ]);
        assert_eq!(cli.port, Some(9000));
        assert!(cli.local_only);
        assert_eq!(cli.engine.as_deref(), Some("llama-cli -ngl 99"));
        assert_eq!(cli.model, None);
    }

    #[test]
    fn test_no_flags_needed() {
        let cli = Cli::parse_from(["lumen"]);
        assert_eq!(cli.port, None);
        assert!(!cli.local_only);
    }
}
