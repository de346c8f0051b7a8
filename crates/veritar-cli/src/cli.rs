//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "veritar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show every verified member
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational and warning output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify archive members against a checksum file
    Verify(VerifyArgs),
    /// Create an archive and its checksum file
    Create(CreateArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Path to the tar archive (optionally compressed)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Checksum file with `<md5>  <path>` lines
    #[arg(value_name = "CHECKSUMS")]
    pub checksums: PathBuf,

    /// Do not report skipped members or missing checksums
    #[arg(short = 'n', long)]
    pub no_warn: bool,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Checksum file path (default: <OUTPUT>.md5)
    #[arg(short = 'm', long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Leave out hidden files and directories
    #[arg(long)]
    pub exclude_hidden: bool,

    /// Exclude pattern (glob, can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Overwrite output files if they exist
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["veritar", "-v", "-q", "verify", "a.tar", "a.md5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_verify() {
        let cli = Cli::try_parse_from(["veritar", "verify", "a.tar", "a.md5", "-n"]).unwrap();
        let Commands::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.archive, PathBuf::from("a.tar"));
        assert_eq!(args.checksums, PathBuf::from("a.md5"));
        assert!(args.no_warn);
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "veritar", "create", "out.tgz", "src", "docs", "-l", "9", "-x", "*.tmp", "-x",
            "*.log", "-m", "sums.md5",
        ])
        .unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.sources.len(), 2);
        assert_eq!(args.compression_level, Some(9));
        assert_eq!(args.exclude, vec!["*.tmp", "*.log"]);
        assert_eq!(args.manifest, Some(PathBuf::from("sums.md5")));
    }

    #[test]
    fn test_compression_level_range() {
        assert!(Cli::try_parse_from(["veritar", "create", "o.tar", "src", "-l", "0"]).is_err());
        assert!(Cli::try_parse_from(["veritar", "create", "o.tar", "src", "-l", "10"]).is_err());
    }
}
