mod config;
mod logging;
mod anime_sort;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::anime_sort::AnimeSort;

#[derive(Parser)]
#[command(author, version, name = env!("CARGO_BIN_NAME"), about = "Sort downloaded anime episodes into per-series folders")]
pub(crate) struct NyaaSortArgs {
    /// Optional directory with the episodes to sort
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Directory for the series folders [default: same as input]
    #[arg(short, long, name = "OUTPUT", value_hint = clap::ValueHint::DirPath)]
    output: Option<PathBuf>,

    /// Mirror series folders and copy episodes to this directory
    #[arg(short, long, name = "BACKUP", value_hint = clap::ValueHint::DirPath)]
    backup: Option<PathBuf>,

    /// Print debug information
    #[arg(short = 'D', long, conflicts_with = "quiet")]
    debug: bool,

    /// File extensions to sort [default: mkv]
    #[arg(short = 't', long, num_args = 1, action = clap::ArgAction::Append, name = "EXTENSION")]
    extension: Vec<String>,

    /// Overwrite existing files in series folders
    #[arg(short, long)]
    force: bool,

    /// Only print changes without moving files
    #[arg(short, long)]
    print: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = NyaaSortArgs::parse();
    if let Some(ref shell) = args.completion {
        nyaa_sort::generate_shell_completion(*shell, NyaaSortArgs::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        AnimeSort::new(args)?.run()
    }
}

#[cfg(test)]
mod cli_args_tests {
    use super::*;

    #[test]
    fn parses_without_arguments() {
        let args = NyaaSortArgs::try_parse_from(["test"]).expect("should parse");
        assert!(args.path.is_none());
        assert!(args.output.is_none());
        assert!(args.backup.is_none());
        assert!(args.extension.is_empty());
        assert!(!args.print);
    }

    #[test]
    fn parses_directories() {
        let args = NyaaSortArgs::try_parse_from(["test", "downloads", "-o", "anime", "-b", "backup"])
            .expect("should parse");
        assert_eq!(args.path, Some(PathBuf::from("downloads")));
        assert_eq!(args.output, Some(PathBuf::from("anime")));
        assert_eq!(args.backup, Some(PathBuf::from("backup")));
    }

    #[test]
    fn parses_multiple_extension_args() {
        let args = NyaaSortArgs::try_parse_from(["test", "-t", "mkv", "-t", "mp4"]).expect("should parse");
        assert_eq!(args.extension, vec!["mkv", "mp4"]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(NyaaSortArgs::try_parse_from(["test", "-q", "-v"]).is_err());
        assert!(NyaaSortArgs::try_parse_from(["test", "-q", "-D"]).is_err());
    }

    #[test]
    fn parses_flags() {
        let args = NyaaSortArgs::try_parse_from(["test", "-p", "-f", "-v", "-D"]).expect("should parse");
        assert!(args.print);
        assert!(args.force);
        assert!(args.verbose);
        assert!(args.debug);
    }
}
