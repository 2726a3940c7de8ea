use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;

use nyaa_sort::sort::{DryRunFileSystem, FileSystem, LocalFileSystem, SortContext, VideoClassifier, Verbosity, reconcile};
use nyaa_sort::{path_to_string_relative, print_bold, print_warning};

use crate::NyaaSortArgs;
use crate::config::Config;
use crate::logging;

#[derive(Debug)]
pub struct AnimeSort {
    unsorted: PathBuf,
    sorted: PathBuf,
    backup: Option<PathBuf>,
    config: Config,
}

impl AnimeSort {
    pub fn new(args: NyaaSortArgs) -> anyhow::Result<Self> {
        let config = Config::from_args(args);
        logging::init(config.verbosity);

        let unsorted = nyaa_sort::resolve_input_dir(config.path.as_deref()).context("Invalid input directory")?;
        let sorted = match config.output.as_deref() {
            Some(path) => nyaa_sort::resolve_input_dir(Some(path)).context("Invalid output directory")?,
            None => unsorted.clone(),
        };
        let backup = config
            .backup
            .as_deref()
            .map(|path| nyaa_sort::resolve_input_dir(Some(path)).context("Invalid backup directory"))
            .transpose()?;

        if config.verbosity == Verbosity::Debug {
            eprintln!("Config: {config:#?}");
            eprintln!("Unsorted: {}", unsorted.display());
            eprintln!("Sorted: {}", sorted.display());
        }

        Ok(Self {
            unsorted,
            sorted,
            backup,
            config,
        })
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let classifier = VideoClassifier::new(&self.config.extensions);
        let fs: &dyn FileSystem = if self.config.dryrun {
            print_bold!("Dry run, nothing will be changed:");
            &DryRunFileSystem
        } else {
            &LocalFileSystem
        };
        let context = SortContext::new(fs, &classifier)
            .with_backup(self.backup.clone())
            .with_overwrite(self.config.overwrite)
            .with_verbosity(self.config.verbosity);

        let result = reconcile(&self.unsorted, &self.sorted, &context).with_context(|| {
            format!(
                "Sorting stopped in {}, fix the folder name and run again",
                path_to_string_relative(&self.sorted)
            )
        })?;

        if self.config.verbosity == Verbosity::Debug {
            for folder in result.index.iter_sorted() {
                eprintln!("  {} -> {}", folder.series_name(), folder.folder_name().cyan());
            }
        }

        if self.config.verbosity != Verbosity::Quiet && (!result.stats.is_noop() || self.config.verbosity.is_informational()) {
            result.stats.print_summary();
        }

        if result.anomalies_detected {
            print_warning!("Some files or folders need attention, see the messages above");
            if result.needs_attention() && std::io::stdin().is_terminal() {
                print!("{}", "Press enter to exit".magenta());
                std::io::stdout().flush()?;
                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;
            }
        }

        Ok(())
    }
}
