use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use marktodo::config::{self, MarkTodoConfig};
use marktodo::core::schedule;
use marktodo::core::transition::Command;
use marktodo::core::urgency::available_actions;
use marktodo::markdown::edit;
use marktodo::markdown::list::{self, ListEdit};
use marktodo::markdown::outline::{self, OutlineEntry};
use marktodo::markdown::parser;

#[derive(Debug, Parser)]
#[command(name = "marktodo", version, about = "Find and update TODO markers in markdown files")]
struct Cli {
    /// Log at debug level to the journal
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Outline the open items of files or directories
    List {
        /// Files or directories (defaults to the current directory)
        paths: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Apply a transition: done, in-progress, blocked, postpone or promote
    Mark {
        command: Command,
        /// File to edit in place; stdin is transformed to stdout when absent
        file: Option<PathBuf>,
        /// Only rewrite this line (1-based)
        #[arg(long, requires = "file")]
        line: Option<usize>,
    },
    /// Show the quick fixes available for an item
    Actions {
        file: PathBuf,
        #[arg(long)]
        line: usize,
    },
    /// Print the week code for today or a given date
    Week {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// Print the regular expression used to find items
    Pattern,
    /// Show what pressing Enter at the end of a list line would insert
    NextItem { line: String },
    /// Show the active configuration
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Serialize)]
struct FileOutline {
    path: PathBuf,
    entries: Vec<OutlineEntry>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = MarkTodoConfig::load(&config_path)?;

    init_logging(cli.debug || config.debug_logging);

    let result = run(cli.command, &config, &config_path);
    if let Err(e) = &result {
        log::error!("{}", e);
    }
    result
}

/// Log to the systemd user journal (`journalctl --user -t marktodo -f`).
/// Our own records pass at info (debug when enabled), everything else at warn.
fn init_logging(debug: bool) {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("marktodo") {
                let max = if marktodo::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    marktodo::set_debug_logging(debug);

    // No journal (containers, non-systemd hosts): run without logging.
    let Ok(journal) = systemd_journal_logger::JournalLog::new() else {
        return;
    };
    let journal = journal.with_syslog_identifier("marktodo".to_string());
    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

fn run(
    command: Commands,
    config: &MarkTodoConfig,
    config_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List { paths, json } => {
            let paths = if paths.is_empty() { vec![PathBuf::from(".")] } else { paths };
            let outlines = collect_outlines(&paths, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outlines)?);
            } else {
                for file in &outlines {
                    for entry in &file.entries {
                        println!(
                            "{}:{}:{} [{}] {} {} ({})",
                            file.path.display(),
                            entry.line,
                            entry.column,
                            entry.kind,
                            entry.marker,
                            entry.name,
                            entry.detail
                        );
                    }
                }
            }
        }
        Commands::Mark { command, file, line } => match file {
            Some(file) => {
                let content = std::fs::read_to_string(&file)?;
                let updated = match line {
                    Some(line) => edit::rewrite_line(&content, line, command.transition())?,
                    None => command.apply(&content),
                };
                if updated != content {
                    std::fs::write(&file, &updated)?;
                    log::info!("{}: {}", file.display(), command.as_keyword());
                } else {
                    log::debug!("{}: nothing to change", file.display());
                }
            }
            None => {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                print!("{}", command.apply(&input));
            }
        },
        Commands::Actions { file, line } => {
            let content = std::fs::read_to_string(&file)?;
            let text = edit::line_at(&content, line)?;
            match parser::parse_line(text) {
                Some(item) => {
                    println!("{}", item.hover_text_at(schedule::now()));
                    for action in available_actions(&item) {
                        println!("  {:<18} {}", action.title(), action.apply(text));
                    }
                }
                None => println!("no open item on line {}", line),
            }
        }
        Commands::Week { date } => {
            let now = schedule::now();
            let when = date.map_or(now, |d| d.and_time(now.time()));
            println!("{}", schedule::code_from_date(when));
        }
        Commands::Pattern => println!("{}", parser::search_pattern()),
        Commands::NextItem { line } => match list::continue_list(&line) {
            ListEdit::Insert(text) => println!("insert {:?}", text),
            ListEdit::ClearLine => println!("clear line"),
        },
        Commands::Config { init } => {
            if init {
                config.save(config_path)?;
            }
            println!("# {}", config_path.display());
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}

/// Outline every file under `paths`. Directories are walked and filtered by
/// the configured extensions; files named explicitly are always read.
fn collect_outlines(
    paths: &[PathBuf],
    config: &MarkTodoConfig,
) -> Result<Vec<FileOutline>, Box<dyn std::error::Error>> {
    let now = schedule::now();
    let mut outlines = Vec::new();
    for root in paths {
        let files: Vec<PathBuf> = if root.is_dir() {
            WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        log::warn!("skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| config.matches_extension(path))
                .collect()
        } else {
            vec![root.clone()]
        };

        for path in files {
            let text = std::fs::read_to_string(&path)?;
            let entries = outline::outline(&text, now, config.upcoming_days);
            if !entries.is_empty() {
                outlines.push(FileOutline { path, entries });
            }
        }
    }
    log::debug!("listed {} file(s) with open items", outlines.len());
    Ok(outlines)
}
