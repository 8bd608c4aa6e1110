use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use lab_core::core::engine::RenderedSurah;
use lab_core::core::injection::LEVEL_PRESETS;
use lab_core::levels::{LEARNER_PROFILES, READING_LEVELS};
use lab_core::query::{self, ExportFilter};
use lab_core::{LabConfig, LabError, QuranLab, SettingsRequest};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "quran_lab",
    about = "Arabic vocabulary injection over an English Quran translation"
)]
struct Cli {
    /// JSON file holding the learner's exposure counts
    #[arg(
        long,
        env = "QURAN_LAB_FAMILIARITY",
        default_value = lab_core::config::DEFAULT_FAMILIARITY_PATH
    )]
    familiarity: PathBuf,
    /// Word dictionary JSON (defaults to the bundled table)
    #[arg(long, env = "QURAN_LAB_DICTIONARY")]
    dictionary: Option<PathBuf>,
    /// Corpus JSON (defaults to the bundled sample)
    #[arg(long, env = "QURAN_LAB_CORPUS")]
    corpus: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available surahs
    Surahs,
    /// Render a surah with Arabic injected, recording exposures
    Render {
        number: u32,
        #[arg(long)]
        level: Option<i64>,
        #[arg(long = "cluster")]
        clusters: Vec<String>,
        #[arg(long)]
        known_threshold: Option<u64>,
        #[arg(long)]
        whats_left: bool,
        /// Book view layout (JSON only)
        #[arg(long)]
        book: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show a dictionary word with its root family
    Word { key: String },
    Search { query: String },
    Root { root: String },
    Cluster { key: String },
    Clusters,
    /// Most frequent words first
    Words {
        #[arg(long, default_value_t = 50)]
        top: usize,
    },
    Pos,
    Wazn,
    Roots {
        #[arg(long, default_value_t = 80)]
        limit: usize,
    },
    Heatmap,
    Levels,
    Profiles,
    /// Familiarity counts and progress
    Stats,
    MarkKnown { key: String },
    MarkUnknown { key: String },
    /// Delete all familiarity data
    Reset,
    /// Export the dictionary as CSV
    Export {
        #[arg(long)]
        cluster: Option<String>,
        #[arg(long)]
        pos: Option<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    SalahSheet,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> lab_core::Result<()> {
    let config = LabConfig {
        familiarity_path: cli.familiarity,
        dictionary_path: cli.dictionary,
        corpus_path: cli.corpus,
    };
    let lab = QuranLab::from_config(&config)?;
    let dictionary = lab.dictionary();

    match cli.command {
        Command::Surahs => print_json(&lab.surahs()),
        Command::Render {
            number,
            level,
            clusters,
            known_threshold,
            whats_left,
            book,
            json,
        } => {
            let settings = SettingsRequest {
                injection_level: level,
                active_clusters: Some(clusters),
                known_threshold,
                whats_left_mode: Some(whats_left),
            }
            .resolve();
            if book {
                print_json(&lab.book_view(number, &settings, None)?)
            } else {
                let rendered = lab.render(number, &settings, None)?;
                if json {
                    print_json(&rendered)
                } else {
                    print_hybrid(&rendered);
                    Ok(())
                }
            }
        }
        Command::Word { key } => print_json(&lab.word_detail(&key)?),
        Command::Search { query } => print_json(&query::search(dictionary, &query)),
        Command::Root { root } => print_json(&query::root_family(dictionary, &root)),
        Command::Cluster { key } => print_json(&query::cluster_words(dictionary, &key)),
        Command::Clusters => print_json(&dictionary.clusters()),
        Command::Words { top } => print_json(&dictionary.words_by_rank(top)),
        Command::Pos => print_json(&query::pos_groups(dictionary)),
        Command::Wazn => print_json(&query::wazn_groups(dictionary)),
        Command::Roots { limit } => {
            let mut roots = query::roots_summary(dictionary);
            roots.truncate(limit);
            print_json(&roots)
        }
        Command::Heatmap => print_json(&query::frequency_heatmap(dictionary)),
        Command::Levels => print_json(&serde_json::json!({
            "presets": LEVEL_PRESETS,
            "reading_levels": READING_LEVELS,
        })),
        Command::Profiles => print_json(&LEARNER_PROFILES),
        Command::Stats => print_json(&lab.familiarity()),
        Command::MarkKnown { key } => print_json(&lab.mark_known(&key)?),
        Command::MarkUnknown { key } => print_json(&lab.mark_unknown(&key)?),
        Command::Reset => print_json(&lab.reset_familiarity()?),
        Command::Export { cluster, pos, output } => {
            let filter = ExportFilter::new(cluster.as_deref(), pos.as_deref());
            let csv_text = lab.export_csv(&filter)?;
            match output {
                Some(path) => {
                    fs::write(&path, csv_text)?;
                    println!("Exported to '{}'", path.display());
                }
                None => print!("{csv_text}"),
            }
            Ok(())
        }
        Command::SalahSheet => print_json(&lab.salah_sheet()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> lab_core::Result<()> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| LabError::Export(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn print_hybrid(rendered: &RenderedSurah) {
    let surah = &rendered.surah;
    println!("{} {} ({})", surah.number, surah.name_en.as_str().bold(), surah.name_ar);
    if !surah.description.is_empty() {
        println!("{}", surah.description.as_str().dim());
    }
    println!();

    for verse in &rendered.verses {
        let mut line = format!("{:>3}. ", verse.number);
        for word in &verse.words {
            let text = if word.show_arabic {
                format!("{}", word.arabic.as_str().green().bold())
            } else if word.is_known {
                format!("{}", word.english.as_str().dim())
            } else {
                word.english.clone()
            };
            line.push_str(&text);
            line.push(' ');
        }
        println!("{}", line.trim_end());
    }

    let stats = &rendered.stats;
    println!(
        "\nSeen {}/{} words ({}%), known {} ({}%)",
        stats.seen, stats.total_words, stats.pct_seen, stats.known, stats.pct_known
    );
}
