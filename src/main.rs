use anyhow::{anyhow, Result};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use crossterm::style::Stylize;
use std::path::PathBuf;
use tracing::{debug, warn};

use entry_archive::config::Config;
use entry_archive::data::exporter::DataExporter;
use entry_archive::data::paginator::clamp_page_number;
use entry_archive::data::predicates::DateRange;
use entry_archive::data::summary::{monthly_frequency, top_by_score};
use entry_archive::utils::logging::init_tracing;
use entry_archive::{FilterCriteria, Session, SortKey};

mod table_display;

use table_display::{display_page, display_summary, status_line, DisplayOptions};

const TOP_ENTRIES: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "entry-archive",
    version,
    about = "Search, filter, sort and page through an exported entry archive"
)]
struct Cli {
    /// Exported archive with columns skor, baslik, entiri, silinmis, tarih
    #[arg(required_unless_present = "generate_config")]
    file: Option<PathBuf>,

    /// Case-insensitive text to look for in titles and bodies
    #[arg(short, long)]
    search: Option<String>,

    /// Earliest date or timestamp to include
    #[arg(long, requires = "to", value_name = "DATE")]
    from: Option<String>,

    /// Latest date or timestamp to include (a bare date covers the whole day)
    #[arg(long, requires = "from", value_name = "DATE")]
    to: Option<String>,

    #[arg(long, requires = "max_score", allow_negative_numbers = true)]
    min_score: Option<i64>,

    #[arg(long, requires = "min_score", allow_negative_numbers = true)]
    max_score: Option<i64>,

    /// Leave deleted entries out
    #[arg(long)]
    hide_deleted: bool,

    /// Sort column: timestamp, score or title
    #[arg(long, value_name = "KEY")]
    sort: Option<SortKey>,

    /// Oldest / lowest first
    #[arg(long, conflicts_with = "desc")]
    asc: bool,

    /// Newest / highest first
    #[arg(long)]
    desc: bool,

    /// Page to show (clamped into range)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    page_size: Option<usize>,

    /// Print the matching entries as JSON instead of a table
    #[arg(long, conflicts_with = "summary")]
    json: bool,

    /// Print archive bounds, entries per month and the top entries by score
    #[arg(long)]
    summary: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a commented config file (to --config or the default location) and exit
    #[arg(long)]
    generate_config: bool,
}

fn generate_config(cli: &Cli) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    Config::write_default_with_comments(&path)?;
    println!(
        "{}",
        format!("Config file written to {}", path.display()).green()
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load().unwrap_or_else(|e| {
            warn!("Falling back to default config: {:#}", e);
            Config::default()
        })),
    }
}

fn build_criteria(cli: &Cli, config: &Config) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new()
        .with_show_deleted(config.behavior.show_deleted && !cli.hide_deleted);

    if let Some(term) = &cli.search {
        criteria = criteria.with_search_term(term.as_str());
    }

    if let (Some(from), Some(to)) = (&cli.from, &cli.to) {
        let range = DateRange::parse(from, to)
            .ok_or_else(|| anyhow!("Invalid date range '{}' .. '{}'", from, to))?;
        criteria = criteria.with_date_range(range);
    }

    if let (Some(min), Some(max)) = (cli.min_score, cli.max_score) {
        criteria = criteria.with_score_range(min, max);
    }

    Ok(criteria)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if cli.generate_config {
        return generate_config(&cli);
    }
    let file = cli
        .file
        .as_deref()
        .ok_or_else(|| anyhow!("No archive file given"))?;

    let config = load_config(&cli)?;
    let criteria = build_criteria(&cli, &config)?;
    let sort_key = cli.sort.unwrap_or(config.behavior.sort_key);
    let ascending = if cli.asc {
        true
    } else if cli.desc {
        false
    } else {
        config.behavior.ascending
    };

    let mut session = Session::new(config.behavior.cache_capacity);
    session.load_path(file)?;

    let rejected = session.rejected().len();
    if rejected > 0 {
        for rejection in session.rejected() {
            debug!("Rejected {}", rejection);
        }
        eprintln!(
            "{}",
            format!("{} row(s) could not be read and were skipped", rejected).yellow()
        );
    }

    let view = session.view(&criteria, sort_key, ascending);

    if cli.json {
        println!("{}", DataExporter::to_json(view.iter())?);
        return Ok(());
    }

    if cli.summary {
        let summary = session.summary();
        let monthly = monthly_frequency(view.iter());
        let top = top_by_score(view.iter(), TOP_ENTRIES);
        display_summary(&summary, &monthly, &top);
        return Ok(());
    }

    let page_size = cli.page_size.unwrap_or(config.display.page_size);
    let page_number = clamp_page_number(view.len(), page_size, cli.page);
    if page_number != cli.page {
        debug!("Page {} out of range, showing {}", cli.page, page_number);
    }

    let page = view.paginate(page_size, page_number)?;
    display_page(
        &page,
        &DisplayOptions {
            show_row_numbers: config.display.show_row_numbers,
            body_preview_chars: config.display.body_preview_chars,
        },
    );
    println!("\n{}", status_line(&page, rejected).green());

    Ok(())
}
