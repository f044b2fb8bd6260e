use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use episodic::{
    CatalogSnapshot, ConfigurationService, DryRunRefresher, GroupingKeyBuilder, InMemoryCatalog,
    NoopReporter, ProgressEvent, ProgressReporter, RefreshMode, RefreshOptions,
    RefreshOrchestrator, SeriesBrowser, Settings, SharedProgressReporter, StaticConfiguration,
    SystemClock,
};

// Emoji with fallback for terminals without Unicode support
static TV: Emoji<'_, '_> = Emoji("📺 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static STOP: Emoji<'_, '_> = Emoji("⏹️  ", "[x] ");
static KEY: Emoji<'_, '_> = Emoji("🔑 ", "[k] ");

/// Inspect and refresh TV series held in a catalog snapshot
#[derive(Parser, Debug)]
#[command(name = "episodic")]
#[command(about = "Inspect and refresh TV series held in a catalog snapshot")]
#[command(version)]
struct Args {
    /// Catalog snapshot (JSON)
    snapshot: PathBuf,

    /// Settings file (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Show specials inside the season they aired in
    #[arg(long)]
    specials_in_season: bool,

    /// Include missing (placeholder) episodes in listings
    #[arg(long)]
    show_missing: bool,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh a series and all of its seasons and episodes (dry run)
    Refresh {
        /// Series id or name
        series: String,

        /// Refresh everything, including long-missing episodes
        #[arg(long)]
        full: bool,

        /// Replace existing metadata instead of merging
        #[arg(long)]
        replace_all: bool,
    },

    /// List every episode of a series in display order
    Episodes {
        /// Series id or name
        series: String,
    },

    /// List the seasons of a series with their episode counts
    Seasons {
        /// Series id or name
        series: String,
    },

    /// Print the grouping key of a series
    Key {
        /// Series id or name
        series: String,
    },
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("█▓░");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { bar }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::RefreshStarting { series_name } => {
                self.bar
                    .set_message(format!("{SEARCH}Refreshing {}", series_name.cyan()));
            }

            ProgressEvent::DescendantsListed {
                seasons, total, ..
            } => {
                self.bar.set_length(total as u64);
                self.bar.set_message(format!(
                    "{} seasons, {} items total",
                    seasons.to_string().cyan(),
                    total.to_string().cyan()
                ));
            }

            ProgressEvent::ItemCompleted {
                kind,
                item_name,
                skipped,
                completed,
                percent,
                ..
            } => {
                self.bar.set_position(completed as u64);
                let label = if skipped {
                    format!("{} (skipped)", item_name).yellow()
                } else {
                    item_name.normal()
                };
                self.bar
                    .set_message(format!("{:>5.1}% {} {}", percent, kind, label));
            }

            ProgressEvent::PostRecursiveRefresh { series_name } => {
                self.bar
                    .set_message(format!("Finalizing {}", series_name.cyan()));
            }

            ProgressEvent::RefreshCompleted { refreshed, skipped } => {
                self.bar.finish_and_clear();
                println!(
                    "\n{SUCCESS}{} {} refreshed, {} skipped",
                    "Refresh complete:".bold().green(),
                    refreshed.to_string().green().bold(),
                    skipped.to_string().yellow(),
                );
            }
        }
    }
}

fn build_catalog(snapshot: CatalogSnapshot, config: &StaticConfiguration) -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new(snapshot);
    catalog.apply_grouping(|series| {
        GroupingKeyBuilder::new(
            config.library_options(series).enable_automatic_series_grouping,
            config.preferred_metadata_language(series),
        )
    });
    catalog
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "episodic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut settings =
        Settings::load(args.settings.as_deref()).context("Failed to load settings")?;
    if args.specials_in_season {
        settings.server.display_specials_within_seasons = true;
    }
    if args.show_missing {
        settings.user.display_missing_episodes = true;
    }
    let config = StaticConfiguration::from(&settings);

    let snapshot = CatalogSnapshot::load(&args.snapshot).context("Failed to load catalog")?;
    let catalog = build_catalog(snapshot, &config);

    let needle = match &args.command {
        Command::Refresh { series, .. }
        | Command::Episodes { series }
        | Command::Seasons { series }
        | Command::Key { series } => series.as_str(),
    };
    let series = catalog
        .find_series(needle)
        .cloned()
        .ok_or_else(|| anyhow!("No series matching '{}' in catalog", needle))?;

    let browser = SeriesBrowser::new(&catalog, &config);

    match args.command {
        Command::Refresh {
            full, replace_all, ..
        } => {
            if !args.quiet {
                println!("\n{}{}\n", TV, series.name.bold().magenta());
            }

            let options = RefreshOptions {
                mode: if full {
                    RefreshMode::Full
                } else {
                    RefreshMode::Incremental
                },
                replace_all_metadata: replace_all,
                is_post_recursive_refresh: false,
            };

            let reporter: SharedProgressReporter = if args.quiet {
                NoopReporter::shared()
            } else {
                std::sync::Arc::new(IndicatifReporter::new())
            };

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let refresher = DryRunRefresher::new();
            let clock = SystemClock;
            let result = RefreshOrchestrator::new(&catalog, &refresher, &clock)
                .refresh_all_metadata(&series, &options, &reporter, &cancel)
                .await;

            match result {
                Ok(_) => {}
                Err(e) if e.is_cancelled() => {
                    println!("\n{STOP}{}", "Refresh cancelled".yellow());
                }
                Err(e) => return Err(e).context("Failed to refresh series"),
            }
        }

        Command::Episodes { .. } => {
            let episodes = browser
                .get_episodes(&series, &settings.user)
                .await
                .context("Failed to list episodes")?;

            for episode in &episodes {
                let season = episode
                    .aired_season_number
                    .map(|n| format!("S{:02}", n))
                    .unwrap_or_else(|| "S??".to_string());
                let number = episode
                    .index_number
                    .map(|n| format!("E{:02}", n))
                    .unwrap_or_else(|| "E??".to_string());
                let name = if episode.is_missing {
                    episode.name.dimmed()
                } else {
                    episode.name.normal()
                };
                println!("{}{} {}", season.cyan(), number.cyan(), name);
            }
        }

        Command::Seasons { .. } => {
            let user = &settings.user;
            let seasons = browser
                .get_seasons(&series, user)
                .await
                .context("Failed to list seasons")?;

            for season in &seasons {
                let episodes = browser
                    .get_season_episodes(&series, season, user)
                    .await
                    .context("Failed to list season episodes")?;
                println!(
                    "{} {}",
                    season.name.bold(),
                    format!("({} episodes)", episodes.len()).dimmed()
                );
            }

            let on_disk = browser
                .recursive_child_count(&series)
                .await
                .context("Failed to count episodes")?;
            println!("\n{} episodes on disk", on_disk.to_string().green());
        }

        Command::Key { .. } => {
            let key = browser
                .presentation_key(&series)
                .await
                .context("Failed to compute grouping key")?;
            println!("{KEY}{}", key);
        }
    }

    Ok(())
}
