//! Gleaner command-line front end.
//!
//! An interactive menu drives the two pipeline phases: discovering offer
//! URLs from the sites' listing pages, and scraping offers from the saved
//! URL lists into SQLite. Ctrl-C cancels running scrapers cooperatively.

use anyhow::Context;
use clap::Parser;
use gleaner_browser::{BrowserEngine, EngineConfig, FingerprintConfig};
use gleaner_core::AppConfig;
use gleaner_db::{offers, Database};
use gleaner_discovery::{collect_offer_links, load_urls, save_urls};
use gleaner_scraper::{
    run_scrapers, sites, OfferScraper, RunOptions, ScheduleMode, Scraper, SiteConfig, StdinGate,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Gleaner: harvest job offers from anti-automation-protected job boards.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "Harvest job offers into SQLite", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Directory holding the URL list files (overrides config)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Run the browser headless (overrides config)
    #[arg(long, value_name = "BOOL")]
    headless: Option<bool>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path).context("load configuration")?,
        None => AppConfig::load().context("load configuration")?,
    };
    config.apply_env();
    if let Some(db) = cli.db {
        config.general.db_path = db;
    }
    if let Some(data_dir) = cli.data_dir {
        config.general.data_dir = data_dir;
    }
    if let Some(headless) = cli.headless {
        config.browser.headless = headless;
    }
    config.validate().context("validate configuration")?;

    if let Some(parent) = config.general.db_path.parent() {
        std::fs::create_dir_all(parent).context("create database directory")?;
    }
    let db = Database::new(&config.general.db_path)
        .await
        .context("open database")?;
    db.run_migrations().await.context("run migrations")?;

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling running scrapers");
                token.cancel();
            }
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if token.is_cancelled() {
            break;
        }

        println!();
        println!("1 - discover offer urls");
        println!("2 - scrape offers from url lists");
        println!("3 - exit");

        let Some(choice) = lines.next_line().await? else {
            break;
        };

        match choice.trim() {
            "1" => {
                if let Err(e) = discover(&config).await {
                    tracing::error!("url discovery failed: {e:#}");
                }
            }
            "2" => {
                let concurrent = ask_yes_no(&mut lines, "Scrape concurrently? [y/N]").await?;
                if let Err(e) = scrape(&config, &db, &token, concurrent).await {
                    tracing::error!("scraping failed: {e:#}");
                }
            }
            "3" | "exit" | "q" => break,
            other => println!("unknown choice: {other}"),
        }
    }

    db.close().await;
    Ok(())
}

fn setup_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "gleaner=info,warn",
        1 => "gleaner=debug,info",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn ask_yes_no(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> anyhow::Result<bool> {
    println!("{prompt}");
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn engine_config(config: &AppConfig) -> EngineConfig {
    let fingerprint = match &config.browser.user_agent {
        Some(user_agent) => FingerprintConfig::fixed(
            user_agent,
            config.browser.viewport_width,
            config.browser.viewport_height,
        ),
        None => FingerprintConfig::randomized(),
    };

    EngineConfig {
        headless: config.browser.headless,
        executable: config.browser.executable.clone(),
        user_data_dir: config.browser.user_data_dir.clone(),
        fingerprint,
        settle_min_ms: config.scraping.settle_min_ms,
        settle_max_ms: config.scraping.settle_max_ms,
    }
}

/// Render every site's listing page and save the harvested offer links as
/// URL list files. The sites are independent, so they run concurrently,
/// each with its own browser session.
async fn discover(config: &AppConfig) -> anyhow::Result<()> {
    let mut tasks = JoinSet::new();

    for target in gleaner_discovery::targets() {
        let engine_cfg = engine_config(config);
        let path = config.general.data_dir.join(&target.url_file);

        tasks.spawn(async move {
            let source = target.source.clone();
            let run = async {
                let engine = BrowserEngine::launch(engine_cfg).await?;
                let links = collect_offer_links(&engine, &target).await?;
                save_urls(&path, &links)?;
                engine.close().await;
                anyhow::Ok(links.len())
            };
            (source, run.await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((source, Ok(count))) => {
                tracing::info!(source = %source, count, "url list saved");
            }
            Ok((source, Err(e))) => {
                tracing::error!(source = %source, "url discovery failed: {e:#}");
            }
            Err(e) => tracing::error!("discovery task aborted: {e}"),
        }
    }

    Ok(())
}

/// Run the scrapers against the saved URL lists and persist every offer the
/// unified stream delivers, deduplicating by canonical URL.
async fn scrape(
    config: &AppConfig,
    db: &Database,
    token: &CancellationToken,
    concurrent: bool,
) -> anyhow::Result<()> {
    let pace_min = Duration::from_secs(config.scraping.pace_min_secs);
    let pace_max = Duration::from_secs(config.scraping.pace_max_secs);

    type SiteBuilder = fn(Vec<String>, Duration, Duration) -> SiteConfig;
    let builders: [(&str, SiteBuilder); 3] = [
        ("pracuj_urls.txt", sites::pracuj),
        ("nofluff_urls.txt", sites::nofluff),
        ("justjoin_urls.txt", sites::justjoin),
    ];

    let gate = Arc::new(StdinGate);
    let mut scrapers: Vec<Arc<dyn Scraper>> = Vec::new();

    for (url_file, build) in builders {
        let path = config.general.data_dir.join(url_file);
        let urls = match load_urls(&path) {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping site, url list unavailable: {e}");
                continue;
            }
        };
        if urls.is_empty() {
            tracing::info!(path = %path.display(), "skipping site, url list is empty");
            continue;
        }

        let site = build(urls, pace_min, pace_max);
        let engine = BrowserEngine::launch(engine_config(config))
            .await
            .with_context(|| format!("launch browser for {}", site.source))?;
        let scraper = OfferScraper::new(site, Arc::new(engine), gate.clone())?;
        scrapers.push(Arc::new(scraper));
    }

    if scrapers.is_empty() {
        tracing::warn!("nothing to scrape; run url discovery first");
        return Ok(());
    }

    let options = RunOptions {
        mode: if concurrent {
            ScheduleMode::Concurrent
        } else {
            ScheduleMode::Sequential
        },
        stagger: Duration::from_secs(config.scraping.stagger_secs),
        channel_capacity: config.scraping.channel_capacity,
    };

    let mut rx = run_scrapers(token.child_token(), scrapers, options);

    let mut inserted = 0u64;
    let mut duplicates = 0u64;
    let mut failures = 0u64;
    while let Some(offer) = rx.recv().await {
        match offers::insert_offer(db.pool(), &offer).await {
            Ok(true) => inserted += 1,
            Ok(false) => duplicates += 1,
            Err(e) => {
                failures += 1;
                tracing::error!(url = %offer.url, "failed to store offer: {e}");
            }
        }
    }

    tracing::info!(inserted, duplicates, failures, "scraping completed");
    Ok(())
}
