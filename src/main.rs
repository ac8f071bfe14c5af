// src/main.rs

// palette-harvest: collect ColorHunt palettes and match images against them.
//
// Subcommands:
//   collect  — page through the feed, write palettes.json and palettes.csv (default)
//   match    — extract an image's dominant colors, list the nearest palettes

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use palette_harvest::app;
use palette_harvest::config::Config;
use palette_harvest::{Collector, HttpFeed};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "palette-harvest",
    about = "Collect ColorHunt palettes and match images against them"
)]
struct Cli {
    /// TOML file overriding the built-in settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Fetch palettes from the feed and write them as JSON and CSV
    Collect(CollectArgs),
    /// Find the stored palettes closest to an image's dominant colors
    Match(MatchArgs),
}

#[derive(Args, Default)]
struct CollectArgs {
    /// Number of unique palettes to collect
    #[arg(long)]
    target: Option<usize>,
    /// Feed ordering, e.g. random, new, popular
    #[arg(long)]
    sort: Option<String>,
    /// Tag filter
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    json_out: Option<PathBuf>,
    #[arg(long)]
    csv_out: Option<PathBuf>,
    /// Pause between page requests, in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,
    /// Give up after this many pages
    #[arg(long)]
    max_steps: Option<u64>,
}

#[derive(Args)]
struct MatchArgs {
    /// Image to analyse (PNG, JPEG, ...)
    image: PathBuf,
    /// Palette file written by `collect`
    #[arg(long)]
    palettes: Option<PathBuf>,
    /// Number of palettes to list
    #[arg(long)]
    top: Option<usize>,
    /// Number of dominant colors to extract
    #[arg(long)]
    colors: Option<usize>,
    /// Seed for pixel sampling and k-means initialization
    #[arg(long)]
    seed: Option<u64>,
}

impl CollectArgs {
    fn apply(self, config: &mut Config) {
        if let Some(target) = self.target {
            config.collect.target_count = target;
        }
        if let Some(sort) = self.sort {
            config.collect.sort = sort;
        }
        if let Some(tags) = self.tags {
            config.collect.tags = tags;
        }
        if let Some(path) = self.json_out {
            config.output.json_path = path;
        }
        if let Some(path) = self.csv_out {
            config.output.csv_path = path;
        }
        if let Some(pause_ms) = self.pause_ms {
            config.collect.pause_ms = pause_ms;
        }
        if self.max_steps.is_some() {
            config.collect.max_steps = self.max_steps;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    match cli.command.unwrap_or(Cmd::Collect(CollectArgs::default())) {
        Cmd::Collect(args) => {
            args.apply(&mut config);
            cmd_collect(&config)
        }
        Cmd::Match(args) => cmd_match(args, &mut config),
    }
}

fn cmd_collect(config: &Config) -> anyhow::Result<()> {
    let feed = HttpFeed::new(config.feed.clone());
    let mut collector = Collector::new(feed);
    let palettes = app::collect_and_write(&mut collector, config)?;
    println!("Collected {} palettes", palettes.len());
    Ok(())
}

fn cmd_match(args: MatchArgs, config: &mut Config) -> anyhow::Result<()> {
    if let Some(path) = args.palettes {
        config.matching.palettes_path = path;
    }
    if let Some(top) = args.top {
        config.matching.results = top;
    }
    if let Some(colors) = args.colors {
        config.matching.dominant_colors = colors;
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let result = app::match_image(&args.image, &config.matching, &mut rng)?;
    info!("Ranked {} palettes", result.palettes.len());

    let dominant: Vec<String> = result.dominant.iter().map(ToString::to_string).collect();
    println!("Dominant colors: {}", dominant.join(" "));
    for (rank, m) in result.palettes.iter().enumerate() {
        println!(
            "{:>2}. {}  {}  (Lab distance {:.2}, {} likes)",
            rank + 1,
            m.record.id,
            m.record.colors.join(" "),
            m.distance,
            m.record.likes
        );
    }
    Ok(())
}
