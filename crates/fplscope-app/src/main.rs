// fplscope entry point.
//
// Startup sequence:
// 1. Parse arguments and initialize tracing (stderr; stdout carries results)
// 2. Load config, copying defaults on first run
// 3. Load the snapshot and settle the current gameweek
// 4. Classify and print in the requested format

use fplscope_core::classify::{
    Classifier, CohortKind, DifferentialParams, PriceRange, TeamCohortKind,
};
use fplscope_core::config;
use fplscope_core::metrics::{calculate_ppm, transfer_momentum};
use fplscope_core::model::{Player, PositionFilter, Team};
use fplscope_core::providers::{GameweekContext, SeasonClock};
use fplscope_core::snapshot::Snapshot;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Rank fantasy football players and teams into scouting cohorts.
#[derive(Debug, clap::Parser)]
#[command(name = "fplscope", version)]
struct Args {
    /// directory holding config/, defaults/ and the snapshot files
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// position filter: all, GKP, DEF, MID or FWD
    #[arg(short, long, default_value = "all", value_parser = parse_position)]
    position: PositionFilter,

    /// classify as of this gameweek instead of the snapshot's current one
    #[arg(short, long)]
    gameweek: Option<u32>,

    /// output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// only print this cohort (e.g. rising-stars)
    #[arg(short, long, value_parser = parse_cohort, conflicts_with = "differentials")]
    cohort: Option<CohortKind>,

    /// run the differentials filter instead of the fixed cohorts
    #[arg(short, long)]
    differentials: bool,

    /// differentials ownership threshold (1-10), overrides the config
    #[arg(long, requires = "differentials")]
    ownership: Option<u8>,

    /// differentials price band: all, budget, mid or premium
    #[arg(long, requires = "differentials", value_parser = parse_price)]
    price: Option<PriceRange>,
}

fn parse_position(s: &str) -> Result<PositionFilter, String> {
    PositionFilter::parse(s).ok_or_else(|| format!("unknown position `{s}`"))
}

fn parse_cohort(s: &str) -> Result<CohortKind, String> {
    CohortKind::from_slug(s).map_err(|e| e.to_string())
}

fn parse_price(s: &str) -> Result<PriceRange, String> {
    PriceRange::from_label(s).ok_or_else(|| format!("unknown price band `{s}`"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing()?;
    debug!("args: {args:?}");

    let config = config::load_config(&args.base_dir).context("failed to load configuration")?;
    let (bootstrap_path, fixtures_path) = config.data_paths.resolve(&args.base_dir);
    let snapshot = Snapshot::load(&bootstrap_path, &fixtures_path)
        .context("failed to load snapshot")?;

    let clock = match args.gameweek {
        Some(gw) => SeasonClock::fixed(gw),
        None => snapshot.season_clock(),
    };
    let current_gw = clock.current_gw();
    info!("Classifying gameweek {}, position {}", current_gw, args.position);

    let calendar = snapshot.fixture_calendar(current_gw);
    let classifier = Classifier::new(&calendar, &clock, config.classifier);

    let mut output = Output {
        gameweek: current_gw,
        position: args.position.label(),
        cohorts: Vec::new(),
        teams: Vec::new(),
    };

    if args.differentials {
        let params = differential_params(&args, config.differentials)?;
        let picks =
            classifier.filter_differentials(&snapshot.players, current_gw, &params, args.position);
        let title = format!(
            "Differentials (<{}% owned, {} price)",
            params.ownership_threshold(),
            params.price_range()
        );
        output
            .cohorts
            .push(PlayerSection::new("differentials", title, &picks, &snapshot, &classifier));
    } else if let Some(kind) = args.cohort {
        let players =
            classifier.classify_cohort(&snapshot.players, current_gw, args.position, kind);
        output.cohorts.push(PlayerSection::new(
            kind.slug(),
            kind.title().to_string(),
            &players,
            &snapshot,
            &classifier,
        ));
    } else {
        let report = classifier.classify_players(&snapshot.players, current_gw, args.position);
        for cohort in &report.cohorts {
            output.cohorts.push(PlayerSection::new(
                cohort.kind.slug(),
                cohort.kind.title().to_string(),
                &cohort.players,
                &snapshot,
                &classifier,
            ));
        }
        let teams = classifier.classify_teams(&snapshot.teams);
        for kind in TeamCohortKind::ALL {
            output
                .teams
                .push(TeamSection::new(kind, teams.get(kind), &classifier));
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => write_table(&mut out, &output)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &output).context("failed to write JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&mut out, &output)?,
    }
    out.flush()?;
    Ok(())
}

fn differential_params(args: &Args, base: DifferentialParams) -> anyhow::Result<DifferentialParams> {
    let mut params = base;
    if let Some(threshold) = args.ownership {
        params = params
            .with_ownership_threshold(threshold)
            .context("invalid --ownership")?;
    }
    if let Some(range) = args.price {
        params = params.with_price_range(range);
    }
    Ok(params)
}

// ---------------------------------------------------------------------------
// Output model
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct Output {
    gameweek: u32,
    position: &'static str,
    cohorts: Vec<PlayerSection>,
    teams: Vec<TeamSection>,
}

#[derive(Debug, Serialize)]
struct PlayerSection {
    slug: &'static str,
    title: String,
    players: Vec<PlayerRow>,
}

#[derive(Debug, Serialize)]
struct PlayerRow {
    rank: usize,
    id: u32,
    name: String,
    team: String,
    position: &'static str,
    price: f64,
    total_points: i32,
    form: f64,
    ownership: f64,
    ppm: f64,
    momentum: Option<i64>,
    fixture_difficulty: f64,
}

impl PlayerSection {
    fn new(
        slug: &'static str,
        title: String,
        players: &[&Player],
        snapshot: &Snapshot,
        classifier: &Classifier<'_>,
    ) -> Self {
        let players = players
            .iter()
            .enumerate()
            .map(|(i, p)| PlayerRow {
                rank: i + 1,
                id: p.id,
                name: p.web_name.clone(),
                team: snapshot
                    .team(p.team)
                    .map(|t| t.short_name.clone())
                    .unwrap_or_default(),
                position: p.position.label(),
                price: p.price(),
                total_points: p.total_points,
                form: p.form,
                ownership: p.ownership(),
                ppm: calculate_ppm(p),
                momentum: transfer_momentum(p),
                fixture_difficulty: classifier.team_difficulty(p.team),
            })
            .collect();
        PlayerSection {
            slug,
            title,
            players,
        }
    }
}

#[derive(Debug, Serialize)]
struct TeamSection {
    slug: &'static str,
    title: &'static str,
    teams: Vec<TeamRow>,
}

#[derive(Debug, Serialize)]
struct TeamRow {
    rank: usize,
    id: u32,
    name: String,
    short_name: String,
    fixture_difficulty: f64,
    attack: u32,
    defence: u32,
}

impl TeamSection {
    fn new(kind: TeamCohortKind, teams: &[&Team], classifier: &Classifier<'_>) -> Self {
        let teams = teams
            .iter()
            .enumerate()
            .map(|(i, t)| TeamRow {
                rank: i + 1,
                id: t.id,
                name: t.name.clone(),
                short_name: t.short_name.clone(),
                fixture_difficulty: classifier.team_difficulty(t.id),
                attack: t.attack_strength(),
                defence: t.defence_strength(),
            })
            .collect();
        TeamSection {
            slug: kind.slug(),
            title: kind.title(),
            teams,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

fn write_table(out: &mut impl Write, output: &Output) -> anyhow::Result<()> {
    writeln!(out, "Gameweek {} | position: {}", output.gameweek, output.position)?;

    for section in &output.cohorts {
        writeln!(out)?;
        writeln!(out, "== {} ({}) ==", section.title, section.players.len())?;
        if section.players.is_empty() {
            writeln!(out, "  no results")?;
            continue;
        }
        writeln!(
            out,
            "{:>3}  {:<20} {:<4} {:<3} {:>6} {:>4} {:>5} {:>6} {:>5} {:>8} {:>4}",
            "#", "Player", "Team", "Pos", "Price", "Pts", "Form", "Own%", "PPM", "Net", "FDR"
        )?;
        for row in &section.players {
            let momentum = row.momentum.map_or_else(|| "-".to_string(), |n| n.to_string());
            writeln!(
                out,
                "{:>3}  {:<20} {:<4} {:<3} {:>6.1} {:>4} {:>5.1} {:>6.1} {:>5.1} {:>8} {:>4.2}",
                row.rank,
                row.name,
                row.team,
                row.position,
                row.price,
                row.total_points,
                row.form,
                row.ownership,
                row.ppm,
                momentum,
                row.fixture_difficulty
            )?;
        }
    }

    for section in &output.teams {
        writeln!(out)?;
        writeln!(out, "== {} ({}) ==", section.title, section.teams.len())?;
        if section.teams.is_empty() {
            writeln!(out, "  no results")?;
            continue;
        }
        writeln!(
            out,
            "{:>3}  {:<20} {:>5} {:>6} {:>7}",
            "#", "Team", "FDR", "Attack", "Defence"
        )?;
        for row in &section.teams {
            writeln!(
                out,
                "{:>3}  {:<20} {:>5.2} {:>6} {:>7}",
                row.rank, row.name, row.fixture_difficulty, row.attack, row.defence
            )?;
        }
    }
    Ok(())
}

/// One CSV line per ranked player; team cohorts are table/JSON only.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    cohort: &'a str,
    rank: usize,
    id: u32,
    name: &'a str,
    team: &'a str,
    position: &'a str,
    price: f64,
    total_points: i32,
    form: f64,
    ownership: f64,
    ppm: f64,
    momentum: Option<i64>,
    fixture_difficulty: f64,
}

fn write_csv(out: &mut impl Write, output: &Output) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for section in &output.cohorts {
        for row in &section.players {
            writer
                .serialize(CsvRow {
                    cohort: section.slug,
                    rank: row.rank,
                    id: row.id,
                    name: &row.name,
                    team: &row.team,
                    position: row.position,
                    price: row.price,
                    total_points: row.total_points,
                    form: row.form,
                    ownership: row.ownership,
                    ppm: row.ppm,
                    momentum: row.momentum,
                    fixture_difficulty: row.fixture_difficulty,
                })
                .context("failed to write CSV row")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Initialize tracing to stderr so stdout stays clean for results.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fplscope=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
