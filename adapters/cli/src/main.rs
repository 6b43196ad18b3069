#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that hosts the Pigpen puzzle.

mod layout_transfer;
mod render;
mod script;
mod verify;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pigpen_core::{EntityId, Grid, GridCoordinate, LevelId, Orientation};
use pigpen_levels::{LevelCatalog, Roster};
use pigpen_system_interaction::Session;
use pigpen_system_placement::PlacementValidator;
use pigpen_world::{query, GameState};
use tracing_subscriber::EnvFilter;

use crate::{
    layout_transfer::LayoutSnapshot,
    render::{describe_event, describe_outcome, render_board},
    script::Gesture,
};

#[derive(Debug, Parser)]
#[command(name = "pigpen", version, about = "Place the houses so every pig is sheltered")]
struct Cli {
    /// TOML level catalog used instead of the built-in levels.
    #[arg(long, global = true, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// Log debug records from the game systems.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print a level's board: `#` blocked, `P` pig, `.` free.
    Board {
        /// Level to print; defaults to the first level.
        #[arg(long)]
        level: Option<u32>,
    },
    /// Check whether a single house fits at an anchor.
    Check {
        /// House to place.
        #[arg(long)]
        entity: String,
        /// Anchor row.
        #[arg(long, allow_negative_numbers = true)]
        row: i32,
        /// Anchor column.
        #[arg(long, allow_negative_numbers = true)]
        col: i32,
        /// Clockwise rotation in degrees: 0, 90, 180 or 270.
        #[arg(long, default_value = "0", value_parser = parse_orientation)]
        orientation: Orientation,
        /// Level whose pigs block the placement; defaults to the first level.
        #[arg(long)]
        level: Option<u32>,
    },
    /// Replay a gesture script and print the resulting layout code.
    Play {
        /// Script with one `drop <house> <x> <z>`, `rotate <house>` or `advance` per line.
        script: PathBuf,
        /// Level to start on; defaults to the first level.
        #[arg(long)]
        level: Option<u32>,
    },
    /// Check whether a layout code solves its level.
    Verify {
        /// Code printed by `play`.
        code: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let roster = Roster::standard();
    let catalog = load_catalog(cli.levels.as_deref(), &roster)?;

    match cli.command {
        CliCommand::Board { level } => board(&catalog, &roster, level),
        CliCommand::Check {
            entity,
            row,
            col,
            orientation,
            level,
        } => check(
            &catalog,
            &roster,
            &EntityId::new(entity),
            GridCoordinate::new(row, col),
            orientation,
            level,
        ),
        CliCommand::Play { script, level } => play(catalog, roster, &script, level),
        CliCommand::Verify { code } => verify_code(&catalog, &roster, &code),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_catalog(path: Option<&Path>, roster: &Roster) -> Result<LevelCatalog> {
    match path {
        Some(path) => LevelCatalog::load(path, roster)
            .with_context(|| format!("failed to load level catalog {}", path.display())),
        None => Ok(LevelCatalog::builtin()),
    }
}

fn resolve_level(catalog: &LevelCatalog, level: Option<u32>) -> Result<LevelId> {
    match level {
        Some(index) => Ok(LevelId::new(index)),
        None => catalog.first().context("level catalog is empty"),
    }
}

fn parse_orientation(value: &str) -> Result<Orientation, String> {
    value
        .parse::<u16>()
        .ok()
        .and_then(Orientation::from_degrees)
        .ok_or_else(|| format!("'{value}' is not one of 0, 90, 180 or 270"))
}

fn board(catalog: &LevelCatalog, roster: &Roster, level: Option<u32>) -> Result<ExitCode> {
    let level = catalog.level(resolve_level(catalog, level)?)?;
    println!("level {}", level.id());
    println!("{}", render_board(&Grid::standard(), level, roster, &[]));
    Ok(ExitCode::SUCCESS)
}

fn check(
    catalog: &LevelCatalog,
    roster: &Roster,
    entity: &EntityId,
    anchor: GridCoordinate,
    orientation: Orientation,
    level: Option<u32>,
) -> Result<ExitCode> {
    let level = catalog.level(resolve_level(catalog, level)?)?;
    let template = roster
        .get(entity)
        .with_context(|| format!("unknown house '{entity}'"))?;
    let grid = Grid::standard();

    match PlacementValidator::new(&grid, level).check(template.shape(), orientation, anchor) {
        Ok(()) => {
            println!("{entity} fits at {anchor} facing {orientation}");
            Ok(ExitCode::SUCCESS)
        }
        Err(reason) => {
            println!("{entity} does not fit at {anchor} facing {orientation}: {reason}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn play(
    catalog: LevelCatalog,
    roster: Roster,
    path: &Path,
    level: Option<u32>,
) -> Result<ExitCode> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let gestures = script::parse(&source)
        .with_context(|| format!("failed to parse script {}", path.display()))?;

    let start = resolve_level(&catalog, level)?;
    tracing::debug!(gestures = gestures.len(), level = %start, "replaying script");
    let state = GameState::at_level(catalog, roster, start)?;
    let mut session = Session::new(state);
    let mut log = Vec::new();

    for gesture in gestures {
        let events = match gesture {
            Gesture::Drop { entity, position } => {
                let report = session.on_drop(entity.clone(), position)?;
                if let Some(outcome) = &report.outcome {
                    println!("drop {entity}: {}", describe_outcome(outcome));
                }
                report.events
            }
            Gesture::Rotate { entity } => {
                println!("rotate {entity}");
                session.on_rotate(entity)?
            }
            Gesture::Advance => {
                println!("advance");
                session
                    .on_level_advance_requested()
                    .context("no level follows the completed one")?
            }
        };
        for event in &events {
            println!("  {}", describe_event(event));
        }
        log.extend(events);
    }

    let state = session.state();
    let layout = LayoutSnapshot::capture(query::level_id(state), &log);
    println!();
    println!("level {}", layout.level);
    println!(
        "{}",
        render_board(query::grid(state), query::level(state), query::roster(state), &layout.houses)
    );
    let progress = query::progress(state);
    if query::is_completed(state) {
        println!("completed");
    } else {
        let missing: Vec<&str> = progress.missing().map(EntityId::as_str).collect();
        println!("in progress, unsheltered: {}", missing.join(", "));
    }
    println!("{}", layout.encode());
    Ok(ExitCode::SUCCESS)
}

fn verify_code(catalog: &LevelCatalog, roster: &Roster, code: &str) -> Result<ExitCode> {
    let layout = LayoutSnapshot::decode(code).context("invalid layout code")?;
    let verdict = verify::verify(&layout, catalog, roster)?;
    let level = catalog.level(verdict.level)?;

    println!("level {}", verdict.level);
    println!(
        "{}",
        render_board(&Grid::standard(), level, roster, &layout.houses)
    );
    for entity in &verdict.unknown {
        println!("unknown house '{entity}'");
    }
    for (entity, reason) in &verdict.rejected {
        println!("{entity} does not fit: {reason}");
    }
    for entity in verdict.progress.missing() {
        println!("{entity} is not on its target");
    }

    if verdict.is_solved() {
        println!("solved");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("not solved");
        Ok(ExitCode::FAILURE)
    }
}
