#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Wastelands run in the terminal.
//!
//! The adapter translates line input into commands, pumps the resulting
//! events back into text, and regenerates the next level whenever the world
//! announces a completed one. It owns no game state beyond what it reads
//! through queries.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use wastelands_core::{
    CellCoord, Command, EntityId, Event, GearKind, TileId, WELCOME_BANNER,
};
use wastelands_world::{self as world, query, World, WorldConfig};

/// Launch parameters for a terminal run.
#[derive(Debug, Parser)]
#[command(name = "wastelands", about = "A turn-based grid roguelike")]
struct Args {
    /// Board columns, border included.
    #[arg(long, default_value_t = 10)]
    columns: i32,
    /// Board rows, border included.
    #[arg(long, default_value_t = 8)]
    rows: i32,
    /// Seed for the world's random stream.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .try_init();

    let args = Args::parse();
    let config = match args.seed {
        Some(seed) => WorldConfig {
            seed,
            ..WorldConfig::default()
        },
        None => WorldConfig::default(),
    };
    let mut instance = World::with_config(config);

    println!("{WELCOME_BANNER}");
    println!("Commands: select, move <col> <row>, attack <col> <row>, wait, restart, quit");

    dispatch(
        &mut instance,
        Command::GenerateLevel {
            columns: args.columns,
            rows: args.rows,
        },
        &args,
    );
    render(&instance);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().context("flushing the prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("reading an intent")?;
        if read == 0 {
            break;
        }

        match parse_intent(line.trim()) {
            Intent::Apply(command) => {
                dispatch(&mut instance, command, &args);
                render(&instance);
            }
            Intent::Quit => break,
            Intent::Help => {
                println!(
                    "select, move <col> <row>, attack <col> <row>, wait, restart, quit"
                );
            }
            Intent::Unknown => println!("Unrecognized intent; try 'help'."),
        }
    }

    Ok(())
}

/// One parsed line of player input.
enum Intent {
    Apply(Command),
    Quit,
    Help,
    Unknown,
}

fn parse_intent(line: &str) -> Intent {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("select") => Intent::Apply(Command::SelectOwnCell),
        Some("move") => parse_cell(parts).map_or(Intent::Unknown, |cell| {
            Intent::Apply(Command::ConfirmMove { cell })
        }),
        Some("attack") => parse_cell(parts).map_or(Intent::Unknown, |cell| {
            Intent::Apply(Command::ConfirmAttack { cell })
        }),
        Some("wait") => Intent::Apply(Command::EndTurn),
        Some("restart") => Intent::Apply(Command::Restart),
        Some("quit") | Some("exit") => Intent::Quit,
        Some("help") => Intent::Help,
        _ => Intent::Unknown,
    }
}

fn parse_cell<'line>(mut parts: impl Iterator<Item = &'line str>) -> Option<CellCoord> {
    let column = parts.next()?.parse().ok()?;
    let row = parts.next()?.parse().ok()?;
    Some(CellCoord::new(column, row))
}

/// Applies a command and narrates the resulting events, chaining into the
/// next level whenever the current one completes.
fn dispatch(instance: &mut World, command: Command, args: &Args) {
    let mut events = Vec::new();
    world::apply(instance, command, &mut events);

    while let Some(next) = narrate(&events, args) {
        events.clear();
        world::apply(instance, next, &mut events);
    }
}

/// Prints the human-facing account of an event batch; returns a follow-up
/// command when the batch demands one.
fn narrate(events: &[Event], args: &Args) -> Option<Command> {
    let mut follow_up = None;
    for event in events {
        match event {
            Event::LevelGenerated { level, .. } => {
                println!("-- Land {level} --");
            }
            Event::GenerateRejected { reason, .. } => println!("Cannot generate: {reason}"),
            Event::MoveOptionsComputed { options } => {
                let moves: Vec<String> = options
                    .moves()
                    .iter()
                    .map(|cell| format!("({},{})", cell.column(), cell.row()))
                    .collect();
                let attacks: Vec<String> = options
                    .attacks()
                    .iter()
                    .map(|cell| format!("({},{})", cell.column(), cell.row()))
                    .collect();
                println!("Moves: {} | Attacks: {}", moves.join(" "), attacks.join(" "));
            }
            Event::FoodEaten { nutrition, .. } => println!("You eat. (+{nutrition})"),
            Event::GearCollected { gear, .. } => match gear {
                GearKind::Boots => println!("Boots! Diagonals and vaults unlocked."),
                GearKind::Helmet => println!("A helmet. Sturdier already."),
            },
            Event::EnemyStruck { .. } => println!("An enemy strikes you!"),
            Event::WallCrumbled { .. } => println!("The wall crumbles."),
            Event::EnemyDefeated { .. } => println!("The enemy falls."),
            Event::DropSpawned { .. } => println!("Something drops to the ground."),
            Event::LevelCompleted { level } => {
                println!("You slip through the exit of land {level}.");
                follow_up = Some(Command::GenerateLevel {
                    columns: args.columns,
                    rows: args.rows,
                });
            }
            Event::GameOver { levels_survived } => {
                println!("Another stranger lost in the Wastelands...");
                println!("You survived {levels_survived} lands. 'restart' to try again.");
            }
            Event::CueRequested { cue } => log::debug!("cue requested: {}", cue.name()),
            Event::PlayerMoved { .. }
            | Event::TileChanged { .. }
            | Event::CellDamaged { .. }
            | Event::HungerChanged { .. }
            | Event::EnemyMoved { .. }
            | Event::TurnEnded { .. } => {}
        }
    }
    follow_up
}

/// Draws the board, highest row first so the origin sits bottom-left.
fn render(instance: &World) {
    let (columns, rows) = query::dimensions(instance);
    if columns == 0 {
        return;
    }

    let player = query::player(instance);
    let enemies: HashSet<EntityId> = query::enemies(instance)
        .into_iter()
        .map(|enemy| enemy.id)
        .collect();
    let view = query::board_view(instance);

    for row in (0..rows).rev() {
        let mut line = String::with_capacity(columns as usize);
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            line.push(glyph(instance, view.occupant(cell), cell, &player.cell, &enemies));
        }
        println!("{line}");
    }

    let run = query::run(instance);
    println!(
        "hunger {:.0}/{:.0} | land {} | turn {}",
        run.hunger, run.max_hunger, run.level, run.turn
    );
    if player.game_over {
        println!("(game over)");
    }
}

fn glyph(
    instance: &World,
    occupant: Option<EntityId>,
    cell: CellCoord,
    player_cell: &CellCoord,
    enemies: &HashSet<EntityId>,
) -> char {
    if cell == *player_cell {
        return '@';
    }
    if let Some(id) = occupant {
        if enemies.contains(&id) {
            return 'e';
        }
    }
    match query::cell_tile(instance, cell) {
        Some(TileId::Boundary(_)) => '#',
        Some(TileId::Exit) => '>',
        Some(TileId::WallStage(stage)) => {
            char::from_digit(u32::from(stage) + 1, 10).unwrap_or('w')
        }
        Some(TileId::Ground(_)) => {
            if occupant.is_some() {
                '*'
            } else {
                '.'
            }
        }
        None => ' ',
    }
}
