mod uci;

use anyhow::{bail, Context, Result};
use chess_agents::{
    AiMoveOutcome, Engine, EngineConfig, Evaluator, GameSession, MobilityMode, MoveSource,
    OpeningBook, RepetitionGuard,
};
use chess_core::{Color, File, GamePosition, Rank, Role, Square};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "chess", about = "Minimax chess engine with an opening book")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a game against the engine
    Play {
        /// Side the human plays
        #[arg(long, value_enum, default_value_t = Side::White)]
        color: Side,

        /// Search depth in plies (overrides the config file)
        #[arg(long)]
        depth: Option<u8>,

        /// Engine configuration as JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the static evaluation of a position (+ = White)
    Eval {
        /// FEN of the position (defaults to the starting position)
        fen: Option<String>,

        /// Flip the piece-square tables for Black
        #[arg(long)]
        mirror: bool,

        /// Count mobility for the side to move only
        #[arg(long)]
        side_to_move_mobility: bool,
    },
    /// Search a position and print the chosen move
    Best {
        /// FEN of the position (defaults to the starting position)
        fen: Option<String>,

        #[arg(long, default_value_t = 3)]
        depth: u8,

        /// Skip the opening book
        #[arg(long)]
        no_book: bool,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Speak a minimal subset of UCI on stdin/stdout
    Uci {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    EngineConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn parse_position(fen: Option<&str>) -> Result<GamePosition> {
    match fen {
        Some(fen) => Ok(GamePosition::from_fen(fen)?),
        None => Ok(GamePosition::new()),
    }
}

fn piece_symbol(role: Role, color: Color) -> char {
    match (role, color) {
        (Role::King, Color::White) => '♔',
        (Role::Queen, Color::White) => '♕',
        (Role::Rook, Color::White) => '♖',
        (Role::Bishop, Color::White) => '♗',
        (Role::Knight, Color::White) => '♘',
        (Role::Pawn, Color::White) => '♙',
        (Role::King, Color::Black) => '♚',
        (Role::Queen, Color::Black) => '♛',
        (Role::Rook, Color::Black) => '♜',
        (Role::Bishop, Color::Black) => '♝',
        (Role::Knight, Color::Black) => '♞',
        (Role::Pawn, Color::Black) => '♟',
    }
}

fn display_board(position: &GamePosition) {
    println!("\n  a b c d e f g h");
    println!("  ---------------");

    for rank in Rank::ALL.into_iter().rev() {
        print!("{} ", rank.char());
        for file in File::ALL {
            match position.piece_at(Square::from_coords(file, rank)) {
                Some(piece) => print!("{} ", piece_symbol(piece.role, piece.color)),
                None => print!(". "),
            }
        }
        println!("| {}", rank.char());
    }

    println!("  ---------------");
    println!("  a b c d e f g h\n");

    println!(
        "{} to move, move {}",
        if position.side_to_move() == Color::White { "White" } else { "Black" },
        position.fullmove_number()
    );
    if position.is_check() && !position.is_checkmate() {
        println!("Check!");
    }
}

fn play(color: Side, config: EngineConfig) -> Result<()> {
    let color = match color {
        Side::White => Color::White,
        Side::Black => Color::Black,
    };
    let mut session = GameSession::new(config);
    if let Some(report) = session.set_player_color(color) {
        println!("Engine plays: {}", report.encoding);
    }

    println!("Enter moves in coordinate notation (e.g. e2e4, e7e8q for promotion)");
    println!("Commands: quit, new, help");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        display_board(session.position());

        if session.is_game_over() {
            println!("Game over: {}", session.result());
            break;
        }

        print!("Your move: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;

        match input.trim() {
            "quit" => break,
            "help" => {
                println!("Enter moves like 'e2e4' or 'e7e8q' (promotion to queen)");
                println!("Commands: quit, new, help");
            }
            "new" => {
                if let Some(report) = session.set_player_color(color) {
                    println!("Engine plays: {}", report.encoding);
                }
                println!("New game started!");
            }
            encoding => match session.try_apply_player_move(encoding) {
                Ok(_) => {
                    println!("Engine thinking...");
                    if let AiMoveOutcome::Played(report) = session.request_ai_move() {
                        let note = if report.is_checkmate {
                            " (checkmate)"
                        } else if report.is_check {
                            " (check)"
                        } else {
                            ""
                        };
                        println!("Engine plays: {}{}", report.encoding, note);
                    }
                }
                Err(e) => println!("{e}. Try again (e.g. e2e4)"),
            },
        }
    }

    Ok(())
}

fn eval(fen: Option<&str>, mirror: bool, side_to_move_mobility: bool) -> Result<()> {
    let position = parse_position(fen)?;
    let config = EngineConfig {
        mirror_tables: mirror,
        mobility: if side_to_move_mobility {
            MobilityMode::SideToMove
        } else {
            MobilityMode::Symmetric
        },
        ..EngineConfig::default()
    };
    let evaluator = Evaluator::new(&config);

    display_board(&position);
    println!("FEN: {}", position.canonical_key());
    println!(
        "Evaluation: {} cp (+ = White, - = Black)",
        evaluator.score(&position)
    );
    Ok(())
}

fn best(fen: Option<&str>, depth: u8, no_book: bool, config: EngineConfig) -> Result<()> {
    if depth == 0 {
        bail!("depth must be at least 1");
    }
    let position = parse_position(fen)?;
    let engine = if no_book {
        Engine::with_book(config, OpeningBook::empty())
    } else {
        Engine::new(config)
    };

    println!("Position: {}", position.canonical_key());
    println!("Searching to depth {}...", depth);

    let start = std::time::Instant::now();
    let result = engine.search(&position, depth, &RepetitionGuard::new(engine.config()));
    let elapsed = start.elapsed();

    match result.best_move {
        Some(best_move) => {
            println!("\nBest move: {}", best_move);
            match result.source {
                MoveSource::Book => println!("Source: opening book"),
                MoveSource::Search => {
                    if let Some(score) = result.score {
                        println!("Score: {} cp", score);
                    }
                    println!("Nodes: {}", result.nodes);
                }
            }
            println!("Time: {:.2}s", elapsed.as_secs_f64());
        }
        None => println!("No legal moves available ({})", position.result()),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            color,
            depth,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(depth) = depth {
                config.depth = depth;
                config.validate()?;
            }
            play(color, config)
        }
        Command::Eval {
            fen,
            mirror,
            side_to_move_mobility,
        } => eval(fen.as_deref(), mirror, side_to_move_mobility),
        Command::Best {
            fen,
            depth,
            no_book,
            config,
        } => best(
            fen.as_deref(),
            depth,
            no_book,
            load_config(config.as_deref())?,
        ),
        Command::Uci { config } => {
            let mut engine = uci::UciEngine::new(load_config(config.as_deref())?);
            engine.run()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::positions;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["chess", "best", positions::KIWIPETE, "--depth", "2"]);
        match cli.command {
            Command::Best { fen, depth, .. } => {
                assert_eq!(fen.as_deref(), Some(positions::KIWIPETE));
                assert_eq!(depth, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::parse_from(["chess", "play", "--color", "black"]);
        assert!(matches!(
            cli.command,
            Command::Play {
                color: Side::Black,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_config_is_default() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
        assert!(load_config(Some(Path::new("/nonexistent/engine.json"))).is_err());
    }
}
