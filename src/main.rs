use minesweeper_ai::{simulate, SimulationConfig};
use std::process::ExitCode;
use std::str::FromStr;

const USAGE: &str = "Usage: minesweeper-ai [height] [width] [mines] [games] [seed]";

fn main() -> ExitCode {
    let config = match parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Playing {} games on a {}x{} board with {} mines",
        config.games, config.height, config.width, config.mines
    );
    match simulate(&config) {
        Ok(summary) => {
            let games = summary.games().max(1) as f64;
            println!("Won:   {} ({:.1}%)", summary.won, 100.0 * summary.won as f64 / games);
            println!("Lost:  {}", summary.lost);
            println!("Stuck: {}", summary.stuck);
            println!(
                "Moves: {} safe, {} random",
                summary.safe_moves, summary.random_moves
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<SimulationConfig, String> {
    let mut config = SimulationConfig::default();
    parse_next(&mut args, "height", &mut config.height)?;
    parse_next(&mut args, "width", &mut config.width)?;
    parse_next(&mut args, "mines", &mut config.mines)?;
    parse_next(&mut args, "games", &mut config.games)?;
    parse_next(&mut args, "seed", &mut config.seed)?;
    if let Some(extra) = args.next() {
        return Err(format!("Unexpected argument `{}`", extra));
    }
    Ok(config)
}

fn parse_next<T>(
    args: &mut impl Iterator<Item = String>,
    name: &str,
    value: &mut T,
) -> Result<(), String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(arg) = args.next() {
        *value = arg
            .parse()
            .map_err(|err| format!("Invalid {} `{}`: {}", name, arg, err))?;
    }
    Ok(())
}
