use std::{
    env,
    error::Error,
    path::PathBuf,
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::RwLock;

use termin8::{
    chip8::ChipSet,
    definitions::timer,
    devices::Keypad,
    input::InputWorker,
    resources::Rom,
    screen::{RawModeGuard, TerminalScreen},
    Runner,
};

const USAGE: &str = "usage: chip8 [cycle_period_ms] [instructions_per_frame] ROM_PATH";

/// The values taken from the command line.
struct Config {
    cycle_period: Duration,
    instructions_per_frame: u32,
    rom_path: PathBuf,
}

/// Parses a strictly positive number, so that zero and negative values
/// get their own message instead of a generic parse failure.
fn parse_positive(value: &str, what: &str) -> Result<i64, String> {
    match value.parse::<i64>() {
        Ok(number) if number > 0 => Ok(number),
        Ok(_) => Err(format!("{} must be a positive number", what)),
        Err(_) => Err(format!("{} is not a valid number: '{}'", what, value)),
    }
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let (cycle_period, instructions_per_frame, rom_path) = match args {
        [rom] => (timer::FRAME, timer::INSTRUCTIONS_PER_FRAME, rom),
        [period, rom] => (
            Duration::from_millis(parse_positive(period, "the cycle period")? as u64),
            timer::INSTRUCTIONS_PER_FRAME,
            rom,
        ),
        [period, instructions, rom] => {
            let instructions = parse_positive(instructions, "the instruction count")?;
            if instructions > u32::MAX as i64 {
                return Err("the instruction count is out of range".to_string());
            }
            (
                Duration::from_millis(parse_positive(period, "the cycle period")? as u64),
                instructions as u32,
                rom,
            )
        }
        _ => return Err("the wrong number of arguments has been passed".to_string()),
    };

    Ok(Config {
        cycle_period,
        instructions_per_frame,
        rom_path: PathBuf::from(rom_path),
    })
}

fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let rom = Rom::from_file(&config.rom_path)?;
    log::info!(
        "loaded ROM {} ({} bytes)",
        rom.get_name(),
        rom.get_data().len()
    );

    let keypad = Arc::new(RwLock::new(Keypad::new()));
    let run_flag = Arc::new(AtomicBool::new(true));
    let chip = ChipSet::with_keypad(rom, keypad.clone());

    // raw mode lives above the worker and the runner, so it is restored
    // only after both finished
    let _raw_mode = RawModeGuard::enable()?;
    let mut worker = InputWorker::spawn(keypad, run_flag.clone());
    let mut runner = Runner::new(chip, TerminalScreen::new(), run_flag.clone());

    let result = runner.run(config.cycle_period, config.instructions_per_frame);

    // stop the worker as well when the cpu side failed
    run_flag.store(false, Ordering::Relaxed);
    worker.join();

    result?;
    log::info!("clean shutdown");
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(err) = run(config) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let config = parse_args(&args(&["pong.ch8"])).unwrap();
        assert_eq!(config.cycle_period, timer::FRAME);
        assert_eq!(config.instructions_per_frame, timer::INSTRUCTIONS_PER_FRAME);
        assert_eq!(config.rom_path, PathBuf::from("pong.ch8"));
    }

    #[test]
    fn test_parse_args_period_only() {
        let config = parse_args(&args(&["17", "pong.ch8"])).unwrap();
        assert_eq!(config.cycle_period, Duration::from_millis(17));
        assert_eq!(config.instructions_per_frame, timer::INSTRUCTIONS_PER_FRAME);
    }

    #[test]
    fn test_parse_args_full_form() {
        let config = parse_args(&args(&["17", "8", "pong.ch8"])).unwrap();
        assert_eq!(config.cycle_period, Duration::from_millis(17));
        assert_eq!(config.instructions_per_frame, 8);
    }

    #[test]
    fn test_parse_args_rejects_bad_values() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["a", "b", "c", "d"])).is_err());
        assert!(parse_args(&args(&["-17", "pong.ch8"])).is_err());
        assert!(parse_args(&args(&["0", "pong.ch8"])).is_err());
        assert!(parse_args(&args(&["17", "-8", "pong.ch8"])).is_err());
        assert!(parse_args(&args(&["sixteen", "pong.ch8"])).is_err());
    }
}
