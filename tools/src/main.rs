//! seg-runner: headless runner for the segregation simulation.
//!
//! Usage:
//!   seg-runner --seed 12345 --ticks 200 --config data/segregation.json
//!   seg-runner --seed 12345 --ticks 500 --stop-when-settled --render
//!   seg-runner --seed 12345 --ipc-mode

use anyhow::Result;
use segregation_core::{config::SimConfig, engine::SimEngine, snapshot::GridSnapshot};
use std::env;
use std::io::{self, BufRead, Write};

/// One JSON object per stdin line.
#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 100u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let render = args.iter().any(|a| a == "--render");
    let stop_when_settled = args.iter().any(|a| a == "--stop-when-settled");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    if !ipc_mode {
        println!("Segregation — seg-runner");
        println!("  seed:       {seed}");
        println!("  ticks:      {ticks}");
        println!("  config:     {}", config_path.unwrap_or("(defaults)"));
        println!("  locations:  {}", config.n_locations);
        println!("  threshold:  {}", config.threshold);
        println!();
    }

    let run_id = format!("run-{seed}");
    let mut engine = SimEngine::new(run_id, seed, config)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        run_batch(&mut engine, ticks, stop_when_settled);
        print_summary(&engine);
        if render {
            println!();
            println!("{}", engine.grid().to_text());
        }
    }

    Ok(())
}

fn run_batch(engine: &mut SimEngine, ticks: u64, stop_when_settled: bool) {
    if !stop_when_settled {
        engine.run_ticks(ticks);
        return;
    }
    for _ in 0..ticks {
        engine.run_ticks(1);
        if engine.last_outcome().is_some_and(|o| o.unsatisfied() == 0) {
            log::info!("settled at tick {}", engine.current_tick());
            break;
        }
    }
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count } => {
                engine.run_ticks(count);
                write_state(&mut stdout, &engine.snapshot())?;
            }
            IpcCommand::GetState => {
                write_state(&mut stdout, &engine.snapshot())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_state(out: &mut impl Write, snapshot: &GridSnapshot) -> Result<()> {
    writeln!(out, "{}", snapshot.to_json()?)?;
    Ok(())
}

fn print_summary(engine: &SimEngine) {
    let census = engine.grid().census();
    let size = engine.grid().size();

    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {}", engine.run_id);
    println!("  grid:           {size}x{size}");
    println!("  final tick:     {}", engine.current_tick());
    println!("  type_a:         {}", census.type_a);
    println!("  type_b:         {}", census.type_b);
    println!("  vacant:         {}", census.vacant);
    match engine.last_outcome() {
        Some(o) => {
            println!("  unsatisfied:    {} (a={}, b={})", o.unsatisfied(), o.unsatisfied_a, o.unsatisfied_b);
            println!("  last moves:     {}", o.relocations.total());
        }
        None => println!("  (No ticks run yet)"),
    }
    println!("  settled:        {}", engine.is_settled());
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
