use anyhow::{Context, Result};
use bplsm_core::{Config, LeveledIndex};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bplsm")]
#[command(about = "Leveled B+Tree index playground")]
struct Cli {
    /// Writes level 0 accepts before it is merged down
    #[arg(long, global = true, default_value_t = 6)]
    l0_capacity: usize,

    /// Capacity multiplier between adjacent levels
    #[arg(long, global = true, default_value_t = 2)]
    growth_factor: usize,

    /// B+Tree order of every level
    #[arg(long, global = true, default_value_t = 3)]
    order: usize,

    /// Log merges and tree rebalancing
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted insert/delete walkthrough, dumping the index after each step
    Demo,

    /// Interactive shell over an index of integer keys and string values
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::new(cli.l0_capacity, cli.growth_factor, cli.order);
    config.validate().context("Invalid index configuration")?;
    info!(
        l0_capacity = config.l0_capacity,
        growth_factor = config.growth_factor,
        order = config.order,
        "index configured"
    );

    match cli.command {
        Commands::Demo => run_demo(config),
        Commands::Shell => run_shell(config),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("bplsm_core=trace,bplsm=debug")
    } else {
        EnvFilter::new("bplsm=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn section(title: &str) {
    println!("--------------------------------");
    println!("{}", title);
    println!("--------------------------------");
}

fn show_lookup(index: &LeveledIndex<i64, i64>, key: i64) {
    match index.get(&key) {
        Some(value) => println!("get {}: {}", key, value),
        None => println!("get {}: (nil)", key),
    }
}

fn run_demo(config: Config) -> Result<()> {
    let mut index = LeveledIndex::with_config(config).context("Failed to build index")?;

    section("insert 1..=5");
    for i in 1..=5 {
        index.insert(i, i * 2);
    }
    print!("{}", index);

    section("insert 6");
    index.insert(6, 12);
    print!("{}", index);

    section("insert 7..=11");
    for i in 7..12 {
        index.insert(i, i * 2);
    }
    print!("{}", index);

    section("insert 12");
    index.insert(12, 24);
    print!("{}", index);

    section("insert 13..=18");
    for i in 13..19 {
        index.insert(i, i * 2);
    }
    print!("{}", index);

    section("delete 5");
    index.remove(5);
    print!("{}", index);
    show_lookup(&index, 5);

    section("insert 19..=23");
    for i in 19..24 {
        index.insert(i, i * 2);
    }
    print!("{}", index);
    show_lookup(&index, 5);

    index
        .check_invariants()
        .context("Index failed its structural checks")?;
    Ok(())
}

fn run_shell(config: Config) -> Result<()> {
    let mut index: LeveledIndex<i64, String> =
        LeveledIndex::with_config(config).context("Failed to build index")?;

    let mut rl = DefaultEditor::new()?;

    println!("bplsm shell");
    println!("Commands: put <key> <value>, get <key>, del <key>, scan [start end], stats, dump, quit");
    println!();

    loop {
        let readline = rl.readline("bplsm> ");

        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                if line == "quit" || line == "exit" {
                    break;
                }

                if let Err(e) = handle_command(&mut index, line) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    println!("Goodbye");
    Ok(())
}

fn parse_key(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("Invalid key: {}", raw))
}

fn handle_command(index: &mut LeveledIndex<i64, String>, line: &str) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(());
    }

    match parts[0] {
        "put" => {
            if parts.len() < 3 {
                anyhow::bail!("Usage: put <key> <value>");
            }

            let key = parse_key(parts[1])?;
            index.insert(key, parts[2..].join(" "));
            println!("OK");
        }

        "get" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: get <key>");
            }

            let key = parse_key(parts[1])?;
            match index.get(&key) {
                Some(value) => println!("{}", value),
                None => println!("(nil)"),
            }
        }

        "delete" | "del" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: del <key>");
            }

            let key = parse_key(parts[1])?;
            index.remove(key);
            println!("OK");
        }

        "scan" => {
            let count = match parts.len() {
                1 => print_pairs(index.iter()),
                3 => {
                    let start = parse_key(parts[1])?;
                    let end = parse_key(parts[2])?;
                    if start > end {
                        anyhow::bail!("Empty range: {} > {}", start, end);
                    }
                    print_pairs(index.range(&start, &end))
                }
                _ => anyhow::bail!("Usage: scan [start end]"),
            };
            println!("({} entries)", count);
        }

        "stats" => {
            for stats in index.stats() {
                println!(
                    "level {}: occupancy {}/{}, {} records, height {}",
                    stats.level, stats.occupancy, stats.capacity, stats.records, stats.height
                );
            }
        }

        "dump" => {
            print!("{}", index);
        }

        "check" => {
            index.check_invariants()?;
            println!("OK");
        }

        _ => {
            anyhow::bail!("Unknown command: {}", parts[0]);
        }
    }

    Ok(())
}

fn print_pairs<'a>(pairs: impl Iterator<Item = (&'a i64, &'a String)>) -> usize {
    let mut count = 0;
    for (key, value) in pairs {
        println!("{} = {}", key, value);
        count += 1;
    }
    count
}
