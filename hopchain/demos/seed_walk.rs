//! Seed walk example: enable a routing protocol along a chain of routers
//!
//! Logs into the seed, enables RIP or OSPF on it, then follows /30 links
//! through up to `--max` devices, tunneling through each router reached.
//! The run is printed as JSON and recorded into an in-memory inventory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example seed_walk -- \
//!     --seed 148.204.58.1 --user cisco --password cisco --protocol OSPF
//! ```
//!
//! Timeouts default to `SSH_CONNECT_TIMEOUT` / `SSH_AUTH_TIMEOUT` (seconds)
//! and can be overridden with `--timeout`.

use std::env;
use std::time::Duration;

use hopchain::{HopOutcome, MemoryInventory, Timeouts, WalkerBuilder, record_run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some(password) = args.password else {
        eprintln!("Error: --password is required");
        std::process::exit(1);
    };

    let timeouts = match args.timeout {
        Some(secs) => Timeouts::uniform(Duration::from_secs(secs)),
        None => Timeouts::from_env(),
    };

    let walker = WalkerBuilder::new(&args.seed)
        .username(&args.user)
        .password(password)
        .protocol(&args.protocol)
        .max_devices(args.max_devices)
        .timeouts(timeouts)
        .build()?;

    println!(
        "Walking from {} with {} (up to {} devices)...",
        args.seed,
        walker.request().protocol(),
        args.max_devices
    );

    let outcome = walker.run().await;

    let mut inventory = MemoryInventory::new();
    record_run(&mut inventory, &outcome);
    let run = outcome?;

    println!("{}", "-".repeat(50));
    for hop in &run.results {
        let via = hop.via.as_deref().unwrap_or("-");
        let address = hop.address.as_deref().unwrap_or("?");
        match hop.outcome {
            HopOutcome::Configured { .. } => {
                println!("{:<4} {:<16} via {:<16} configured", hop.label, address, via)
            }
            HopOutcome::Failed { ref error } => {
                println!("{:<4} {:<16} via {:<16} FAILED: {}", hop.label, address, via, error)
            }
            HopOutcome::Halted { ref reason } => println!("{:<4} stopped: {}", hop.label, reason),
        }
    }
    println!("{}", "-".repeat(50));

    println!("{}", serde_json::to_string_pretty(&run)?);
    println!(
        "\n{} device(s) in inventory, {} event(s) recorded",
        inventory.device_count(),
        inventory.events().len()
    );

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    seed: String,
    user: String,
    password: Option<String>,
    protocol: String,
    max_devices: usize,
    timeout: Option<u64>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut seed = "148.204.58.1".to_string();
        let mut user = "cisco".to_string();
        let mut password = None;
        let mut protocol = "OSPF".to_string();
        let mut max_devices = hopchain::walker::DEFAULT_MAX_DEVICES;
        let mut timeout = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" | "-s" => {
                    i += 1;
                    if i < args.len() {
                        seed = args[i].clone();
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--protocol" | "-r" => {
                    i += 1;
                    if i < args.len() {
                        protocol = args[i].clone();
                    }
                }
                "--max" | "-m" => {
                    i += 1;
                    if i < args.len() {
                        max_devices = args[i].parse().unwrap_or(max_devices);
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().ok();
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            seed,
            user,
            password,
            protocol,
            max_devices,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"hopchain seed_walk example

USAGE:
    cargo run --example seed_walk -- [OPTIONS]

OPTIONS:
    -s, --seed <ADDR>        Seed management address [default: 148.204.58.1]
    -u, --user <USER>        Username [default: cisco]
    -P, --password <PASS>    Password for login and enable
    -r, --protocol <NAME>    RIP or OSPF [default: OSPF]
    -m, --max <N>            Devices to configure, seed included [default: 3]
    -t, --timeout <SECS>     Connect and auth timeout [default: $SSH_CONNECT_TIMEOUT or 10]
    --help                   Print this help message
"#
        );
    }
}
