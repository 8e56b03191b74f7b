//! Ethereum Leading-Zero Address Miner CLI
//!
//! Usage:
//!   zero_vanity                                   # 3 private keys whose address starts with 00000000
//!   zero_vanity -p 000000 -n 1                    # 1 key with six leading zeros
//!   zero_vanity -m create2 --deployer 0x.. --init-code-hash 0x..   # CREATE2 salts
//!   zero_vanity -n 0                              # Benchmark: report throughput until Ctrl+C

use std::process;

use clap::Parser;
use crossbeam_channel::{bounded, never, Receiver};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use zero_vanity::worker::format_number;
use zero_vanity::{
    Config, KeypairSpace, RunMode, SearchError, SearchMatch, SearchMode, SearchOptions,
    SearchReport, SearchSpace, ThroughputReporter, WorkerPool,
};

fn main() {
    init_tracing();

    let config = Config::parse();

    // Validate configuration
    let options = match config.search_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let outcome = match config.mode {
        SearchMode::Address => execute(KeypairSpace::new(), &options),
        SearchMode::Create2 => match config.create2_space() {
            Ok(space) => execute(space, &options),
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                process::exit(1);
            }
        },
    };

    if let Err(e) = outcome {
        error!(error = %e, "search aborted");
        eprintln!("Search failed: {}", e);
        process::exit(2);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn execute<S: SearchSpace>(space: S, options: &SearchOptions) -> Result<(), SearchError> {
    print_banner(&space, options);

    let cores = num_cpus::get();
    if options.workers > cores {
        warn!(
            workers = options.workers,
            cores, "more workers than available cores; throughput will not scale past core count"
        );
    }

    let interrupt = install_interrupt(options.mode);

    let mut collected = 0;
    let pool = WorkerPool::spawn(space, options, ThroughputReporter::stdout_sink())?
        .with_match_sink(Box::new(move |found: &SearchMatch| {
            collected += 1;
            print_result::<S>(found, collected);
        }));

    println!("Searching... (Press Ctrl+C to stop)\n");

    let report = pool.run(&interrupt)?;

    if let RunMode::Bounded { .. } = options.mode {
        println!("Target reached! Found {} match(es).", report.matches.len());
    }
    print_summary(&report);

    Ok(())
}

/// Installs the Ctrl-C handler and returns the channel an unbounded run
/// stops on.
///
/// A bounded run exits on Ctrl-C; its matches were already printed as they
/// arrived. If the handler cannot be installed the returned receiver never
/// fires.
fn install_interrupt(mode: RunMode) -> Receiver<()> {
    let (interrupt_tx, interrupt_rx) = bounded(1);
    let unbounded = mode == RunMode::Unbounded;
    let installed = ctrlc::set_handler(move || {
        if unbounded {
            let _ = interrupt_tx.try_send(());
        } else {
            eprintln!("\nStopped by user.");
            process::exit(130);
        }
    });

    match installed {
        Ok(()) => interrupt_rx,
        Err(e) => {
            warn!(error = %e, "failed to install Ctrl-C handler");
            never()
        }
    }
}

fn print_banner<S: SearchSpace>(space: &S, options: &SearchOptions) {
    println!("Ethereum Leading-Zero Address Miner");
    println!("===================================");
    println!("Mode:       {}", space.describe());
    println!("Prefix:     {}", options.criterion);
    println!("Difficulty: {}", options.criterion.difficulty_description());
    println!("Workers:    {}", options.workers);
    match options.mode {
        RunMode::Bounded { target } => println!("Target:     {} match(es)", target),
        RunMode::Unbounded => println!("Target:     unbounded (benchmark, Ctrl+C to stop)"),
    }
    println!();
}

fn print_result<S: SearchSpace>(result: &SearchMatch, index: usize) {
    let label = format!("{}:", S::SECRET_LABEL);
    println!("=== Match #{} ===", index);
    println!("{:<13}{}", "Address:", result.address);
    println!("{:<13}{}", label, result.secret_hex());
    println!("{:<13}{}", "Worker:", result.worker_id);
    println!();
}

fn print_summary(report: &SearchReport) {
    println!("\n--- Final Statistics ---");
    println!("Total guesses:  {}", format_number(report.total_guesses));
    println!("Matches found:  {}", report.matches.len());
    println!("Time elapsed:   {:.2}s", report.elapsed.as_secs_f64());
    println!(
        "Average speed:  {}/s",
        format_number(report.guesses_per_second() as u64)
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossbeam_channel::RecvTimeoutError;

    use super::*;

    #[test]
    fn test_failed_handler_install_does_not_interrupt() {
        let first = install_interrupt(RunMode::Unbounded);
        // Only one handler may be registered per process.
        let second = install_interrupt(RunMode::Unbounded);

        for interrupt in [&first, &second] {
            assert_eq!(
                interrupt.recv_timeout(Duration::from_millis(20)),
                Err(RecvTimeoutError::Timeout)
            );
        }
    }
}
