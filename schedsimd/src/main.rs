//! # Scheduling Simulator Host
//!
//! Main entry point for `schedsimd`.

use schedsimd::{parse_args, usage, CliCommand, HostRuntime};
use std::env;
use std::io;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("schedsimd");

    let config = match parse_args(&args) {
        Ok(CliCommand::Run(config)) => config,
        Ok(CliCommand::Help) => {
            eprint!("{}", usage(program));
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprint!("{}", usage(program));
            process::exit(1);
        }
    };

    let runtime = HostRuntime::new(config);
    let stdout = io::stdout();
    let stderr = io::stderr();
    if let Err(e) = runtime.run(&mut stdout.lock(), &mut stderr.lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
