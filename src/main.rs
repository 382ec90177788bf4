//! BRKT VM runtime entry point.
//!
//! Behavior summary:
//! - With **no args**, print `usage: bvm [file]` and exit 0.
//! - With `-h`/`--help`, print usage and exit 0.
//! - With `-v`/`--version`, print build-target + version and exit 0.
//! - With a path, read the file, load it as a binary program image, and
//!   execute it end-to-end.
//!
//! Exit status follows the binary format's error-kind table: `0` on a
//! clean halt, `2` on a file read error, `3`/`4`/`1` on the load- and
//! runtime-error classes described in `error::LoadError`/`RuntimeError`.

use std::env;
use std::fs;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use brkt_vm::{Program, Vm};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() -> String {
    format!(
        r#"brkt_vm v{0}

Usage:
    bvm [file]

Arguments:
    [file]
        Path to a binary BRKT program image to load and execute.

Options:
    -h, --help
        Show this help message and exit.
    -v, --version
        Show runtime version."#,
        VERSION
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("usage: bvm [file]");
        return ExitCode::from(0);
    }

    if args[1] == "-h" || args[1] == "--help" {
        println!("{}", usage());
        return ExitCode::from(0);
    }

    if args[1] == "-v" || args[1] == "--version" {
        println!(
            "brkt-vm-build-{}-{}: v{}",
            env::consts::OS,
            env::consts::ARCH,
            VERSION
        );
        return ExitCode::from(0);
    }

    let path = &args[1];
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("failed to read {}: {}", path, e);
            return ExitCode::from(2);
        }
    };

    let program = match Program::parse(&bytes) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };
    info!(
        path = %path,
        symbols = program.symbols.len(),
        constants = program.constants.len(),
        procedures = program.procedures.len(),
        instructions = program.instructions.len(),
        "loaded program"
    );

    let mut vm = match Vm::new(&program) {
        Ok(vm) => vm,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    if let Err(e) = vm.run() {
        eprintln!("{}", e);
        return ExitCode::from(e.exit_code() as u8);
    }

    ExitCode::from(0)
}
