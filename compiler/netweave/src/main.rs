//! Netweave CLI
//!
//! Build-time weaver for networked game modules.

use std::path::Path;

use netweave::commands::{inspect_module, weave_module, WeaveArgs};

fn main() {
    netweave::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let code = match command.as_str() {
        "weave" => match WeaveArgs::parse(&args[2..]) {
            Ok(weave_args) => weave_module(&weave_args),
            Err(message) => {
                eprintln!("error: {message}");
                eprintln!("Usage: netweave weave <module> [-r <reference>]... [-o <output>] [--config=<file>] [--json]");
                1
            }
        },
        "inspect" => {
            if args.len() < 3 {
                eprintln!("Usage: netweave inspect <module>");
                std::process::exit(1);
            }
            inspect_module(Path::new(&args[2]))
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        "version" | "--version" | "-v" => {
            println!("netweave {}", env!("CARGO_PKG_VERSION"));
            0
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            1
        }
    };

    std::process::exit(code);
}

fn print_usage() {
    println!("netweave - build-time weaver for networked modules");
    println!();
    println!("Usage: netweave <command> [options]");
    println!();
    println!("Commands:");
    println!("  weave <module>       Generate codecs and rewrite synchronized field access");
    println!("  inspect <module>     List the types, markers and methods of a module");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Weave options:");
    println!("  -r <path>            Add a referenced module (repeatable)");
    println!("  --reference=<path>   Same as -r");
    println!("  -o <path>            Output file (default: overwrite the input)");
    println!("  --config=<file>      JSON configuration file");
    println!("  --json               Print diagnostics as JSON on stdout");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Enable tracing output, e.g. RUST_LOG=netweave=debug");
    println!();
    println!("Examples:");
    println!("  netweave weave Game.dll -r Netweave.Runtime.dll");
    println!("  netweave weave Game.dll -o woven/Game.dll --json");
    println!("  netweave inspect Game.dll");
}
