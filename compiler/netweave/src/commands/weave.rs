//! The `weave` command.

use std::path::PathBuf;

use crate::{WeaveConfig, Weaver};

/// Arguments of `netweave weave`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeaveArgs {
    pub input: PathBuf,
    pub references: Vec<PathBuf>,
    /// Defaults to overwriting `input`.
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

impl WeaveArgs {
    /// Parse the arguments following `weave`.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = WeaveArgs::default();
        let mut input = None;
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            match arg {
                "-r" | "-o" => {
                    let Some(value) = args.get(i + 1) else {
                        return Err(format!("missing path after `{arg}`"));
                    };
                    if arg == "-r" {
                        parsed.references.push(PathBuf::from(value));
                    } else {
                        parsed.output = Some(PathBuf::from(value));
                    }
                    i += 2;
                    continue;
                }
                "--json" => parsed.json = true,
                _ => {
                    if let Some(path) = arg.strip_prefix("--reference=") {
                        parsed.references.push(PathBuf::from(path));
                    } else if let Some(path) = arg.strip_prefix("--config=") {
                        parsed.config = Some(PathBuf::from(path));
                    } else if arg.starts_with('-') {
                        return Err(format!("unknown option `{arg}`"));
                    } else if input.is_none() {
                        input = Some(PathBuf::from(arg));
                    } else {
                        return Err(format!("unexpected argument `{arg}`"));
                    }
                }
            }
            i += 1;
        }

        parsed.input = input.ok_or_else(|| "missing module path".to_string())?;
        Ok(parsed)
    }
}

/// Weave one module file. Returns the exit code.
pub fn weave_module(args: &WeaveArgs) -> i32 {
    let config = match &args.config {
        Some(path) => match WeaveConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return 1;
            }
        },
        None => WeaveConfig::default(),
    };

    let weaver = Weaver::new(config);
    let output = args.output.as_ref().unwrap_or(&args.input);
    let outcome = match weaver.weave_file(&args.input, args.references.clone(), output) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    super::report(&outcome.diagnostics, args.json);
    if !outcome.succeeded() {
        return 1;
    }
    if !args.json {
        let path = args.input.display();
        if outcome.skipped {
            println!("already woven: {path}");
        } else {
            let stats = outcome.stats;
            println!(
                "woven: {path} ({} writers, {} readers, {} sync fields, {} accesses rewritten)",
                stats.writers_generated,
                stats.readers_generated,
                stats.sync_fields,
                stats.rewrite.rewritten()
            );
        }
    }
    0
}
