//! Depot charging simulator entry point: CLI wiring and run orchestration.

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{error, info};

use depot_sim::config::DepotConfig;
use depot_sim::io::export::export_outputs;
use depot_sim::runner::{load_sessions, run_depot};
use depot_sim::sim::report::SavingsReport;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    sessions_path: Option<String>,
    seed_override: Option<u64>,
    out_dir: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
    #[cfg(feature = "tui")]
    tui: bool,
}

fn print_help() {
    eprintln!("depot-sim: EV depot charging and peak-shaving simulator");
    eprintln!();
    eprintln!("Usage: depot-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load depot configuration from TOML file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        DepotConfig::PRESETS.join(", ")
    );
    eprintln!("  --sessions <path>        Read charging sessions from CSV");
    eprintln!("  --seed <u64>             Override synthetic session seed");
    eprintln!("  --out-dir <dir>          Write summary JSON, load and schedule CSVs");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the run");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Open the terminal dashboard after the run");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the depot preset is used.");
    eprintln!("Without --sessions a synthetic session set is generated.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following flag `args[*i]`, advancing `i`.
fn flag_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> &'a str {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        sessions_path: None,
        seed_override: None,
        out_dir: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
        #[cfg(feature = "tui")]
        tui: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                cli.config_path = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            "--preset" => {
                cli.preset = Some(flag_value(&args, &mut i, "a name argument").to_string());
            }
            "--sessions" => {
                cli.sessions_path = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            "--seed" => {
                let v = flag_value(&args, &mut i, "a u64 argument");
                if let Ok(s) = v.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{v}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--out-dir" => {
                cli.out_dir = Some(flag_value(&args, &mut i, "a directory argument").to_string());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let v = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = v.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{v}\" is not a valid u16");
                    process::exit(1);
                }
            }
            #[cfg(feature = "tui")]
            "--tui" => {
                cli.tui = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Logs `msg` and exits with status 1.
fn fail(msg: impl std::fmt::Display) -> ! {
    error!("{msg}");
    process::exit(1);
}

fn main() {
    let cli = parse_args();
    init_logging();

    // Load config: --config takes priority, then --preset, then depot default
    let mut config = if let Some(ref path) = cli.config_path {
        DepotConfig::from_toml_file(Path::new(path)).unwrap_or_else(|e| fail(e))
    } else if let Some(ref name) = cli.preset {
        DepotConfig::from_preset(name).unwrap_or_else(|e| fail(e))
    } else {
        DepotConfig::depot()
    };

    if let Some(seed) = cli.seed_override {
        config.synthetic.seed = seed;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }

    let sessions_path = cli.sessions_path.as_deref().map(PathBuf::from);
    let sessions = load_sessions(&config, sessions_path.as_deref()).unwrap_or_else(|e| fail(e));
    let run = run_depot(&config, &sessions).unwrap_or_else(|e| fail(e));

    println!("{}", SavingsReport::from_run(&run));

    if let Some(ref dir) = cli.out_dir {
        match export_outputs(&run, Path::new(dir)) {
            Ok(files) => info!(files = files.len(), dir = %dir, "outputs written"),
            Err(e) => fail(format!("failed to write outputs: {e}")),
        }
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        if let Err(e) = depot_sim::tui::run(run.clone()) {
            fail(format!("TUI crashed: {e}"));
        }
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(depot_sim::api::AppState { run });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(depot_sim::api::serve(state, addr)) {
            fail(format!("API server error: {e}"));
        }
    }
}
