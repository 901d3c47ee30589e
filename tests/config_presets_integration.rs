use std::process::Command;

#[derive(Debug)]
struct Figures {
    sessions: usize,
    baseline_cost: f64,
    scenarios: Vec<(String, f64)>,
}

#[test]
fn bundled_configs_run_via_cli_and_differ() {
    let depot = run_and_parse("configs/depot.toml");
    let small = run_and_parse("configs/small_depot.toml");

    assert_eq!(depot.sessions, 140);
    assert_eq!(small.sessions, 30);

    let depot_names: Vec<&str> = depot.scenarios.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(depot_names, ["aggressive", "conservative", "expected"]);
    assert_eq!(small.scenarios.len(), 1);
    assert_eq!(small.scenarios[0].0, "capped");

    assert!(
        depot.baseline_cost > small.baseline_cost,
        "expected the 140-session depot to cost more: depot={:.2}, small={:.2}",
        depot.baseline_cost,
        small.baseline_cost
    );
}

#[test]
fn bundled_depot_config_matches_builtin_preset() {
    let from_file = run_raw(&["--config", &manifest_path("configs/depot.toml")]);
    let builtin = run_raw(&["--preset", "depot"]);
    assert_eq!(from_file, builtin);
}

#[test]
fn capped_scenarios_stay_under_their_caps() {
    let small = run_and_parse("configs/small_depot.toml");
    let (_, peak) = &small.scenarios[0];
    assert!(*peak <= 120.0 + 0.01, "capped peak {peak:.2} above 120 kW");
}

fn manifest_path(rel: &str) -> String {
    format!("{}/{rel}", env!("CARGO_MANIFEST_DIR"))
}

fn run_raw(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_depot-sim"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("depot-sim process should run");

    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={} ",
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

fn run_and_parse(path: &str) -> Figures {
    parse_figures(&run_raw(&["--config", &manifest_path(path)]))
}

fn parse_figures(stdout: &str) -> Figures {
    let mut sessions = None;
    let mut baseline_cost = None;
    let mut scenarios = Vec::new();
    let mut current = None;

    for line in stdout.lines() {
        if let Some(v) = line.strip_prefix("Sessions:") {
            sessions = v.trim().parse().ok();
        } else if let Some(v) = line.strip_prefix("Baseline cost:") {
            baseline_cost = v.split_whitespace().next().and_then(|n| n.parse().ok());
        } else if let Some(v) = line.strip_prefix('[') {
            current = v.split_once(']').map(|(name, _)| name.to_string());
        } else if let Some(v) = line.trim_start().strip_prefix("Peak:") {
            let peak = v
                .split_whitespace()
                .next()
                .and_then(|n| n.parse().ok())
                .expect("peak should be numeric");
            scenarios.push((current.clone().expect("scenario header before Peak"), peak));
        }
    }

    Figures {
        sessions: sessions.expect("missing Sessions line"),
        baseline_cost: baseline_cost.expect("missing Baseline cost line"),
        scenarios,
    }
}
