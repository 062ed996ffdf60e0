use hs_sweep::{Direction, RandomDriver, SweepConfig, SweepManager};
use hs_tracking::{InMemoryTracker, TrackingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Declarative search space: a scaled quadratic with a fixed optimizer tag
    let document = serde_json::json!({
        "help": "toy quadratic objective, minimized at x = 1",
        "hyperparameters": {
            "x": {"type": "float", "default": 0.0, "range": [-5.0, 5.0]},
            "scale": {"type": "int", "default": 1, "iter": [1, 2, 4]},
            "optimizer": {"type": "categorical", "default": "adam"}
        }
    });
    let dir = tempfile::tempdir()?;
    let space_path = dir.path().join("space.json");
    std::fs::write(&space_path, serde_json::to_string_pretty(&document)?)?;
    println!("Wrote search space to {}", space_path.display());

    let tracking = TrackingConfig::new("basic-sweep", "memory://local")?;
    let manager = SweepManager::new(
        SweepConfig::new("quadratic")
            .with_trials(20)
            .with_direction(Direction::Minimize)
            .with_parallelism(2),
        InMemoryTracker::connect(tracking),
    )?;

    let objective = manager.objective(&space_path, |params, run_id| {
        let x = params.get("x").and_then(|v| v.as_f64()).unwrap_or_default();
        let scale = params.get("scale").and_then(|v| v.as_i64()).unwrap_or(1) as f64;
        let value = scale * (x - 1.0).powi(2);
        println!("  run {run_id}: x = {x:.3}, scale = {scale}, objective = {value:.4}");
        Ok(value)
    });

    let mut driver = RandomDriver::with_seed(7);
    let outcome = manager.run_search(&mut driver, &objective)?;

    println!("Best value after {} trials: {:.4}", outcome.trials_completed, outcome.best_value);
    for (name, value) in &outcome.best_params {
        println!("  {name} = {value}");
    }

    let tracker = manager.tracker();
    let tracker = tracker.lock();
    println!("Recorded {} tracking runs", tracker.runs().len());

    Ok(())
}
