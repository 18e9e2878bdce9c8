//! Logistic-growth demo: a deterministic ODE driven through the
//! string-selector call surface, the shape solver callbacks usually take.
//!
//! Press 'q' or Escape to quit.

use std::time::Duration;
use traceplot::{PlotController, TermConfig};

/// Growth rate.
const R: f64 = 1.4;
/// Carrying capacity.
const K: f64 = 10.0;
/// Integration horizon.
const T_END: f64 = 10.0;
/// Number of time steps.
const STEPS: usize = 1000;
/// Steps handed to the callback per block.
const BATCH: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("Traceplot Logistic Demo");
    println!("=======================");
    println!("dy = r y (1 - y/K) dt via the selector call surface.");
    println!("Press 'q' or Escape to quit.\n");
    std::thread::sleep(Duration::from_secs(1));

    let dt = T_END / STEPS as f64;
    let tspan: Vec<f64> = (0..=STEPS).map(|i| i as f64 * dt).collect();

    let mut plot = PlotController::terminal(TermConfig {
        title: "Logistic growth".to_string(),
        ..TermConfig::default()
    });

    let mut y = 0.2f64;
    plot.call("init", &tspan, &[y], None)?;

    let mut times = Vec::with_capacity(BATCH);
    let mut states = Vec::with_capacity(BATCH);
    let mut closed = false;

    for i in 1..=STEPS {
        // Forward Euler update.
        y += R * y * (1.0 - y / K) * dt;
        times.push(i as f64 * dt);
        states.push(y);

        if times.len() == BATCH || i == STEPS {
            if !plot.call("step", &times, &states, None)?.is_open() {
                closed = true;
                break;
            }
            times.clear();
            states.clear();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    while !closed && plot.call("step", &[], &[], None)?.is_open() {
        std::thread::sleep(Duration::from_millis(100));
    }
    plot.call("done", &[], &[], None)?;

    println!("Streamed {} samples.", STEPS + 1);
    Ok(())
}
