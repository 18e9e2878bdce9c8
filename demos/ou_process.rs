//! Ornstein-Uhlenbeck demo: stream an Euler-Maruyama integration into a
//! live terminal plot, with the driving Brownian path as a second series.
//!
//! Press 'q' or Escape to quit.

use std::time::Duration;
use traceplot::{PlotController, TermConfig};

/// Mean-reversion rate.
const THETA: f64 = 1.2;
/// Long-run mean.
const MU: f64 = 0.8;
/// Diffusion coefficient.
const SIGMA: f64 = 0.35;
/// Integration horizon.
const T_END: f64 = 8.0;
/// Number of time steps.
const STEPS: usize = 1600;
/// Steps handed to the callback per block.
const BATCH: usize = 4;

/// Standard normal draw via Box-Muller.
fn gaussian(rng: &mut impl rand::Rng) -> f64 {
    let u1 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("Traceplot OU Demo");
    println!("=================");
    println!("dX = theta (mu - X) dt + sigma dW, streamed {BATCH} steps at a time.");
    println!("Press 'q' or Escape to quit.\n");
    std::thread::sleep(Duration::from_secs(1));

    let dt = T_END / STEPS as f64;
    let tspan: Vec<f64> = (0..=STEPS).map(|i| i as f64 * dt).collect();

    let mut plot = PlotController::terminal(TermConfig {
        title: "Ornstein-Uhlenbeck (solid: X, dashed: W)".to_string(),
        ..TermConfig::default()
    });

    let mut y = 0.0f64;
    let mut w = 0.0f64;
    plot.init(&tspan, &[y], Some(&[w]))?;

    let mut rng = rand::rng();
    let mut times = Vec::with_capacity(BATCH);
    let mut states = Vec::with_capacity(BATCH);
    let mut noises = Vec::with_capacity(BATCH);
    let mut closed = false;

    for i in 1..=STEPS {
        // Euler-Maruyama update.
        let dw = gaussian(&mut rng) * dt.sqrt();
        y += THETA * (MU - y) * dt + SIGMA * dw;
        w += dw;

        times.push(i as f64 * dt);
        states.push(y);
        noises.push(w);

        if times.len() == BATCH || i == STEPS {
            if !plot.step(&times, &states, Some(&noises))?.is_open() {
                closed = true;
                break;
            }
            times.clear();
            states.clear();
            noises.clear();
            // Stand-in for real per-step solver cost.
            std::thread::sleep(Duration::from_millis(8));
        }
    }

    // Hold the last frame until the user closes the plot; an empty block
    // is a no-op that still reports surface liveness.
    while !closed && plot.step(&[], &[], Some(&[]))?.is_open() {
        std::thread::sleep(Duration::from_millis(100));
    }
    plot.done()?;

    println!("Streamed {} samples.", STEPS + 1);
    Ok(())
}
