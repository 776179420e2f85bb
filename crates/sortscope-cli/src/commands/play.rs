use anyhow::Result;
use tracing::{info, warn};

use sortscope_core::session::{MAX_LEN, MIN_LEN};
use sortscope_core::{AppConfig, Algorithm, BarSet, Playback, RunOutcome, Session, Speed};

use super::parse_values;

/// Play an algorithm without a terminal UI. Ctrl+C pauses the run at the
/// next step boundary and reports where it stopped.
pub async fn run(
    config: &AppConfig,
    algorithm: Algorithm,
    values: Option<&str>,
    size: Option<usize>,
    speed: Option<u32>,
) -> Result<()> {
    let values = match values {
        Some(values) => parse_values(values)?,
        None => {
            let len = size.unwrap_or_else(|| config.visualizer.array_size());
            if !(MIN_LEN..=MAX_LEN).contains(&len) {
                warn!(len, "array size outside {}..={}", MIN_LEN, MAX_LEN);
            }
            let mut session = Session::new(&config.visualizer);
            session.generate(len, &mut rand::rng());
            session.values().to_vec()
        }
    };
    let speed = Speed::from_slider(speed.unwrap_or(config.visualizer.speed));

    let steps = algorithm.produce(&values);
    let total = steps.len();
    info!(
        algorithm = algorithm.id(),
        len = values.len(),
        steps = total,
        delay_ms = speed.delay().as_millis() as u64,
        "playing"
    );
    println!("Input:  {:?}", values);

    let mut bars = BarSet::from_values(&values);
    let mut playback = Playback::new(steps, speed.delay());
    playback.start();

    let pause = playback.pause_signal();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            pause.raise();
        }
    });

    let outcome = playback.run(&mut bars).await;
    ctrl_c.abort();

    match outcome {
        RunOutcome::Completed => println!("Output: {:?}", bars.values()),
        RunOutcome::Suspended(at) => {
            println!("Paused at step {} of {}", at, total);
            println!("Bars:   {:?}", bars.values());
        }
    }

    let counters = playback.counters();
    println!(
        "Comparisons: {}  Swaps: {}",
        counters.comparisons, counters.swaps
    );

    Ok(())
}
