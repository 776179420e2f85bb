use anyhow::Result;

use sortscope_core::steps::{replay, StepSummary};
use sortscope_core::Algorithm;

use super::parse_values;

pub fn run(algorithm: Algorithm, values: &str, json: bool) -> Result<()> {
    let values = parse_values(values)?;
    let steps = algorithm.produce(&values);

    if json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    for (i, step) in steps.iter().enumerate() {
        println!("{:>5}  {}", i, step);
    }

    let summary = StepSummary::of(&steps);
    println!();
    println!(
        "{}: {} steps ({} compares, {} swaps, {} overwrites, {} sorted marks)",
        algorithm.display_name(),
        summary.total,
        summary.compares,
        summary.swaps,
        summary.overwrites,
        summary.sorted_marks
    );
    println!("Result: {:?}", replay(&values, &steps));

    Ok(())
}
