use anyhow::Result;

use sortscope_core::advisor::Advisor;
use sortscope_core::{AppConfig, Algorithm};

pub async fn explain(config: &AppConfig, algorithm: Algorithm) -> Result<()> {
    let advisor = Advisor::new(&config.ai)?;
    let text = advisor.explain(algorithm).await?;
    println!("{}\n", algorithm.display_name());
    println!("{}", text);
    Ok(())
}

pub async fn quiz(config: &AppConfig, algorithm: Algorithm) -> Result<()> {
    let advisor = Advisor::new(&config.ai)?;
    let quiz = advisor.quiz(algorithm).await?;

    println!("{} quiz\n", algorithm.display_name());
    for (qi, question) in quiz.questions().iter().enumerate() {
        println!("Q{}: {}", qi + 1, question.question);
        for (oi, option) in question.options.iter().enumerate() {
            let marker = if question.is_correct(option) { "*" } else { " " };
            println!("  {} {}. {}", marker, oi + 1, option);
        }
        println!();
    }
    Ok(())
}
