//! Analyze a piece of text from the command line.
//!
//! This example shows how to:
//! - Load provider configuration from the environment
//! - Switch the active provider and model at runtime
//! - Read scores, summary and suggestions from the result
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! cargo run --example analyze_text -- style "Hello, how are you?"
//!
//! # Use another provider and model
//! export ANTHROPIC_API_KEY="sk-ant-..."
//! cargo run --example analyze_text -- impact "Thanks for waiting" anthropic claude-3-5-haiku-20241022
//! ```

use emotibot_analysis::{AnalysisCategory, AnalysisConfig, ProviderOptions, TextAnalyzer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let category: AnalysisCategory = args.next().unwrap_or_else(|| "style".to_string()).parse()?;
    let text = args
        .next()
        .unwrap_or_else(|| "Hello, how are you?".to_string());
    let provider = args.next();
    let model = args.next();

    let config = AnalysisConfig::from_env()?;
    let analyzer = TextAnalyzer::from_config(&config)?;

    if let Some(provider) = provider {
        let options = model.map(ProviderOptions::with_model);
        analyzer.registry().try_set_provider(&provider, options)?;
    }

    let active = analyzer.registry().active_provider();
    println!(
        "Analyzing {} with {} ({})...",
        category.title(),
        active.name(),
        active.model()
    );

    let result = match analyzer.analyze(&text, category).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("\n{}", e.user_message());
            eprintln!("Cause: {}", e.cause());
            if e.is_retryable() {
                eprintln!("This error may succeed if retried.");
            }
            return Err(e.into());
        }
    };

    println!();
    for metric in category.metrics() {
        let score = result.score(metric.id).unwrap_or_default();
        println!("{:<16} {:>5.1}  {}", metric.label, score, metric.description);
        if let Some(explanation) = result.analysis.get(metric.id) {
            println!("{:<16}        {}", "", explanation);
        }
    }
    println!("\nAverage: {:.1}", result.average_score(category));

    if !result.summary.is_empty() {
        println!("\nSummary: {}", result.summary);
    }
    if !result.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &result.suggestions {
            println!("  - {suggestion}");
        }
    }

    Ok(())
}
