use std::path::Path;

use anyhow::Result;

use scrollstage_core::trace::{StepOutcome, Trace, TraceReport};
use scrollstage_core::{AppConfig, Deck, ScrollEvent};

pub fn run(config: &AppConfig, trace_path: &Path, deck_path: Option<&Path>, json: bool) -> Result<()> {
    let mut trace = Trace::load(trace_path)?;
    if let Some(path) = deck_path {
        trace = trace.with_deck(&Deck::load(path)?);
    }
    tracing::debug!(
        steps = trace.steps.len(),
        sections = trace.sections.len(),
        "Replaying trace"
    );

    let report = trace.run(&config.scroller, &config.visibility)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &TraceReport) {
    println!("Steps ({}):", report.dispositions.len());
    for (i, outcome) in report.dispositions.iter().enumerate() {
        let text = match outcome {
            StepOutcome::Ignored => "ignored".to_string(),
            StepOutcome::ConsumedLocally => "scrolled section content".to_string(),
            StepOutcome::Rejected => "rejected".to_string(),
            StepOutcome::TransitionStarted { from, to } => format!("transition {} -> {}", from, to),
            StepOutcome::Committed { index } => format!("now at section {}", index),
            StepOutcome::Idle => continue,
        };
        println!("  {:>3}  {}", i, text);
    }

    println!("\nNotifications ({}):", report.events.len());
    for event in &report.events {
        match event {
            ScrollEvent::IndexChanged { index, total } => println!("  index {} of {}", index, total),
            ScrollEvent::VariantChanged { variant } => println!("  header {:?}", variant),
        }
    }

    println!("\nFinal section: {}", report.final_index);
}
