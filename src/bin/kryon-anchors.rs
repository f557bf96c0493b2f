// src/bin/kryon-anchors.rs
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use kryon_core::Priority;
use kryon_layout::{
    AnchorScript, ConstraintDescriptor, ConstraintRegistry, ElementNames, RecordingSink,
    RegistryConfig, SinkEvent,
};

#[derive(Parser)]
#[command(name = "kryon-anchors")]
#[command(about = "Resolve a Kryon anchor script into constraint descriptors")]
struct Args {
    /// Path to the anchor script
    script: String,

    /// Print descriptors as JSON
    #[arg(long)]
    json: bool,

    /// Print every activation/deactivation seen by the sink
    #[arg(long)]
    trace_sink: bool,

    /// Priority for assignments without an explicit `@priority` (1-1000)
    #[arg(long, default_value_t = 1000)]
    priority: u16,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Serialize)]
struct DescriptorRow {
    id: u64,
    target: String,
    source: Option<String>,
    multiplier: f32,
    offset: f32,
    priority: u16,
    warning: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if !Path::new(&args.script).exists() {
        anyhow::bail!("Anchor script not found: {}", args.script);
    }

    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read anchor script {}", args.script))?;
    let script = AnchorScript::parse(&source).context("Failed to parse anchor script")?;
    info!("Loaded {} statements from {}", script.len(), args.script);

    let config = RegistryConfig {
        default_priority: Priority::new(args.priority).context("Invalid --priority")?,
        debug_logging: args.debug,
    };
    let sink = RecordingSink::new();
    let mut registry = ConstraintRegistry::with_config(config).with_sink(Box::new(sink.clone()));
    let mut names = ElementNames::new();

    let report = script
        .apply(&mut registry, &mut names)
        .context("Failed to apply anchor script")?;

    info!(
        "{} assigned, {} cleared, {} dropped",
        report.assigned, report.cleared, report.dropped
    );

    if args.trace_sink {
        for event in sink.events() {
            match event {
                SinkEvent::Activated(d) => eprintln!("+ [{}] {}", d.id, describe(&names, &d)),
                SinkEvent::Deactivated(d) => {
                    eprintln!("- [{}] {} ({:?})", d.id, describe(&names, &d), d.state)
                }
            }
        }
    }

    // Participants in order of first appearance in the script.
    let active: Vec<&ConstraintDescriptor> = (1..=names.len() as u32)
        .flat_map(|id| registry.all_for(id))
        .collect();

    if args.json {
        let rows: Vec<DescriptorRow> = active
            .iter()
            .map(|d| DescriptorRow {
                id: d.id,
                target: names.describe(d.target),
                source: d.source.reference.map(|r| names.describe(r)),
                multiplier: d.source.multiplier,
                offset: d.source.offset,
                priority: d.priority.value(),
                warning: d.warning.map(|w| w.to_string()),
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize descriptors")?;
        println!("{}", json);
        return Ok(());
    }

    for d in active {
        println!("[{:>3}] {}  (priority {})", d.id, describe(&names, d), d.priority.value());
    }

    Ok(())
}

/// `target = source * k + c` using script names.
fn describe(names: &ElementNames, descriptor: &ConstraintDescriptor) -> String {
    let source = &descriptor.source;
    let Some(reference) = source.reference else {
        return format!("{} = {}", names.describe(descriptor.target), source.offset);
    };

    let mut rhs = names.describe(reference);
    if source.multiplier != 1.0 {
        rhs.push_str(&format!(" * {}", source.multiplier));
    }
    if source.offset > 0.0 {
        rhs.push_str(&format!(" + {}", source.offset));
    } else if source.offset < 0.0 {
        rhs.push_str(&format!(" - {}", -source.offset));
    }
    format!("{} = {}", names.describe(descriptor.target), rhs)
}
