//! Play command implementation
//!
//! Runs the animation loop of one frame group on the scheduler and prints
//! every tick until the loop completes or the time runs out.

use anyhow::{anyhow, Context, Result};
use appview_model::Category;
use appview_preview::sequence::resolve_interval;
use appview_preview::{select_frame_group, AnimationScheduler, AssetBackend, LoopConfig, TickEvent};
use colored::Colorize;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

use super::{runtime, Workspace};

/// Run the play command
///
/// # Arguments
/// * `group` - Frame group to play; the preview group when `None`
/// * `duration_ms` - Upper bound on the play time
/// * `interval_ms` - Tick interval override, clamped to the configured bounds
pub fn run(
    workspace: &Workspace,
    category: Category,
    id: u32,
    group: Option<usize>,
    duration_ms: u64,
    interval_ms: Option<u64>,
) -> Result<ExitCode> {
    let config = workspace.load_config()?;
    let item = workspace
        .backend()
        .appearance_details(category, id)
        .with_context(|| format!("Failed to load {} #{}", category, id))?;

    let group = match group {
        Some(group) => group,
        None => select_frame_group(category, &item)
            .ok_or_else(|| anyhow!("{} #{} has no animated frame group", category, id))?,
    };
    let info = item
        .sprite_info(group)
        .ok_or_else(|| anyhow!("{} #{} has no frame group {}", category, id, group))?;

    let mut loop_config = LoopConfig::from_sprite_info(info, &config);
    if category.is_outfit() {
        loop_config = loop_config.with_interval(Duration::from_millis(resolve_interval(info, &config)));
    }
    if let Some(ms) = interval_ms {
        loop_config = loop_config.with_interval(config.clamp_interval(ms));
    }

    println!(
        "{} {} #{} group {}: {} phase(s), {}, every {}ms",
        "Playing:".cyan().bold(),
        category,
        id,
        group,
        loop_config.frame_count,
        loop_config.loop_type,
        loop_config.interval.as_millis()
    );
    if loop_config.frame_count <= 1 {
        println!("  {}", "single phase, nothing to play".dimmed());
        return Ok(ExitCode::SUCCESS);
    }
    println!("  start at phase {}", loop_config.start_phase);

    let rt = runtime()?;
    let events = rt.block_on(play(
        (category, id),
        loop_config,
        Duration::from_millis(duration_ms),
        |event| match event {
            TickEvent::Advanced { phase } => println!("  {} phase {}", "->".green(), phase),
            TickEvent::Completed { phase } => {
                println!("  {} completed at phase {}", "ok".green(), phase)
            }
        },
    ));

    println!("{} {} tick(s)", "Done:".dimmed(), events.len());
    Ok(ExitCode::SUCCESS)
}

/// Runs one loop for at most `duration` and returns its ticks in order.
///
/// `on_event` sees every tick as it happens. Stops early when a finite loop
/// completes.
pub async fn play<F>(
    key: (Category, u32),
    config: LoopConfig,
    duration: Duration,
    mut on_event: F,
) -> Vec<TickEvent>
where
    F: FnMut(&TickEvent),
{
    let scheduler = AnimationScheduler::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    scheduler.start(key, config, move |event| {
        let _ = tx.send(event);
    });

    let deadline = time::sleep(duration);
    tokio::pin!(deadline);

    let mut events = Vec::new();
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = rx.recv() => {
                let Some(event) = event else { break };
                on_event(&event);
                let done = matches!(event, TickEvent::Completed { .. });
                events.push(event);
                if done {
                    break;
                }
            }
        }
    }

    scheduler.stop_all();
    events
}
