use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use glide_core::{AppConfig, EnvMotionQuery, MotionPreference};
use glide_motion::scroll::ScrollConfigExt;
use glide_motion::{FrameLoop, FrameSnapshot, MotionRuntime, RuntimeCommand, TransitionEvent};

use crate::scenario::Scenario;
use crate::site::default_site;

pub struct Options {
    pub scenario: Option<PathBuf>,
    pub reduced: bool,
    pub json: bool,
    pub every_frame: bool,
}

pub async fn run(mut config: AppConfig, options: Options) -> Result<()> {
    let scenario = match &options.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("Failed to load scenario {}", path.display()))?,
        None => Scenario::burst(),
    };
    if options.reduced {
        config.motion.force_reduced = Some(true);
    }

    let motion = MotionPreference::from_config(&config.motion, &EnvMotionQuery::default());
    let content = scenario.content(default_site());
    let runtime = MotionRuntime::new(&config, motion, Box::new(content));

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let (frame_loop, commands) = FrameLoop::new(runtime, config.scroll.animation_tick_duration());
    let frame_loop = frame_loop.with_frame_sender(frame_tx);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Setup signal handler for early shutdown
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received interrupt, stopping simulation");
        let _ = shutdown_tx_clone.send(true);
    });

    if !options.json {
        println!(
            "Simulating \"{}\" for {}ms ({} steps)",
            scenario.name,
            scenario.duration().as_millis(),
            scenario.steps.len()
        );
    }

    let loop_handle = tokio::spawn(frame_loop.run(shutdown_rx));

    let json = options.json;
    let every_frame = options.every_frame;
    let printer = tokio::spawn(async move {
        while let Some(frame) = frame_rx.recv().await {
            if every_frame || !frame.events.is_empty() {
                print_frame(&frame, json);
            }
        }
    });

    let started = Instant::now();
    commands.send(RuntimeCommand::Viewport(scenario.viewport_height))?;
    for step in &scenario.steps {
        sleep_until(started + std::time::Duration::from_millis(step.at_ms)).await;
        debug!("Step at {}ms: {:?}", step.at_ms, step.action);
        if commands.send(step.action.clone().into()).is_err() {
            break;
        }
    }
    sleep_until(started + scenario.duration()).await;
    let _ = shutdown_tx.send(true);

    let last = loop_handle.await.context("Frame loop task failed")?;
    printer.await.context("Frame printer task failed")?;
    print_summary(&last, json)?;
    Ok(())
}

fn print_frame(frame: &FrameSnapshot, json: bool) {
    if json {
        match frame.to_json() {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to encode frame: {}", e),
        }
        return;
    }

    for event in &frame.events {
        let line = match event {
            TransitionEvent::ExitStarted { from } => format!("exit started from {}", from),
            TransitionEvent::Swapped { from, to } => format!("swapped {} -> {}", from, to),
            TransitionEvent::EnterStarted { view } => format!("enter started on {}", view),
            TransitionEvent::Settled { view } => format!("settled on {}", view),
        };
        println!("[{:>6}ms] {}", frame.at_ms, line);
    }
    if frame.events.is_empty() {
        println!(
            "[{:>6}ms] {:?} scroll={:.1} visible={}/{}",
            frame.at_ms,
            frame.transition.phase,
            frame.scroll.current_offset,
            frame.visible_regions(),
            frame.regions.len()
        );
    }
}

fn print_summary(last: &FrameSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", last.to_json()?);
        return Ok(());
    }

    println!();
    println!("Final view: {} ({:?})", last.view, last.page);
    println!("  Scroll offset: {:.1}", last.scroll.current_offset);
    println!(
        "  Regions visible: {}/{}",
        last.visible_regions(),
        last.regions.len()
    );
    for region in &last.regions {
        let state = match (region.reveal.visible, region.reveal.active) {
            (true, true) => "active",
            (true, false) => "waiting",
            _ => "hidden",
        };
        println!("    {:<14} {}", region.id, state);
    }
    match &last.ambient {
        Some(ambient) => println!("  Ambient phase: {:.5}", ambient.phase),
        None => println!("  Ambient: off"),
    }
    Ok(())
}
