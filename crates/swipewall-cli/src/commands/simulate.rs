use std::time::Duration;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{sleep, Instant};

use swipewall_core::sync::lock;
use swipewall_core::{AppConfig, Engine, RecordingSurface, TouchEvent};

/// Time the engine gets to settle one swipe
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);
/// Duration of a scripted swipe, in event time
const SWIPE_DURATION_MS: u64 = 50;
/// Event-time gap between swipes
const SWIPE_SPACING_MS: u64 = 1000;
/// Horizontal travel of a swipe as a fraction of the width
const SWIPE_TRAVEL: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwipeDirection {
    /// Finger moves left, towards the next page
    Left,
    /// Finger moves right, towards the previous page
    Right,
}

pub struct SimulateOptions {
    pub direction: SwipeDirection,
    pub count: u32,
    pub width: u32,
    pub height: u32,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record {
    Offset {
        swipe: u32,
        x_offset: f32,
    },
    Swipe {
        swipe: u32,
        decision: String,
        x_offset: f32,
        touch_offset_px: f32,
    },
    Done {
        frames_drawn: u64,
        frames_posted: usize,
    },
}

fn emit(record: &Record, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(record)?);
        return Ok(());
    }
    match record {
        Record::Offset { x_offset, .. } => println!("    offset {:.4}", x_offset),
        Record::Swipe {
            swipe,
            decision,
            x_offset,
            touch_offset_px,
        } => println!(
            "swipe {}: {} -> offset {:.4} ({:.0} px)",
            swipe, decision, x_offset, touch_offset_px
        ),
        Record::Done {
            frames_drawn,
            frames_posted,
        } => println!("{} frames drawn, {} posted", frames_drawn, frames_posted),
    }
    Ok(())
}

/// Single-pointer swipe starting at `start_ms` in event time
fn swipe_events(direction: SwipeDirection, width: u32, height: u32, start_ms: u64) -> Vec<TouchEvent> {
    let travel = width as f32 * SWIPE_TRAVEL;
    let from = width as f32 / 2.0;
    let to = match direction {
        SwipeDirection::Left => from - travel,
        SwipeDirection::Right => from + travel,
    };
    let y = height as f32 / 2.0;
    let mid = (from + to) / 2.0;
    let end_ms = start_ms + SWIPE_DURATION_MS;

    vec![
        TouchEvent::down(from, y, start_ms),
        TouchEvent::moved(mid, y, start_ms + SWIPE_DURATION_MS / 2),
        TouchEvent::moved(to, y, end_ms),
        TouchEvent::up(to, y, end_ms),
    ]
}

/// Print offsets until the settle animation is over
async fn settle(
    engine: &Engine,
    offsets: &mut watch::Receiver<f32>,
    swipe: u32,
    poll: Duration,
    json: bool,
) -> Result<()> {
    let tracker = engine.tracker();
    let deadline = Instant::now() + SETTLE_TIMEOUT;

    loop {
        let animating = lock(&tracker).is_animating();
        if offsets.has_changed()? {
            let x_offset = *offsets.borrow_and_update();
            emit(&Record::Offset { swipe, x_offset }, json)?;
        }
        if !animating {
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!("Swipe {} did not settle within {:?}", swipe, SETTLE_TIMEOUT);
        }
        sleep(poll).await;
    }
}

pub async fn run(config: &AppConfig, options: &SimulateOptions) -> Result<()> {
    let surface = RecordingSurface::new(options.width, options.height);
    let engine = Engine::create(config, surface.clone());
    engine.on_surface_changed(options.width, options.height);
    engine.on_visibility_changed(true);

    let mut offsets = engine.subscribe_offsets();
    let poll = config.loops.period();

    for swipe in 1..=options.count {
        let start_ms = u64::from(swipe) * SWIPE_SPACING_MS;
        for event in swipe_events(options.direction, options.width, options.height, start_ms) {
            engine.on_touch_event(&event);
        }
        settle(&engine, &mut offsets, swipe, poll, options.json).await?;

        let tracker = engine.tracker();
        let tracker = lock(&tracker);
        let decision = tracker
            .last_decision()
            .map(|d| format!("{:?}", d))
            .unwrap_or_else(|| "none".to_string());
        let record = Record::Swipe {
            swipe,
            decision,
            x_offset: tracker.normalized_offset(),
            touch_offset_px: tracker.touch_offset_px(),
        };
        drop(tracker);
        emit(&record, options.json)?;
    }

    // Let the render loop catch up with the final offset
    sleep(poll * 2).await;
    let frames_drawn = engine.frames_drawn();
    engine.destroy().await?;

    emit(
        &Record::Done {
            frames_drawn,
            frames_posted: surface.frames_posted(),
        },
        options.json,
    )
}
