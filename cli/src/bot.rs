use anyhow::{bail, Result};
use glam::{Vec2, Vec3};
use kumitate_core::action::SessionEvent;
use kumitate_core::config::SessionOptions;
use kumitate_core::gesture::{Camera, Viewport};
use kumitate_core::progress::Progress;
use kumitate_core::session::PuzzleSession;
use kumitate_core::settle::{SettleStatus, SettleWatcher};
use kumitate_core::state::{PieceGeometry, PieceId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::{resolve_seed, LayoutArgs};

const FRAME_DT: f32 = 1.0 / 60.0;
const SETTLE_FRAMES_AFTER_DROP: u32 = 30;
const OVERVIEW_EYE: Vec3 = Vec3::new(0.0, 24.0, 18.0);
const OVERVIEW_TARGET: Vec3 = Vec3::new(0.0, 0.0, 5.0);

#[derive(clap::Args, Clone, Debug)]
pub(super) struct PlayArgs {
    #[command(flatten)]
    layout: LayoutArgs,
    #[arg(long, env = "KUMITATE_SEED")]
    seed: Option<String>,
    #[arg(long, default_value_t = 500)]
    max_drags: u32,
    #[arg(long, default_value_t = 1280.0)]
    viewport_width: f32,
    #[arg(long, default_value_t = 720.0)]
    viewport_height: f32,
    /// Pointer noise added to every drop, in pixels.
    #[arg(long, default_value_t = 2.0)]
    jitter_px: f32,
    /// Pointer moves reported per drag.
    #[arg(long, default_value_t = 8)]
    move_steps: u32,
}

#[derive(Clone, Copy, Debug)]
struct BotConfig {
    max_drags: u32,
    viewport: Viewport,
    jitter_px: f32,
    move_steps: u32,
}

#[derive(Clone, Debug, Default)]
struct BotReport {
    drags: u32,
    snaps: u32,
    settle_frames: u32,
    completed_events: u32,
    progress: Progress,
}

#[derive(Clone, Debug)]
struct DragPlan {
    piece: PieceId,
    target: Vec3,
}

pub(super) fn run(args: PlayArgs) -> Result<()> {
    let config = BotConfig {
        max_drags: args.max_drags,
        viewport: Viewport::new(args.viewport_width, args.viewport_height),
        jitter_px: args.jitter_px,
        move_steps: args.move_steps,
    };
    validate_bot_config(config)?;
    let layout = args.layout.resolve()?;
    let seed = resolve_seed(args.seed.as_deref())?;
    info!(layout = %layout.name, seed, "bot starting");

    let report = play(layout.geometries(), layout.options, config, seed);
    println!(
        "layout: {} seed: {seed:#x} drags: {} snaps: {} settle_frames: {} progress: {}",
        layout.name, report.drags, report.snaps, report.settle_frames, report.progress
    );
    if !report.progress.completed {
        bail!("bot gave up after {} drags", report.drags);
    }
    Ok(())
}

fn validate_bot_config(config: BotConfig) -> Result<()> {
    let Viewport { width, height } = config.viewport;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        bail!("viewport must have a positive size");
    }
    if !(config.jitter_px.is_finite() && config.jitter_px >= 0.0) {
        bail!("jitter-px must be a non-negative number");
    }
    if config.move_steps == 0 {
        bail!("move-steps must be at least 1");
    }
    Ok(())
}

fn overview_camera(aspect: f32) -> Camera {
    Camera::perspective_look_at(OVERVIEW_EYE, OVERVIEW_TARGET, 50.0, aspect, 0.1, 1000.0)
}

fn play(
    geometries: Vec<PieceGeometry>,
    options: SessionOptions,
    config: BotConfig,
    seed: u64,
) -> BotReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = PuzzleSession::with_rng(geometries, options, &mut rng);
    let camera = overview_camera(config.viewport.aspect());
    let mut report = BotReport::default();

    if !session.interaction_enabled() {
        report.settle_frames = wait_for_settle(&mut session);
        session.enable_interaction();
    }
    collect_events(&mut session, &mut report);

    for _ in 0..config.max_drags {
        if session.is_completed() {
            break;
        }
        let Some(plan) = choose_drag(&session, &mut rng) else {
            debug!("no loose piece with partners left");
            break;
        };
        if drag_piece(&mut session, &camera, config, &plan, &mut rng) {
            report.drags += 1;
        }
        for _ in 0..SETTLE_FRAMES_AFTER_DROP {
            session.tick(FRAME_DT);
        }
        collect_events(&mut session, &mut report);
    }
    report.progress = session.progress();
    report
}

fn wait_for_settle(session: &mut PuzzleSession) -> u32 {
    let mut watcher = SettleWatcher::new();
    let mut frames = 0;
    loop {
        session.tick(FRAME_DT);
        frames += 1;
        let positions: Vec<Vec3> = session
            .pieces()
            .iter()
            .map(|piece| piece.display_position)
            .collect();
        if watcher.observe(&positions, FRAME_DT) == SettleStatus::Settled {
            debug!(frames, "scatter settled");
            return frames;
        }
    }
}

fn choose_drag(session: &PuzzleSession, rng: &mut StdRng) -> Option<DragPlan> {
    let candidates: Vec<usize> = session
        .pieces()
        .iter()
        .enumerate()
        .filter(|(index, piece)| {
            !piece.is_connected && !session.partner_indices()[*index].is_empty()
        })
        .map(|(index, _)| index)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let index = candidates[rng.random_range(0..candidates.len())];
    let partners = &session.partner_indices()[index];
    let partner = partners[rng.random_range(0..partners.len())];
    Some(DragPlan {
        piece: session.pieces()[index].id.clone(),
        target: session.pieces()[partner].current_position,
    })
}

fn drag_piece(
    session: &mut PuzzleSession,
    camera: &Camera,
    config: BotConfig,
    plan: &DragPlan,
    rng: &mut StdRng,
) -> bool {
    let Some(start) = session.piece(&plan.piece).map(|piece| piece.current_position) else {
        return false;
    };
    let (Some(from), Some(to)) = (
        pointer_for(camera, config.viewport, start),
        pointer_for(camera, config.viewport, plan.target),
    ) else {
        debug!(piece = %plan.piece, "drag target is behind the camera");
        return false;
    };
    let to = to + jitter(rng, config.jitter_px);

    if !session.on_drag_start(&plan.piece) {
        return false;
    }
    for step in 1..=config.move_steps {
        let t = step as f32 / config.move_steps as f32;
        let pointer = from.lerp(to, t);
        let ndc = config.viewport.pointer_to_ndc(pointer.x, pointer.y);
        session.on_drag_move(&plan.piece, ndc, camera);
        session.tick(FRAME_DT);
    }
    session.on_drag_end(&plan.piece)
}

fn pointer_for(camera: &Camera, viewport: Viewport, point: Vec3) -> Option<Vec2> {
    let ndc = camera.world_to_ndc(point)?;
    Some(viewport.ndc_to_pointer(ndc.truncate()))
}

fn jitter(rng: &mut StdRng, jitter_px: f32) -> Vec2 {
    if jitter_px <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-jitter_px..=jitter_px),
        rng.random_range(-jitter_px..=jitter_px),
    )
}

fn collect_events(session: &mut PuzzleSession, report: &mut BotReport) {
    for event in session.drain_events() {
        match event {
            SessionEvent::Snapped { pieces } => {
                report.snaps += 1;
                let ids: Vec<&str> = pieces.iter().map(PieceId::as_str).collect();
                info!(pieces = %ids.join(","), "snap");
            }
            SessionEvent::Progress(progress) => {
                debug!(%progress, remaining = progress.remaining(), "progress");
                report.progress = progress;
            }
            SessionEvent::Completed => {
                report.completed_events += 1;
                info!("puzzle completed");
            }
        }
    }
}
