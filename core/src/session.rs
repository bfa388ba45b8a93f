use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::action::{SessionAction, SessionEvent};
use crate::config::SessionOptions;
use crate::connection::{
    clear_just_connected, evaluate_release, is_near, near_flags, HighlightTimer,
};
use crate::game::sanitize_dt;
use crate::gesture::Camera;
use crate::motion::{self, highlight_for, Highlight};
use crate::partners::{partner_pairs, resolve_partners};
use crate::placement::generate_positions;
use crate::progress::Progress;
use crate::snapshot::{PieceSnapshot, SessionSnapshot, SESSION_SNAPSHOT_VERSION};
use crate::state::{PieceGeometry, PieceId, PiecePhase, PieceState};

#[derive(Clone, Copy, Debug)]
struct ActiveDrag {
    index: usize,
    start_position: Vec3,
}

#[derive(Debug)]
pub struct PuzzleSession {
    pieces: Vec<PieceState>,
    partners: Vec<Vec<usize>>,
    index_of: HashMap<PieceId, usize>,
    options: SessionOptions,
    active_drag: Option<ActiveDrag>,
    highlight: HighlightTimer,
    completed: bool,
    interaction_enabled: bool,
    events: Vec<SessionEvent>,
}

impl PuzzleSession {
    pub fn new(geometries: Vec<PieceGeometry>, options: SessionOptions) -> Self {
        Self::with_rng(geometries, options, &mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        geometries: Vec<PieceGeometry>,
        options: SessionOptions,
        rng: &mut R,
    ) -> Self {
        let options = options.sanitized();
        let geometries = dedup_geometries(geometries);
        let placement = generate_positions(
            geometries.len(),
            options.min_separation,
            options.scatter_area,
            rng,
        );
        Self::build(geometries, options, placement.positions)
    }

    pub fn with_scatter(
        geometries: Vec<PieceGeometry>,
        options: SessionOptions,
        positions: Vec<Vec3>,
    ) -> Self {
        let options = options.sanitized();
        let geometries = dedup_geometries(geometries);
        if positions.len() != geometries.len() || positions.iter().any(|pos| !pos.is_finite()) {
            warn!(
                pieces = geometries.len(),
                positions = positions.len(),
                "scatter positions do not match pieces, generating new ones"
            );
            let placement = generate_positions(
                geometries.len(),
                options.min_separation,
                options.scatter_area,
                &mut rand::rng(),
            );
            return Self::build(geometries, options, placement.positions);
        }
        Self::build(geometries, options, positions)
    }

    fn build(
        geometries: Vec<PieceGeometry>,
        options: SessionOptions,
        positions: Vec<Vec3>,
    ) -> Self {
        let partners = resolve_partners(&geometries, options.adjacency_factor);
        let pieces: Vec<PieceState> = geometries
            .iter()
            .zip(positions)
            .zip(partners.iter())
            .map(|((geometry, position), list)| {
                let ids = list.iter().map(|&other| geometries[other].id.clone()).collect();
                PieceState::scattered(geometry, position, ids)
            })
            .collect();
        let index_of = pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| (piece.id.clone(), index))
            .collect();
        info!(
            pieces = pieces.len(),
            partner_pairs = partner_pairs(&partners).len(),
            "puzzle session created"
        );
        let mut session = Self {
            pieces,
            partners,
            index_of,
            options,
            active_drag: None,
            highlight: HighlightTimer::default(),
            completed: false,
            interaction_enabled: !options.require_settle,
            events: Vec::new(),
        };
        let progress = session.progress();
        session.events.push(SessionEvent::Progress(progress));
        session
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn pieces(&self) -> &[PieceState] {
        &self.pieces
    }

    pub fn piece(&self, id: &PieceId) -> Option<&PieceState> {
        self.index_of.get(id).map(|&index| &self.pieces[index])
    }

    pub fn index_of(&self, id: &PieceId) -> Option<usize> {
        self.index_of.get(id).copied()
    }

    pub fn partner_indices(&self) -> &[Vec<usize>] {
        &self.partners
    }

    pub fn progress(&self) -> Progress {
        Progress::from_pieces(&self.pieces)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub fn enable_interaction(&mut self) {
        if !self.interaction_enabled {
            debug!("interaction enabled");
        }
        self.interaction_enabled = true;
    }

    pub fn dragging(&self) -> Option<&PieceId> {
        self.active_drag.map(|drag| &self.pieces[drag.index].id)
    }

    pub fn drag_origin(&self) -> Option<Vec3> {
        self.active_drag.map(|drag| drag.start_position)
    }

    pub fn is_near_partner(&self, id: &PieceId) -> bool {
        self.index_of(id)
            .map(|index| is_near(&self.pieces, &self.partners, index, self.options.near_threshold))
            .unwrap_or(false)
    }

    pub fn phase(&self, id: &PieceId) -> Option<PiecePhase> {
        let index = self.index_of(id)?;
        let piece = &self.pieces[index];
        let phase = if piece.is_connected {
            PiecePhase::Connected
        } else if piece.is_dragging {
            PiecePhase::Dragging
        } else if is_near(&self.pieces, &self.partners, index, self.options.near_threshold) {
            PiecePhase::Near
        } else {
            PiecePhase::Scattered
        };
        Some(phase)
    }

    pub fn highlight(&self, id: &PieceId) -> Option<Highlight> {
        let index = self.index_of(id)?;
        let near = is_near(&self.pieces, &self.partners, index, self.options.near_threshold);
        Some(highlight_for(&self.pieces[index], near))
    }

    pub fn highlight_pending(&self) -> bool {
        self.highlight.is_armed()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn on_drag_start(&mut self, id: &PieceId) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(piece = %id, "drag start for unknown piece");
            return false;
        };
        if !self.interaction_enabled {
            debug!(piece = %id, "drag start before interaction is enabled");
            return false;
        }
        if let Some(active) = self.active_drag {
            debug!(
                piece = %id,
                active = %self.pieces[active.index].id,
                "drag start while another piece is dragging"
            );
            return false;
        }
        let piece = &mut self.pieces[index];
        if piece.is_connected {
            debug!(piece = %id, "drag start on connected piece");
            return false;
        }
        piece.is_dragging = true;
        self.active_drag = Some(ActiveDrag {
            index,
            start_position: piece.current_position,
        });
        true
    }

    pub fn on_drag_move(&mut self, id: &PieceId, ndc: Vec2, camera: &Camera) -> bool {
        let Some(index) = self.active_index_for(id) else {
            return false;
        };
        let Some(hit) = camera.ground_point_at(ndc) else {
            return false;
        };
        self.pieces[index].current_position = hit;
        true
    }

    pub fn on_drag_end(&mut self, id: &PieceId) -> bool {
        let Some(index) = self.active_index_for(id) else {
            debug!(piece = %id, "drag end without a matching drag start");
            return false;
        };
        self.active_drag = None;
        self.pieces[index].is_dragging = false;
        clear_just_connected(&mut self.pieces);
        self.highlight.disarm();

        let touched = evaluate_release(
            &mut self.pieces,
            &self.partners,
            index,
            self.options.snap_threshold,
        );
        if !touched.is_empty() {
            let ids: Vec<PieceId> = touched
                .iter()
                .map(|&other| self.pieces[other].id.clone())
                .collect();
            self.highlight.arm(self.options.connection_highlight_duration_ms);
            info!(piece = %id, connected = ids.len(), "pieces snapped");
            self.events.push(SessionEvent::Snapped { pieces: ids });
        }
        let progress = self.progress();
        self.events.push(SessionEvent::Progress(progress));
        if progress.completed && !self.completed {
            self.completed = true;
            info!(pieces = progress.total_pieces, "puzzle completed");
            self.events.push(SessionEvent::Completed);
        }
        true
    }

    pub fn tick(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);
        if self.highlight.advance(dt * 1000.0) {
            clear_just_connected(&mut self.pieces);
        }
        let near = near_flags(&self.pieces, &self.partners, self.options.near_threshold);
        motion::step(&mut self.pieces, &near, dt);
    }

    pub fn apply_action(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::DragStart { piece_id } => self.on_drag_start(&piece_id),
            SessionAction::DragMove {
                piece_id,
                ndc,
                camera,
            } => self.on_drag_move(&piece_id, ndc, &camera),
            SessionAction::DragEnd { piece_id } => self.on_drag_end(&piece_id),
            SessionAction::Tick { dt } => {
                self.tick(dt);
                true
            }
            SessionAction::EnableInteraction => {
                self.enable_interaction();
                true
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SESSION_SNAPSHOT_VERSION,
            interaction_enabled: self.interaction_enabled,
            pieces: self.pieces.iter().map(PieceSnapshot::from_piece).collect(),
            progress: self.progress().into(),
        }
    }

    fn active_index_for(&self, id: &PieceId) -> Option<usize> {
        let index = self.index_of(id)?;
        match self.active_drag {
            Some(drag) if drag.index == index => Some(index),
            _ => None,
        }
    }
}

fn dedup_geometries(geometries: Vec<PieceGeometry>) -> Vec<PieceGeometry> {
    let mut seen = HashSet::with_capacity(geometries.len());
    let mut unique = Vec::with_capacity(geometries.len());
    for geometry in geometries {
        if !seen.insert(geometry.id.clone()) {
            warn!(piece = %geometry.id, "duplicate piece id dropped");
            continue;
        }
        unique.push(geometry);
    }
    unique
}
