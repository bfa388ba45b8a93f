use rand::Rng;
use tracing::info;

use crate::action::{SessionAction, SessionEvent};
use crate::config::SessionOptions;
use crate::progress::Progress;
use crate::session::PuzzleSession;
use crate::state::PieceGeometry;

#[derive(Debug, Clone)]
pub struct SceneDescriptor {
    pub puzzle_id: String,
    pub pieces: Vec<PieceGeometry>,
    pub options: SessionOptions,
}

impl SceneDescriptor {
    pub fn new(puzzle_id: impl Into<String>, pieces: Vec<PieceGeometry>) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            pieces,
            options: SessionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Default)]
pub struct PuzzleHost {
    current: Option<(String, PuzzleSession)>,
}

impl PuzzleHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, descriptor: SceneDescriptor) -> bool {
        self.load_with_rng(descriptor, &mut rand::rng())
    }

    pub fn load_with_rng<R: Rng + ?Sized>(
        &mut self,
        descriptor: SceneDescriptor,
        rng: &mut R,
    ) -> bool {
        if self.puzzle_id() == Some(descriptor.puzzle_id.as_str()) {
            return false;
        }
        if let Some((previous, _)) = &self.current {
            info!(previous = %previous, next = %descriptor.puzzle_id, "replacing puzzle session");
        }
        let session = PuzzleSession::with_rng(descriptor.pieces, descriptor.options, rng);
        self.current = Some((descriptor.puzzle_id, session));
        true
    }

    pub fn unload(&mut self) {
        if let Some((previous, _)) = self.current.take() {
            info!(puzzle = %previous, "puzzle session discarded");
        }
    }

    pub fn puzzle_id(&self) -> Option<&str> {
        self.current.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn session(&self) -> Option<&PuzzleSession> {
        self.current.as_ref().map(|(_, session)| session)
    }

    pub fn session_mut(&mut self) -> Option<&mut PuzzleSession> {
        self.current.as_mut().map(|(_, session)| session)
    }

    pub fn apply(&mut self, action: SessionAction) -> bool {
        self.session_mut()
            .map(|session| session.apply_action(action))
            .unwrap_or(false)
    }

    pub fn progress(&self) -> Progress {
        self.session().map(PuzzleSession::progress).unwrap_or_default()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.session_mut()
            .map(PuzzleSession::drain_events)
            .unwrap_or_default()
    }
}
