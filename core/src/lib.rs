pub mod action;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod connection;
pub mod game;
pub mod gesture;
pub mod grid;
pub mod host;
pub mod layout;
pub mod motion;
pub mod partners;
pub mod placement;
pub mod progress;
pub mod session;
pub mod settle;
pub mod snapshot;
pub mod state;

pub use action::{SessionAction, SessionEvent};
pub use catalog::{layout_by_slug, LayoutCatalogEntry, DEFAULT_LAYOUT_SLUG, LAYOUT_CATALOG};
pub use codec::{decode, decode_snapshot, encode, CodecError};
pub use config::{ConfigError, ScatterArea, SessionOptions};
pub use gesture::{Camera, Ray, Viewport};
pub use host::{PuzzleHost, SceneDescriptor};
pub use layout::{LayoutError, LayoutPiece, PuzzleLayout};
pub use motion::Highlight;
pub use placement::{generate_positions, Placement};
pub use progress::Progress;
pub use session::PuzzleSession;
pub use settle::{HoverLift, SettleStatus, SettleWatcher};
pub use snapshot::{PieceSnapshot, SessionSnapshot};
pub use state::{PieceGeometry, PieceId, PiecePhase, PieceState};
