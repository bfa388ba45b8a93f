use approx::assert_abs_diff_eq;
use glam::{Mat4, Vec3};
use kumitate_core::action::{SessionAction, SessionEvent};
use kumitate_core::catalog::layout_by_slug;
use kumitate_core::config::SessionOptions;
use kumitate_core::gesture::Camera;
use kumitate_core::grid::reference_grid;
use kumitate_core::motion::Highlight;
use kumitate_core::progress::Progress;
use kumitate_core::session::PuzzleSession;
use kumitate_core::state::{PieceGeometry, PieceId, PiecePhase};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TILE: Vec3 = Vec3::new(1.0, 0.1, 1.0);

fn overview_camera() -> Camera {
    Camera::perspective_look_at(
        Vec3::new(0.0, 24.0, 18.0),
        Vec3::new(0.0, 0.0, 5.0),
        50.0,
        1.0,
        0.1,
        1000.0,
    )
}

fn pair() -> Vec<PieceGeometry> {
    layout_by_slug("pair").unwrap().geometries()
}

fn strip_of_three() -> Vec<PieceGeometry> {
    reference_grid(3, 1, 1.0, TILE)
}

fn id(value: &str) -> PieceId {
    PieceId::from(value)
}

fn drag_to(session: &mut PuzzleSession, piece: &str, target: Vec3) -> bool {
    let camera = overview_camera();
    let piece = id(piece);
    let ndc = camera.world_to_ndc(target).unwrap().truncate();
    session.on_drag_start(&piece)
        && session.on_drag_move(&piece, ndc, &camera)
        && session.on_drag_end(&piece)
}

fn pick_up_and_drop(session: &mut PuzzleSession, piece: &str) -> bool {
    let piece = id(piece);
    session.on_drag_start(&piece) && session.on_drag_end(&piece)
}

fn loose_pair() -> PuzzleSession {
    PuzzleSession::with_scatter(
        pair(),
        SessionOptions::default(),
        vec![Vec3::new(-4.0, 0.0, 3.0), Vec3::new(4.0, 0.0, 3.0)],
    )
}

#[test]
fn pair_connects_when_dropped_on_partner() {
    let mut session = loose_pair();
    assert_eq!(
        session.drain_events(),
        vec![SessionEvent::Progress(Progress {
            connected_count: 0,
            total_pieces: 2,
            completed: false,
        })]
    );

    assert!(drag_to(&mut session, "left", Vec3::new(4.3, 0.0, 3.0)));

    let left = session.piece(&id("left")).unwrap();
    let right = session.piece(&id("right")).unwrap();
    assert!(left.is_connected && right.is_connected);
    assert_eq!(left.current_position, Vec3::new(-0.5, 0.0, 0.0));
    assert_eq!(right.current_position, Vec3::new(0.5, 0.0, 0.0));
    assert!(left.is_pinned() && right.is_pinned());
    assert!(session.is_completed());
    assert_eq!(
        session.drain_events(),
        vec![
            SessionEvent::Snapped {
                pieces: vec![id("left"), id("right")],
            },
            SessionEvent::Progress(Progress {
                connected_count: 2,
                total_pieces: 2,
                completed: true,
            }),
            SessionEvent::Completed,
        ]
    );
}

#[test]
fn drop_exactly_at_snap_threshold_stays_loose() {
    let mut session = PuzzleSession::with_scatter(
        pair(),
        SessionOptions::default(),
        vec![Vec3::new(3.0, 0.0, 3.0), Vec3::new(4.0, 0.0, 3.0)],
    );
    session.drain_events();

    assert!(pick_up_and_drop(&mut session, "left"));

    assert_eq!(session.progress().connected_count, 0);
    assert!(!session.piece(&id("left")).unwrap().is_connected);
    assert_eq!(
        session.piece(&id("left")).unwrap().current_position,
        Vec3::new(3.0, 0.0, 3.0)
    );
    assert!(session
        .drain_events()
        .iter()
        .all(|event| !matches!(event, SessionEvent::Snapped { .. })));
}

#[test]
fn drop_just_inside_snap_threshold_connects() {
    let mut session = PuzzleSession::with_scatter(
        pair(),
        SessionOptions::default(),
        vec![Vec3::new(3.01, 0.0, 3.0), Vec3::new(4.0, 0.0, 3.0)],
    );
    assert!(pick_up_and_drop(&mut session, "left"));
    assert_eq!(session.progress().connected_count, 2);
}

#[test]
fn connected_piece_cannot_be_dragged() {
    let mut session = loose_pair();
    assert!(drag_to(&mut session, "left", Vec3::new(4.0, 0.0, 3.5)));

    assert!(!session.on_drag_start(&id("left")));
    assert!(!session.on_drag_start(&id("right")));
    assert_eq!(session.dragging(), None);
    assert_eq!(session.phase(&id("left")), Some(PiecePhase::Connected));
}

#[test]
fn unknown_ids_are_ignored() {
    let mut session = loose_pair();
    let ghost = id("ghost");
    assert!(!session.on_drag_start(&ghost));
    assert!(!session.on_drag_move(&ghost, glam::Vec2::ZERO, &overview_camera()));
    assert!(!session.on_drag_end(&ghost));
    assert_eq!(session.phase(&ghost), None);
    assert_eq!(session.highlight(&ghost), None);
}

#[test]
fn only_one_piece_drags_at_a_time() {
    let mut session = loose_pair();
    assert!(session.on_drag_start(&id("left")));
    assert!(!session.on_drag_start(&id("right")));
    assert!(!session.on_drag_end(&id("right")));
    assert_eq!(session.dragging(), Some(&id("left")));
    assert_eq!(session.drag_origin(), Some(Vec3::new(-4.0, 0.0, 3.0)));
    assert!(session.on_drag_end(&id("left")));
    assert_eq!(session.dragging(), None);
}

#[test]
fn drag_end_without_start_is_a_no_op() {
    let mut session = loose_pair();
    session.drain_events();
    assert!(!session.on_drag_end(&id("left")));
    assert!(session.drain_events().is_empty());
}

#[test]
fn ray_missing_the_ground_keeps_last_position() {
    let mut session = loose_pair();
    assert!(session.on_drag_start(&id("left")));
    let flat = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY);
    assert!(!session.on_drag_move(&id("left"), glam::Vec2::ZERO, &flat));
    assert_eq!(
        session.piece(&id("left")).unwrap().current_position,
        Vec3::new(-4.0, 0.0, 3.0)
    );
}

#[test]
fn empty_session_is_never_complete() {
    let mut session = PuzzleSession::new(Vec::new(), SessionOptions::default());
    session.tick(1.0 / 60.0);
    assert_eq!(session.progress(), Progress::default());
    assert!(!session.is_completed());
    assert!(!session.progress().completed);
}

#[test]
fn progress_is_monotonic_and_connected_pieces_stay_pinned() {
    let pieces = reference_grid(3, 3, 1.0, TILE);
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = PuzzleSession::with_rng(pieces, SessionOptions::default(), &mut rng);
    let mut previous = 0;

    for _ in 0..30 {
        if session.is_completed() {
            break;
        }
        let loose = session
            .pieces()
            .iter()
            .position(|piece| !piece.is_connected)
            .unwrap();
        let partner = session.partner_indices()[loose][0];
        let target = session.pieces()[partner].current_position + Vec3::new(0.2, 0.0, 0.0);
        let name = session.pieces()[loose].id.as_str().to_string();
        assert!(drag_to(&mut session, &name, target));

        let progress = session.progress();
        assert!(progress.connected_count > previous);
        previous = progress.connected_count;
        for piece in session.pieces().iter().filter(|piece| piece.is_connected) {
            assert!(piece.is_pinned(), "{} drifted", piece.id);
        }
        session.tick(1.0 / 60.0);
    }

    assert!(session.is_completed());
    assert_eq!(session.progress().connected_count, 9);
    let completions = session
        .drain_events()
        .into_iter()
        .filter(|event| *event == SessionEvent::Completed)
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn release_connects_every_partner_in_range() {
    let mut session = PuzzleSession::with_scatter(
        strip_of_three(),
        SessionOptions::default(),
        vec![
            Vec3::new(-0.5, 0.0, 4.0),
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(0.5, 0.0, 4.0),
        ],
    );
    session.drain_events();

    assert!(pick_up_and_drop(&mut session, "piece-0-1"));

    assert!(session.is_completed());
    assert_eq!(
        session.drain_events()[0],
        SessionEvent::Snapped {
            pieces: vec![id("piece-0-1"), id("piece-0-0"), id("piece-0-2")],
        }
    );
}

#[test]
fn loose_piece_joins_connected_partner_and_completes_once() {
    let mut session = PuzzleSession::with_scatter(
        strip_of_three(),
        SessionOptions::default(),
        vec![
            Vec3::new(-6.0, 0.0, 8.0),
            Vec3::new(0.0, 0.0, 8.0),
            Vec3::new(6.0, 0.0, 8.0),
        ],
    );
    assert!(drag_to(&mut session, "piece-0-0", Vec3::new(0.4, 0.0, 8.0)));
    assert_eq!(session.progress().connected_count, 2);
    assert!(!session.is_completed());

    assert!(drag_to(&mut session, "piece-0-2", Vec3::new(0.3, 0.0, 0.2)));
    assert!(session.is_completed());
    assert_eq!(
        session.piece(&id("piece-0-2")).unwrap().current_position,
        Vec3::new(1.0, 0.0, 0.0)
    );

    let completions = session
        .drain_events()
        .into_iter()
        .filter(|event| *event == SessionEvent::Completed)
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn next_release_clears_earlier_highlight() {
    let mut session = PuzzleSession::with_scatter(
        strip_of_three(),
        SessionOptions::default(),
        vec![
            Vec3::new(-6.0, 0.0, 8.0),
            Vec3::new(0.0, 0.0, 8.0),
            Vec3::new(6.0, 0.0, 8.0),
        ],
    );
    assert!(drag_to(&mut session, "piece-0-0", Vec3::new(0.4, 0.0, 8.0)));
    assert!(session.piece(&id("piece-0-1")).unwrap().just_connected);

    assert!(pick_up_and_drop(&mut session, "piece-0-2"));

    assert!(session.pieces().iter().all(|piece| !piece.just_connected));
    assert!(!session.highlight_pending());
}

#[test]
fn highlight_expires_after_its_duration() {
    let mut session = loose_pair();
    assert!(drag_to(&mut session, "left", Vec3::new(4.2, 0.0, 3.0)));
    assert_eq!(session.highlight(&id("left")), Some(Highlight::JustConnected));
    assert!(session.highlight_pending());

    session.tick(0.3);
    assert!(session.piece(&id("right")).unwrap().just_connected);

    session.tick(0.25);
    assert!(session.pieces().iter().all(|piece| !piece.just_connected));
    assert!(!session.highlight_pending());
    assert_eq!(session.highlight(&id("left")), Some(Highlight::Connected));
}

#[test]
fn pieces_close_to_a_partner_are_near() {
    let mut session = PuzzleSession::with_scatter(
        pair(),
        SessionOptions::default(),
        vec![Vec3::new(3.0, 0.0, 3.0), Vec3::new(4.2, 0.0, 3.0)],
    );
    assert_eq!(session.phase(&id("left")), Some(PiecePhase::Near));
    assert_eq!(session.highlight(&id("right")), Some(Highlight::Near));
    assert!(session.is_near_partner(&id("left")));

    assert!(session.on_drag_start(&id("left")));
    assert_eq!(session.phase(&id("left")), Some(PiecePhase::Dragging));
}

#[test]
fn far_apart_pieces_are_scattered() {
    let session = loose_pair();
    assert_eq!(session.phase(&id("left")), Some(PiecePhase::Scattered));
    assert_eq!(session.highlight(&id("left")), Some(Highlight::None));
}

#[test]
fn tick_eases_display_toward_logical_position() {
    let mut session = loose_pair();
    assert!(drag_to(&mut session, "left", Vec3::new(4.3, 0.0, 3.0)));

    session.tick(1.0 / 60.0);
    let left = session.piece(&id("left")).unwrap();
    assert_abs_diff_eq!(left.display_position.x, -3.3, epsilon = 1.0e-3);
    assert_abs_diff_eq!(left.display_position.z, 2.4, epsilon = 1.0e-3);
    assert_abs_diff_eq!(left.scale, 1.025, epsilon = 1.0e-3);

    for _ in 0..300 {
        session.tick(1.0 / 60.0);
    }
    let left = session.piece(&id("left")).unwrap();
    assert_abs_diff_eq!(left.display_position.x, -0.5, epsilon = 1.0e-3);
    assert_abs_diff_eq!(left.display_position.z, 0.0, epsilon = 1.0e-3);
    assert_abs_diff_eq!(left.scale, 1.0, epsilon = 1.0e-3);
}

#[test]
fn dragged_piece_follows_pointer_exactly() {
    let mut session = loose_pair();
    let camera = overview_camera();
    let target = Vec3::new(0.0, 0.0, 10.0);
    let ndc = camera.world_to_ndc(target).unwrap().truncate();
    assert!(session.on_drag_start(&id("left")));
    assert!(session.on_drag_move(&id("left"), ndc, &camera));
    session.tick(1.0 / 60.0);

    let left = session.piece(&id("left")).unwrap();
    assert_eq!(left.display_position, left.current_position);
    assert_abs_diff_eq!(left.current_position.z, 10.0, epsilon = 1.0e-3);
    assert_eq!(left.current_position.y, 0.0);
}

#[test]
fn interaction_waits_for_the_gate() {
    let options = SessionOptions {
        require_settle: true,
        ..SessionOptions::default()
    };
    let mut session = PuzzleSession::with_scatter(
        pair(),
        options,
        vec![Vec3::new(-4.0, 0.0, 3.0), Vec3::new(4.0, 0.0, 3.0)],
    );
    assert!(!session.interaction_enabled());
    assert!(!session.on_drag_start(&id("left")));

    session.enable_interaction();
    assert!(session.on_drag_start(&id("left")));
}

#[test]
fn duplicate_ids_keep_the_first_piece() {
    let pieces = vec![
        PieceGeometry::new("a", Vec3::ZERO, TILE),
        PieceGeometry::new("a", Vec3::new(5.0, 0.0, 0.0), TILE),
        PieceGeometry::new("b", Vec3::new(1.0, 0.0, 0.0), TILE),
    ];
    let session = PuzzleSession::new(pieces, SessionOptions::default());
    assert_eq!(session.pieces().len(), 2);
    assert_eq!(session.piece(&id("a")).unwrap().reference_position, Vec3::ZERO);
    assert_eq!(session.piece(&id("a")).unwrap().partners, vec![id("b")]);
}

#[test]
fn mismatched_scatter_is_regenerated() {
    let session = PuzzleSession::with_scatter(pair(), SessionOptions::default(), vec![Vec3::ZERO]);
    assert_eq!(session.pieces().len(), 2);
    let area = SessionOptions::default().scatter_area;
    assert!(session
        .pieces()
        .iter()
        .all(|piece| area.contains(piece.current_position)));
}

#[test]
fn invalid_options_fall_back_to_defaults() {
    let options = SessionOptions {
        snap_threshold: f32::NAN,
        adjacency_factor: -1.0,
        ..SessionOptions::default()
    };
    let session = PuzzleSession::new(pair(), options);
    assert_eq!(*session.options(), SessionOptions::default());
}

#[test]
fn actions_route_to_gesture_handlers() {
    let mut session = loose_pair();
    let camera = overview_camera();
    let ndc = camera.world_to_ndc(Vec3::new(4.2, 0.0, 3.0)).unwrap().truncate();
    let actions = vec![
        SessionAction::EnableInteraction,
        SessionAction::DragStart {
            piece_id: id("left"),
        },
        SessionAction::DragMove {
            piece_id: id("left"),
            ndc,
            camera,
        },
        SessionAction::DragEnd {
            piece_id: id("left"),
        },
        SessionAction::Tick { dt: 1.0 / 60.0 },
    ];
    for action in actions {
        assert!(session.apply_action(action));
    }
    assert!(session.is_completed());
}

#[test]
fn snapshot_mirrors_session_state() {
    let mut session = loose_pair();
    assert!(drag_to(&mut session, "left", Vec3::new(4.2, 0.0, 3.0)));
    let snapshot = session.snapshot();

    assert_eq!(snapshot.pieces.len(), 2);
    assert_eq!(snapshot.progress.connected_count, 2);
    assert!(snapshot.progress.completed);
    assert_eq!(snapshot.pieces[0].id, "left");
    assert_eq!(snapshot.pieces[0].partners, vec!["right".to_string()]);
    assert_eq!(snapshot.pieces[0].current_position(), Vec3::new(-0.5, 0.0, 0.0));
}
