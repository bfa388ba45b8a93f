use glam::{Vec2, Vec3};

pub const SNAP_THRESHOLD_DEFAULT: f32 = 1.0;
pub const NEAR_THRESHOLD_DEFAULT: f32 = 1.5;
pub const MIN_PIECE_DISTANCE_DEFAULT: f32 = 3.0;
pub const ADJACENCY_FACTOR_DEFAULT: f32 = 1.1;
pub const CONNECTION_HIGHLIGHT_MS_DEFAULT: u32 = 500;

pub const PLACEMENT_MAX_ATTEMPTS: u32 = 100;

pub const SCATTER_MIN_DEFAULT: Vec2 = Vec2::new(-10.0, 5.0);
pub const SCATTER_MAX_DEFAULT: Vec2 = Vec2::new(10.0, 15.0);

pub const PUZZLE_CAMERA_EYE: Vec3 = Vec3::new(0.0, 6.0, 12.0);
pub const PUZZLE_CAMERA_FOV_DEG: f32 = 50.0;
pub const PUZZLE_CAMERA_NEAR: f32 = 0.1;
pub const PUZZLE_CAMERA_FAR: f32 = 1000.0;

pub const RAY_PARALLEL_EPSILON: f32 = 1.0e-6;

pub const REFERENCE_FRAME_RATE: f32 = 60.0;
pub const POSITION_LERP_PER_FRAME: f32 = 0.2;
pub const SCALE_LERP_PER_FRAME: f32 = 0.1;

pub const SCALE_REST: f32 = 1.0;
pub const SCALE_DRAGGING: f32 = 1.15;
pub const SCALE_JUST_CONNECTED: f32 = 1.25;
pub const SCALE_CONNECTED: f32 = 1.0;
pub const SCALE_NEAR: f32 = 1.1;

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn frame_lerp_factor(per_frame: f32, dt: f32) -> f32 {
    if !(dt > 0.0) {
        return 0.0;
    }
    let keep = (1.0 - per_frame.clamp(0.0, 1.0)).powf(dt * REFERENCE_FRAME_RATE);
    (1.0 - keep).clamp(0.0, 1.0)
}

pub fn ground_point(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

pub fn horizontal(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.max(0.0)
    } else {
        0.0
    }
}
