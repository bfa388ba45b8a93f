use glam::{Mat4, Vec2, Vec3};

use crate::game::{
    PUZZLE_CAMERA_EYE, PUZZLE_CAMERA_FAR, PUZZLE_CAMERA_FOV_DEG, PUZZLE_CAMERA_NEAR,
    RAY_PARALLEL_EPSILON,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }

    pub fn pointer_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let width = self.width.max(1.0);
        let height = self.height.max(1.0);
        Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
    }

    pub fn ndc_to_pointer(&self, ndc: Vec2) -> Vec2 {
        let width = self.width.max(1.0);
        let height = self.height.max(1.0);
        Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn intersect_ground(&self) -> Option<Vec3> {
        let denom = self.direction.y;
        if denom.abs() < RAY_PARALLEL_EPSILON {
            return None;
        }
        let t = -self.origin.y / denom;
        if !t.is_finite() || t < 0.0 {
            return None;
        }
        let hit = self.origin + self.direction * t;
        Some(Vec3::new(hit.x, 0.0, hit.z))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Camera {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    pub fn perspective_look_at(
        eye: Vec3,
        target: Vec3,
        fov_y_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::perspective_rh(fov_y_deg.to_radians(), aspect, near, far),
        }
    }

    pub fn puzzle_default(aspect: f32) -> Self {
        Self::perspective_look_at(
            PUZZLE_CAMERA_EYE,
            Vec3::ZERO,
            PUZZLE_CAMERA_FOV_DEG,
            aspect,
            PUZZLE_CAMERA_NEAR,
            PUZZLE_CAMERA_FAR,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        if !near.is_finite() || !far.is_finite() {
            return None;
        }
        let direction = (far - near).try_normalize()?;
        Some(Ray {
            origin: near,
            direction,
        })
    }

    pub fn world_to_ndc(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.is_finite().then_some(ndc)
    }

    pub fn ground_point_at(&self, ndc: Vec2) -> Option<Vec3> {
        self.ray_from_ndc(ndc)?.intersect_ground()
    }
}
