use std::f32::consts::TAU;

use glimmer_core::math::Vec3;

use crate::painter::LinePainter;

/// Segments per circle.
const CIRCLE_SEGMENTS: u32 = 32;

fn point(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

impl LinePainter<'_> {
    /// Draw a single line segment.
    pub fn draw_line(&mut self, start: [f32; 3], end: [f32; 3], color: [f32; 4]) {
        self.push_line(start, end, color);
    }

    /// Draw an axis-aligned bounding box from min to max corners (12 edges).
    pub fn draw_aabb(&mut self, min: [f32; 3], max: [f32; 3], color: [f32; 4]) {
        // corner i takes max on axis k when bit k of i is set
        let corner = |i: usize| {
            [
                if i & 1 == 0 { min[0] } else { max[0] },
                if i & 2 == 0 { min[1] } else { max[1] },
                if i & 4 == 0 { min[2] } else { max[2] },
            ]
        };
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    self.push_line(corner(i), corner(i | bit), color);
                }
            }
        }
    }

    /// Draw a circle in a plane defined by two orthogonal axes.
    pub fn draw_circle(
        &mut self,
        center: [f32; 3],
        radius: f32,
        axis_a: [f32; 3],
        axis_b: [f32; 3],
        color: [f32; 4],
    ) {
        let center = Vec3::from(center);
        let axis_a = Vec3::from(axis_a) * radius;
        let axis_b = Vec3::from(axis_b) * radius;

        let mut prev = center + axis_a;
        for i in 1..=CIRCLE_SEGMENTS {
            let (sin, cos) = (i as f32 * TAU / CIRCLE_SEGMENTS as f32).sin_cos();
            let next = center + axis_a * cos + axis_b * sin;
            self.push_line(point(prev), point(next), color);
            prev = next;
        }
    }

    /// Draw a wireframe sphere using 3 great circles (XY, XZ, YZ planes).
    pub fn draw_sphere(&mut self, center: [f32; 3], radius: f32, color: [f32; 4]) {
        let (x, y, z) = ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        self.draw_circle(center, radius, x, y, color);
        self.draw_circle(center, radius, x, z, color);
        self.draw_circle(center, radius, y, z, color);
    }

    /// Draw a cross marker at a point (3 axis-aligned lines).
    pub fn draw_cross(&mut self, center: [f32; 3], size: f32, color: [f32; 4]) {
        let center = Vec3::from(center);
        for axis in [Vec3::x(), Vec3::y(), Vec3::z()] {
            let half = axis * (size * 0.5);
            self.push_line(point(center - half), point(center + half), color);
        }
    }

    /// Draw a ray from origin in a direction with a given length.
    pub fn draw_ray(
        &mut self,
        origin: [f32; 3],
        direction: [f32; 3],
        length: f32,
        color: [f32; 4],
    ) {
        let end = Vec3::from(origin) + Vec3::from(direction) * length;
        self.push_line(origin, point(end), color);
    }

    /// Draw coordinate axes gizmo (R=X, G=Y, B=Z).
    pub fn draw_axes(&mut self, center: [f32; 3], size: f32) {
        self.draw_ray(center, [1.0, 0.0, 0.0], size, [1.0, 0.0, 0.0, 1.0]);
        self.draw_ray(center, [0.0, 1.0, 0.0], size, [0.0, 1.0, 0.0, 1.0]);
        self.draw_ray(center, [0.0, 0.0, 1.0], size, [0.0, 0.0, 1.0, 1.0]);
    }

    /// Draw a grid on the XZ plane.
    pub fn draw_grid(
        &mut self,
        center: [f32; 3],
        cell_size: f32,
        half_count: u32,
        color: [f32; 4],
    ) {
        let center = Vec3::from(center);
        let extent = cell_size * half_count as f32;
        let n = half_count as i32;

        for i in -n..=n {
            let offset = i as f32 * cell_size;
            // along Z
            let x = center + Vec3::new(offset, 0.0, 0.0);
            self.push_line(
                point(x - Vec3::z() * extent),
                point(x + Vec3::z() * extent),
                color,
            );
            // along X
            let z = center + Vec3::new(0.0, 0.0, offset);
            self.push_line(
                point(z - Vec3::x() * extent),
                point(z + Vec3::x() * extent),
                color,
            );
        }
    }
}
