//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in pixel space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn push_quad(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    // a-b-c-d in winding order
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));

    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(d.x, d.y, color));
    vertices.push(Vertex::new(a.x, a.y, color));
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, color, segments)
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::from_angle(theta1);
        let dir2 = Vec2::from_angle(theta2);

        push_quad(
            &mut vertices,
            center + dir1 * inner_radius,
            center + dir1 * outer_radius,
            center + dir2 * outer_radius,
            center + dir2 * inner_radius,
            color,
        );
    }

    vertices
}

/// Generate vertices for a filled ellipse rotated by `rotation` radians
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let rot = Vec2::from_angle(rotation);
    let point = |theta: f32| center + rot.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()));

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let p1 = point((i as f32 / segments as f32) * 2.0 * PI);
        let p2 = point(((i + 1) as f32 / segments as f32) * 2.0 * PI);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Outline of a rotated ellipse, `width` pixels thick
pub fn ellipse_outline(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    width: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let rot = Vec2::from_angle(rotation);
    let points: Vec<Vec2> = (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * 2.0 * PI;
            center + rot.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()))
        })
        .collect();
    polyline(&points, true, width, color)
}

/// A straight segment `width` pixels thick
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let half = dir.perp() * (width * 0.5);

    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, a + half, a - half, b - half, b + half, color);
    vertices
}

/// A segment drawn as alternating `dash`-long strokes and gaps
pub fn dashed_line(a: Vec2, b: Vec2, width: f32, dash: f32, color: [f32; 4]) -> Vec<Vertex> {
    let length = a.distance(b);
    if length <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let dir = (b - a) / length;

    let mut vertices = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        vertices.extend(line(a + dir * start, a + dir * end, width, color));
        start += dash * 2.0;
    }
    vertices
}

/// Connected segments through `points`, optionally closing the loop
pub fn polyline(points: &[Vec2], closed: bool, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(points.len() * 6);
    for pair in points.windows(2) {
        vertices.extend(line(pair[0], pair[1], width, color));
    }
    if closed {
        if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
            vertices.extend(line(last, first, width, color));
        }
    }
    vertices
}

/// Filled polygon, triangulated as a fan around its centroid
///
/// Only valid for star-shaped outlines (every vertex visible from the centroid).
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;

    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, &p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(centroid.x, centroid.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }
    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let max = min + size;

    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    );
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_vertices_on_radius() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, WHITE, 12);
        assert_eq!(verts.len(), 36);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 10.0]);
            let edge = Vec2::from(tri[1].position);
            assert!((edge.distance(Vec2::new(10.0, 10.0)) - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_line_has_requested_width() {
        let verts = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, WHITE);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((v.position[1].abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_shapes_are_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, WHITE).is_empty());
        assert!(polygon(&[Vec2::ZERO, Vec2::ONE], WHITE).is_empty());
        assert!(rect(Vec2::ZERO, Vec2::new(0.0, 4.0), WHITE).is_empty());
        assert!(dashed_line(Vec2::ZERO, Vec2::ZERO, 1.0, 5.0, WHITE).is_empty());
    }

    #[test]
    fn test_dashed_line_alternates() {
        // 40px with 5px dashes -> 4 dashes
        let verts = dashed_line(Vec2::ZERO, Vec2::new(40.0, 0.0), 2.0, 5.0, WHITE);
        assert_eq!(verts.len(), 4 * 6);
    }

    #[test]
    fn test_closed_polyline_adds_edge() {
        let square = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(polyline(&square, false, 1.0, WHITE).len(), 3 * 6);
        assert_eq!(polyline(&square, true, 1.0, WHITE).len(), 4 * 6);
    }

    #[test]
    fn test_ellipse_rotation() {
        let verts = ellipse(Vec2::ZERO, Vec2::new(4.0, 1.0), PI / 2.0, WHITE, 4);
        // First edge point lies on the major axis, rotated onto +y
        let p = Vec2::from(verts[1].position);
        assert!(p.distance(Vec2::new(0.0, 4.0)) < 1e-4);
    }
}
