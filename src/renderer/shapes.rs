//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segments used for a circle of the given screen radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.8) as u32).clamp(8, 48)
}

/// Unit directions bounding each wedge of an n-gon, in winding order
fn wedges(segments: u32) -> impl Iterator<Item = (Vec2, Vec2)> {
    let step = TAU / segments.max(3) as f32;
    (0..segments.max(3)).map(move |i| {
        let start = i as f32 * step;
        (Vec2::from_angle(start), Vec2::from_angle(start + step))
    })
}

/// Filled disc as a triangle fan
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    wedges(segments)
        .flat_map(|(d0, d1)| [center, center + d0 * radius, center + d1 * radius])
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Annulus between two radii, two triangles per wedge
pub fn ring(center: Vec2, inner: f32, outer: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    wedges(segments)
        .flat_map(|(d0, d1)| {
            let (i0, o0) = (center + d0 * inner, center + d0 * outer);
            let (i1, o1) = (center + d1 * inner, center + d1 * outer);
            [i0, o0, i1, i1, o0, o1]
        })
        .map(|p| Vertex::at(p, color))
        .collect()
}

/// Two triangles covering an axis-aligned rectangle
pub fn quad(center: Vec2, half_extents: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let min = center - half_extents;
    let max = center + half_extents;
    vec![
        Vertex::at(min, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::at(max, color),
    ]
}

/// A thick line segment as a quad
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    let (a1, a2, b1, b2) = (a + perp, a - perp, b + perp, b - perp);
    vec![
        Vertex::at(a1, color),
        Vertex::at(a2, color),
        Vertex::at(b1, color),
        Vertex::at(b1, color),
        Vertex::at(a2, color),
        Vertex::at(b2, color),
    ]
}
