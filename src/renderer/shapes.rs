//! Mesh generation for 2D primitives
//!
//! Meshes live in unit space (about the origin, extent 1) and are scaled per
//! instance, so one upload serves every ball/paddle/dash.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::config::GameConfig;

/// Indexed triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Filled circle of diameter 1 as a triangle fan around the origin
pub fn circle(segments: u32) -> Mesh {
    let radius = 0.5;
    let mut vertices = Vec::with_capacity(segments as usize + 1);
    let mut indices = Vec::with_capacity(segments as usize * 3);

    vertices.push(Vertex::new(0.0, 0.0));
    for i in 0..segments {
        let theta = (i as f32 / segments as f32) * TAU;
        vertices.push(Vertex::new(radius * theta.cos(), radius * theta.sin()));
    }

    for i in 0..segments {
        let rim = 1 + i as u16;
        let next = 1 + ((i + 1) % segments) as u16;
        indices.extend_from_slice(&[0, rim, next]);
    }

    Mesh { vertices, indices }
}

/// Unit square centered on the origin
pub fn quad() -> Mesh {
    Mesh {
        vertices: vec![
            Vertex::new(-0.5, -0.5),
            Vertex::new(0.5, -0.5),
            Vertex::new(0.5, 0.5),
            Vertex::new(-0.5, 0.5),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Centers of the dashed middle line, bottom to top
pub fn center_line_offsets(config: &GameConfig) -> Vec<Vec2> {
    let Some(pitch) = config.dash_pitch() else {
        log::warn!(
            "Skipping center line: dash pitch {} on height {}",
            config.dash_size.y + config.dash_gap,
            config.screen_height
        );
        return Vec::new();
    };
    let count = (config.screen_height.max(0.0) / pitch).floor() as u32 + 1;
    (0..count)
        .map(|i| Vec2::new(config.screen_width / 2.0, i as f32 * pitch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_fan() {
        let mesh = circle(100);
        assert_eq!(mesh.vertices.len(), 101);
        assert_eq!(mesh.index_count(), 300);
        // Every triangle starts at the center and the fan closes on itself
        assert!(mesh.indices.chunks(3).all(|t| t[0] == 0));
        assert_eq!(&mesh.indices[297..], &[0, 100, 1]);
        for v in &mesh.vertices[1..] {
            let r = Vec2::from(v.position).length();
            assert!((r - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_quad() {
        let mesh = quad();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    fn test_center_line_default_screen() {
        let config = GameConfig::for_screen(800.0, 600.0);
        let dashes = center_line_offsets(&config);
        assert_eq!(dashes.len(), 16);
        assert_eq!(dashes[0], Vec2::new(400.0, 0.0));
        assert_eq!(dashes[15], Vec2::new(400.0, 600.0));
    }

    #[test]
    fn test_center_line_partial_pitch() {
        let config = GameConfig::for_screen(640.0, 490.0);
        let dashes = center_line_offsets(&config);
        assert_eq!(dashes.len(), 13);
        assert!(dashes.iter().all(|d| d.x == 320.0));
    }

    #[test]
    fn test_center_line_rejects_bad_pitch() {
        let mut config = GameConfig::for_screen(800.0, 600.0);
        config.dash_size.y = 0.0;
        config.dash_gap = 0.0;
        assert!(center_line_offsets(&config).is_empty());

        config.dash_gap = f32::NAN;
        assert!(center_line_offsets(&config).is_empty());

        config.dash_gap = -30.0;
        assert!(center_line_offsets(&config).is_empty());

        let config = GameConfig::for_screen(800.0, f32::INFINITY);
        assert!(center_line_offsets(&config).is_empty());
    }
}
