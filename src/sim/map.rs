//! Arena maps
//!
//! Maps are authored as fractional templates and instantiated against the
//! current viewport, so a resize just rebuilds the same layout at the new
//! scale. Platforms are axis-aligned rects; the platform group is
//! recentered horizontally after scaling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Minimum platform width after scaling (px)
const MIN_PLATFORM_W: f32 = 80.0;

/// A static axis-aligned platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Platform {
    /// Horizontal overlap test against a body spanning [x, x+w]
    #[inline]
    pub fn overlaps_x(&self, x: f32, w: f32) -> bool {
        x + w > self.x && x < self.x + self.w
    }

    #[inline]
    pub fn contains(&self, p: Vec2, y_slack: f32) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h + y_slack
    }
}

/// Fractional platform placement (center + width fraction, fixed height)
#[derive(Debug, Clone, Copy)]
pub struct PlatformTemplate {
    pub cx: f32,
    pub cy: f32,
    pub w_frac: f32,
    pub h: f32,
}

/// Fractional map layout
#[derive(Debug, Clone, Copy)]
pub struct MapTemplate {
    pub name: &'static str,
    pub platforms: &'static [PlatformTemplate],
    pub spawn_a: (f32, f32),
    pub spawn_b: (f32, f32),
    /// Fraction of viewport height where lava starts, if the map has any
    pub lava_y_frac: Option<f32>,
}

pub const MAP_TEMPLATES: [MapTemplate; 3] = [
    MapTemplate {
        name: "Training Grounds",
        platforms: &[
            PlatformTemplate {
                cx: 0.25,
                cy: 0.72,
                w_frac: 0.24,
                h: 28.0,
            },
            PlatformTemplate {
                cx: 0.75,
                cy: 0.72,
                w_frac: 0.24,
                h: 28.0,
            },
            PlatformTemplate {
                cx: 0.5,
                cy: 0.48,
                w_frac: 0.26,
                h: 28.0,
            },
        ],
        spawn_a: (0.2, 0.5),
        spawn_b: (0.8, 0.5),
        lava_y_frac: None,
    },
    MapTemplate {
        name: "Sky Islands",
        platforms: &[
            PlatformTemplate {
                cx: 0.18,
                cy: 0.66,
                w_frac: 0.2,
                h: 20.0,
            },
            PlatformTemplate {
                cx: 0.5,
                cy: 0.5,
                w_frac: 0.22,
                h: 20.0,
            },
            PlatformTemplate {
                cx: 0.82,
                cy: 0.66,
                w_frac: 0.2,
                h: 20.0,
            },
        ],
        spawn_a: (0.18, 0.46),
        spawn_b: (0.82, 0.46),
        lava_y_frac: None,
    },
    MapTemplate {
        name: "Lava Pit",
        platforms: &[
            PlatformTemplate {
                cx: 0.25,
                cy: 0.70,
                w_frac: 0.26,
                h: 26.0,
            },
            PlatformTemplate {
                cx: 0.75,
                cy: 0.70,
                w_frac: 0.26,
                h: 26.0,
            },
        ],
        spawn_a: (0.2, 0.48),
        spawn_b: (0.8, 0.48),
        lava_y_frac: Some(0.9),
    },
];

/// A map instantiated at a concrete viewport size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub name: String,
    pub platforms: Vec<Platform>,
    pub spawn_a: Vec2,
    pub spawn_b: Vec2,
    /// y coordinate where lava starts, if present
    pub lava_y: Option<f32>,
    /// Downward acceleration per nominal frame
    pub gravity: f32,
}

impl MapTemplate {
    /// Scale the template to a viewport and recenter the platform group
    pub fn build(&self, view_w: f32, view_h: f32, gravity: f32) -> Arena {
        let mut platforms: Vec<Platform> = self
            .platforms
            .iter()
            .map(|t| {
                let w = (t.w_frac * view_w).round().max(MIN_PLATFORM_W);
                let h = t.h;
                Platform {
                    x: (t.cx * view_w - w / 2.0).round(),
                    y: (t.cy * view_h - h / 2.0).round(),
                    w,
                    h,
                }
            })
            .collect();

        let mut spawn_a = Vec2::new(
            (self.spawn_a.0 * view_w).round(),
            (self.spawn_a.1 * view_h).round(),
        );
        let mut spawn_b = Vec2::new(
            (self.spawn_b.0 * view_w).round(),
            (self.spawn_b.1 * view_h).round(),
        );

        // Recenter the platform group so wide viewports keep the fight
        // in the middle of the screen.
        let min_x = platforms.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = platforms
            .iter()
            .map(|p| p.x + p.w)
            .fold(f32::NEG_INFINITY, f32::max);
        let dx = (view_w / 2.0 - (min_x + max_x) / 2.0).round();
        for p in &mut platforms {
            p.x += dx;
        }
        spawn_a.x += dx;
        spawn_b.x += dx;

        Arena {
            name: self.name.to_string(),
            platforms,
            spawn_a,
            spawn_b,
            lava_y: self.lava_y_frac.map(|f| (f * view_h).round()),
            gravity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_scales_and_centers() {
        let arena = MAP_TEMPLATES[0].build(1280.0, 720.0, 0.45);
        assert_eq!(arena.platforms.len(), 3);
        assert!(arena.lava_y.is_none());

        // Group is centered on the viewport
        let min_x = arena
            .platforms
            .iter()
            .map(|p| p.x)
            .fold(f32::INFINITY, f32::min);
        let max_x = arena
            .platforms
            .iter()
            .map(|p| p.x + p.w)
            .fold(f32::NEG_INFINITY, f32::max);
        assert!(((min_x + max_x) / 2.0 - 640.0).abs() <= 1.0);
    }

    #[test]
    fn test_minimum_platform_width() {
        // A tiny viewport must not produce slivers
        let arena = MAP_TEMPLATES[1].build(100.0, 100.0, 0.45);
        for p in &arena.platforms {
            assert!(p.w >= MIN_PLATFORM_W);
        }
    }

    #[test]
    fn test_lava_pit_has_lava() {
        let arena = MAP_TEMPLATES[2].build(1280.0, 720.0, 0.45);
        assert_eq!(arena.lava_y, Some(648.0));
    }

    #[test]
    fn test_rebuild_on_resize_keeps_fractions() {
        let small = MAP_TEMPLATES[0].build(640.0, 360.0, 0.45);
        let large = MAP_TEMPLATES[0].build(1280.0, 720.0, 0.45);
        // Platform tops keep their fractional height
        for (s, l) in small.platforms.iter().zip(&large.platforms) {
            let sf = (s.y + s.h / 2.0) / 360.0;
            let lf = (l.y + l.h / 2.0) / 720.0;
            assert!((sf - lf).abs() < 0.01);
        }
    }
}
