//! Contact detection between the spacecraft hull and the world
//!
//! The hull is a rotated rectangle. It touches the terrain when one of its
//! corners is on or under the surface, or when a terrain vertex pokes into
//! it between corners. It touches the border when a corner leaves the
//! playfield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spacecraft::Spacecraft;
use super::terrain::Terrain;

/// What the craft ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Terrain,
    Boundary,
}

/// Crash or landing attempt, decided from impact speed alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactClass {
    Crash,
    LandingAttempt,
}

impl ContactClass {
    /// Anything strictly faster than `max_safe_speed` is a crash
    pub fn from_speed(speed: f32, max_safe_speed: f32) -> Self {
        if speed > max_safe_speed {
            ContactClass::Crash
        } else {
            ContactClass::LandingAttempt
        }
    }
}

/// A detected contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub surface: Surface,
    /// Deepest hull or terrain point involved
    pub point: Vec2,
    /// Direction that pushes the craft out (border contacts only)
    pub normal: Vec2,
    /// How far the hull overlaps
    pub penetration: f32,
    /// Craft speed at the moment of contact
    pub speed: f32,
}

/// First contact of the craft with the terrain, then the border
pub fn detect_contact(craft: &Spacecraft, terrain: &Terrain, ceiling: f32) -> Option<Contact> {
    terrain_contact(craft, terrain).or_else(|| boundary_contact(craft, terrain.width, ceiling))
}

/// Hull against the terrain polyline
pub fn terrain_contact(craft: &Spacecraft, terrain: &Terrain) -> Option<Contact> {
    let corners = craft.hull_corners();
    let speed = craft.speed();
    let mut deepest: Option<Contact> = None;

    let mut consider = |point: Vec2, penetration: f32| {
        if deepest.is_none_or(|c| penetration > c.penetration) {
            deepest = Some(Contact {
                surface: Surface::Terrain,
                point,
                normal: Vec2::Y,
                penetration,
                speed,
            });
        }
    };

    for corner in corners {
        match terrain.height_at(corner.x) {
            Some(h) if corner.y <= h => consider(corner, h - corner.y),
            _ => {}
        }
    }

    // Peaks narrower than the hull can slip between two corners
    let min_x = corners.iter().map(|c| c.x).fold(f32::MAX, f32::min);
    let max_x = corners.iter().map(|c| c.x).fold(f32::MIN, f32::max);
    let start = terrain.points.partition_point(|p| p.x < min_x);
    for &vertex in terrain.points[start..].iter().take_while(|p| p.x <= max_x) {
        if point_in_convex_quad(vertex, &corners) {
            consider(vertex, 0.0);
        }
    }

    deepest
}

/// Hull against the playfield edges (left, right, ceiling)
pub fn boundary_contact(craft: &Spacecraft, width: f32, ceiling: f32) -> Option<Contact> {
    let speed = craft.speed();
    let mut deepest: Option<Contact> = None;

    for corner in craft.hull_corners() {
        let candidates = [
            (-corner.x, Vec2::X),
            (corner.x - width, Vec2::NEG_X),
            (corner.y - ceiling, Vec2::NEG_Y),
        ];
        for (penetration, normal) in candidates {
            if penetration > 0.0 && deepest.is_none_or(|c| penetration > c.penetration) {
                deepest = Some(Contact {
                    surface: Surface::Boundary,
                    point: corner,
                    normal,
                    penetration,
                    speed,
                });
            }
        }
    }

    deepest
}

/// Push the craft out of a border and reflect the inbound velocity
pub fn bounce(craft: &mut Spacecraft, contact: &Contact, restitution: f32) {
    let state = &mut craft.state;
    state.position += contact.normal * contact.penetration;
    let inbound = state.linear_velocity.dot(contact.normal);
    if inbound < 0.0 {
        state.linear_velocity -= contact.normal * (inbound * (1.0 + restitution));
    }
}

/// `corners` must wind counter-clockwise
fn point_in_convex_quad(point: Vec2, corners: &[Vec2; 4]) -> bool {
    (0..4).all(|i| {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        (b - a).perp_dot(point - a) >= 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CraftConfig;

    fn flat_terrain() -> Terrain {
        Terrain::from_heights(1000.0, &[100.0, 100.0, 100.0, 100.0], &[1], -900.0).unwrap()
    }

    fn upright_at(x: f32, y: f32) -> Spacecraft {
        Spacecraft::new(CraftConfig {
            initial_position: Vec2::new(x, y),
            initial_rotation_deg: 0.0,
            initial_velocity: Vec2::ZERO,
            ..Default::default()
        })
    }

    #[test]
    fn test_classification_boundary() {
        assert_eq!(ContactClass::from_speed(35.0, 35.0), ContactClass::LandingAttempt);
        assert_eq!(ContactClass::from_speed(35.0001, 35.0), ContactClass::Crash);
        assert_eq!(ContactClass::from_speed(0.0, 35.0), ContactClass::LandingAttempt);
    }

    #[test]
    fn test_speed_exactly_35_from_velocity() {
        let mut craft = upright_at(500.0, 500.0);
        craft.state.linear_velocity = Vec2::new(0.0, -35.0);
        assert_eq!(
            ContactClass::from_speed(craft.speed(), 35.0),
            ContactClass::LandingAttempt
        );
    }

    #[test]
    fn test_in_flight_no_contact() {
        let craft = upright_at(500.0, 500.0);
        assert!(detect_contact(&craft, &flat_terrain(), 1800.0).is_none());
    }

    #[test]
    fn test_touchdown_on_surface() {
        // Bottom edge (half height 28) exactly on the ground
        let mut craft = upright_at(500.0, 128.0);
        craft.state.linear_velocity = Vec2::new(0.0, -12.0);
        let contact = detect_contact(&craft, &flat_terrain(), 1800.0).unwrap();
        assert_eq!(contact.surface, Surface::Terrain);
        assert!((contact.speed - 12.0).abs() < 1e-6);
        assert!(contact.penetration.abs() < 1e-4);
    }

    #[test]
    fn test_sinking_picks_deepest_corner() {
        let mut craft = upright_at(500.0, 120.0);
        craft.state.rotation = 0.2;
        let contact = terrain_contact(&craft, &flat_terrain()).unwrap();
        let corners = craft.hull_corners();
        let lowest = corners.iter().map(|c| c.y).fold(f32::MAX, f32::min);
        assert!((contact.point.y - lowest).abs() < 1e-4);
    }

    #[test]
    fn test_spike_between_corners() {
        // Narrow peak at x = 500 reaching y = 300, hull corners straddle it
        let terrain = Terrain::from_heights(
            1000.0,
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            &[],
            -900.0,
        )
        .unwrap();
        let mut points = terrain.points.clone();
        points[5] = Vec2::new(500.0, 300.0);
        let spiked = Terrain { points, ..terrain };

        let craft = upright_at(500.0, 290.0);
        let contact = terrain_contact(&craft, &spiked).unwrap();
        assert_eq!(contact.point, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_border_contacts() {
        let left = upright_at(10.0, 500.0);
        let contact = boundary_contact(&left, 1000.0, 1800.0).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!((contact.penetration - 14.0).abs() < 1e-4);

        let right = upright_at(990.0, 500.0);
        assert_eq!(
            boundary_contact(&right, 1000.0, 1800.0).unwrap().normal,
            Vec2::NEG_X
        );

        let top = upright_at(500.0, 1790.0);
        assert_eq!(
            boundary_contact(&top, 1000.0, 1800.0).unwrap().normal,
            Vec2::NEG_Y
        );
    }

    #[test]
    fn test_terrain_wins_over_border() {
        let craft = upright_at(10.0, 110.0);
        let contact = detect_contact(&craft, &flat_terrain(), 1800.0).unwrap();
        assert_eq!(contact.surface, Surface::Terrain);
    }

    #[test]
    fn test_bounce_reflects_and_pushes_out() {
        let mut craft = upright_at(10.0, 500.0);
        craft.state.linear_velocity = Vec2::new(-100.0, -5.0);
        let contact = boundary_contact(&craft, 1000.0, 1800.0).unwrap();
        bounce(&mut craft, &contact, 0.2);

        assert!((craft.state.position.x - 24.0).abs() < 1e-4);
        assert!((craft.state.linear_velocity.x - 20.0).abs() < 1e-4);
        assert_eq!(craft.state.linear_velocity.y, -5.0);
        assert!(boundary_contact(&craft, 1000.0, 1800.0).is_none());
    }
}
