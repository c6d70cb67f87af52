//! Headless motion integration
//!
//! Когда физикой управляет внешний движок, он сам читает SteeringVelocity.
//! Здесь - упрощённая замена: velocity × dt, шаг обрезается о стены
//! (probe вдоль движения) и клампится в арену.

use bevy::prelude::*;

use crate::components::{CobraAgent, SteeringVelocity};
use crate::config::{LevelConfig, SteeringConfig};
use crate::probe::{ObstacleProbe, SpatialProbe};

/// Зазор до стены, чтобы не входить в неё
const WALL_SKIN: f32 = 0.05;

/// Обрезать шаг о первое препятствие на пути
pub fn clip_step(position: Vec2, step: Vec2, probe: &dyn SpatialProbe, layer_mask: u32) -> Vec2 {
    let length = step.length();
    if length <= f32::EPSILON {
        return Vec2::ZERO;
    }

    match probe.probe(position, step, length + WALL_SKIN, layer_mask) {
        Some(hit) => step / length * (hit.distance - WALL_SKIN).clamp(0.0, length),
        None => step,
    }
}

/// Система: SteeringVelocity → Transform
pub fn integrate_agent_motion(
    mut agents: Query<(&SteeringVelocity, &mut Transform), With<CobraAgent>>,
    level: Res<LevelConfig>,
    steering: Res<SteeringConfig>,
    probe: Res<ObstacleProbe>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();

    for (velocity, mut transform) in agents.iter_mut() {
        let position = transform.translation.truncate();
        let step = clip_step(position, velocity.velocity * dt, probe.get(), steering.probe_mask);
        let next = level.arena.clamp(position + step);

        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaBounds;
    use crate::probe::{OpenField, WallBox, WallField, MASK_STEERING};

    #[test]
    fn test_open_step_unchanged() {
        let step = clip_step(Vec2::ZERO, Vec2::new(0.05, 0.0), &OpenField, MASK_STEERING);
        assert_eq!(step, Vec2::new(0.05, 0.0));
    }

    #[test]
    fn test_step_stops_before_wall() {
        let field = WallField::new(ArenaBounds::default()).with_wall(WallBox::new(Vec2::new(0.1, -1.0), Vec2::new(0.5, 1.0)));

        let step = clip_step(Vec2::ZERO, Vec2::new(0.2, 0.0), &field, MASK_STEERING);
        // стена на 0.1, зазор 0.05
        assert!((step.x - 0.05).abs() < 1e-5, "step = {:?}", step);
        assert_eq!(step.y, 0.0);
    }

    #[test]
    fn test_zero_step() {
        assert_eq!(clip_step(Vec2::ONE, Vec2::ZERO, &OpenField, MASK_STEERING), Vec2::ZERO);
    }
}
