//! Motion компоненты: MotionState (stuck/detour bookkeeping), SteeringVelocity, PlayerContact

use bevy::prelude::*;

/// Transient состояние движения агента, мутируется каждый тик
///
/// - stuck_timer / unstuck_force_timer - два независимых таймера stuck detector'а
/// - commit_* - текущий detour вокруг препятствия
/// - unstuck_sign - постоянный ±1 для разрыва left/right осцилляции
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MotionState {
    /// Позиция на прошлом тике (None до первого тика)
    pub previous_position: Option<Vec2>,
    pub stuck_timer: f32,
    pub unstuck_force_timer: f32,
    /// Оставшееся время commit'а на detour
    pub commit_timer: f32,
    pub commit_direction: Vec2,
    pub is_pathfinding: bool,
    pub unstuck_sign: f32,
    /// Последнее направление hard escape (Sniper переиспользует)
    pub last_escape_direction: Option<Vec2>,
    /// Шаг за тик, который контроллер запросил на прошлом тике
    /// (INFINITY - ещё не известен, 0 - агент стоит по своей воле)
    pub requested_step: f32,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            previous_position: None,
            stuck_timer: 0.0,
            unstuck_force_timer: 0.0,
            commit_timer: 0.0,
            commit_direction: Vec2::ZERO,
            is_pathfinding: false,
            unstuck_sign: 1.0,
            last_escape_direction: None,
            requested_step: f32::INFINITY,
        }
    }
}

impl MotionState {
    /// Зафиксироваться на detour направлении
    pub fn commit(&mut self, direction: Vec2, duration: f32) {
        self.commit_direction = direction;
        self.commit_timer = duration;
        self.is_pathfinding = true;
    }

    pub fn cancel_detour(&mut self) {
        self.commit_timer = 0.0;
        self.commit_direction = Vec2::ZERO;
        self.is_pathfinding = false;
    }

    pub fn is_committed(&self) -> bool {
        self.commit_timer > 0.0
    }

    pub fn reset_stuck(&mut self) {
        self.stuck_timer = 0.0;
        self.unstuck_force_timer = 0.0;
    }

    /// Единственная точка переключения alternating sign
    ///
    /// Call sites: переоценка planner'а (стадия 2) и hard escape jitter,
    /// оба с одним и тем же порогом stuck_timer.
    pub fn maybe_flip_sign(&mut self, threshold: f32) -> bool {
        if self.stuck_timer > threshold {
            self.unstuck_sign = -self.unstuck_sign;
            true
        } else {
            false
        }
    }
}

/// Выход контроллера за тик: скорость для внешнего integrator'а + facing
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SteeringVelocity {
    pub velocity: Vec2,
    /// Последнее ненулевое направление движения
    pub facing: Vec2,
}

impl SteeringVelocity {
    pub fn set(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        if velocity.length_squared() > f32::EPSILON {
            self.facing = velocity.normalize();
        }
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

/// Контакт с игроком (PlayerCaught отправляется один раз на контакт)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerContact {
    pub touching: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_flips_only_past_threshold() {
        let mut motion = MotionState::default();
        motion.stuck_timer = 0.2;
        assert!(!motion.maybe_flip_sign(0.3));
        assert_eq!(motion.unstuck_sign, 1.0);

        motion.stuck_timer = 0.31;
        assert!(motion.maybe_flip_sign(0.3));
        assert_eq!(motion.unstuck_sign, -1.0);
    }

    #[test]
    fn test_commit_and_cancel() {
        let mut motion = MotionState::default();
        motion.commit(Vec2::Y, 0.6);
        assert!(motion.is_committed());
        assert!(motion.is_pathfinding);

        motion.cancel_detour();
        assert!(!motion.is_committed());
        assert!(!motion.is_pathfinding);
    }

    #[test]
    fn test_facing_keeps_last_direction() {
        let mut velocity = SteeringVelocity::default();
        velocity.set(Vec2::new(3.0, 0.0));
        velocity.stop();
        assert_eq!(velocity.velocity, Vec2::ZERO);
        assert_eq!(velocity.facing, Vec2::X);
    }
}
