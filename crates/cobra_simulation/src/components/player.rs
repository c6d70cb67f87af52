//! Player marker + PlayerSnapshot (player locator для AI)
//!
//! AI никогда не ищет игрока по сцене: контроллер читает PlayerSnapshot
//! resource. Его заполняет sync_player_snapshot из entity с маркером Player,
//! либо внешний код пишет напрямую (если игрок живёт вне ECS).

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// Позиция берётся из Transform (x, y), скорость - из PlayerMotion.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Скорость игрока (заполняется внешним input/physics)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerMotion {
    pub velocity: Vec2,
}

/// Снимок состояния игрока на текущий тик
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct PlayerSnapshot {
    /// false - игрока нет в уровне (агенты ведут себя как без цели)
    pub active: bool,
    pub position: Vec2,
    /// Скорость может быть неизвестна
    pub velocity: Option<Vec2>,
}

impl PlayerSnapshot {
    pub fn at(position: Vec2) -> Self {
        Self {
            active: true,
            position,
            velocity: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn velocity_or_zero(&self) -> Vec2 {
        self.velocity.filter(|v| v.is_finite()).unwrap_or(Vec2::ZERO)
    }
}

/// Система: Player entity → PlayerSnapshot
///
/// Если Player entity нет - snapshot не трогаем (его мог записать внешний код).
pub fn sync_player_snapshot(
    players: Query<(&Transform, Option<&PlayerMotion>), With<Player>>,
    mut snapshot: ResMut<PlayerSnapshot>,
) {
    let Some((transform, motion)) = players.iter().next() else {
        return;
    };

    *snapshot = PlayerSnapshot {
        active: true,
        position: transform.translation.truncate(),
        velocity: motion.map(|m| m.velocity),
    };
}
