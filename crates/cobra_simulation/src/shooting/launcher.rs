//! ProjectileLauncher - независимый от steering таймер выстрела

use bevy::prelude::*;

use crate::components::{CobraAgent, PlayerSnapshot};

/// Запрос на выстрел (cooldown + range gate пройдены)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileFireRequested {
    pub agent: Entity,
    pub origin: Vec2,
    /// Нормализованное направление на игрока
    pub direction: Vec2,
}

/// Стрелковый компонент агента
///
/// cooldown_timer тикает в real time (см. tick_launcher_cooldowns):
/// slow-motion замедляет движение агентов, но не их стрельбу.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ProjectileLauncher {
    /// Cooldown между выстрелами (секунды, real time)
    pub cooldown: f32,

    /// Текущий cooldown таймер (уменьшается до 0)
    pub cooldown_timer: f32,

    /// Максимальная дистанция до игрока
    pub range: f32,
}

impl Default for ProjectileLauncher {
    fn default() -> Self {
        Self {
            cooldown: 1.5,
            cooldown_timer: 0.0,
            range: 5.0,
        }
    }
}

impl ProjectileLauncher {
    /// Готов к выстрелу (cooldown == 0)
    pub fn can_fire(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.cooldown;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// System: cooldown таймеры по unscaled времени
pub fn tick_launcher_cooldowns(mut launchers: Query<&mut ProjectileLauncher>, time: Res<Time<Real>>) {
    let delta = time.delta_secs();

    for mut launcher in launchers.iter_mut() {
        launcher.tick(delta);
    }
}

/// System: cooldown готов + игрок в range → ProjectileFireRequested
pub fn projectile_gate(
    mut launchers: Query<(Entity, &Transform, &mut ProjectileLauncher), With<CobraAgent>>,
    player: Res<PlayerSnapshot>,
    mut requests: EventWriter<ProjectileFireRequested>,
) {
    if !player.active {
        return;
    }

    for (entity, transform, mut launcher) in launchers.iter_mut() {
        if !launcher.can_fire() {
            continue;
        }

        let origin = transform.translation.truncate();
        let to_player = player.position - origin;
        if to_player.length() > launcher.range {
            continue;
        }
        let Some(direction) = to_player.try_normalize() else {
            continue;
        };

        requests.write(ProjectileFireRequested {
            agent: entity,
            origin,
            direction,
        });
        launcher.start_cooldown();

        crate::log(&format!("{:?}: fire request → {:?}", entity, direction));
    }
}
