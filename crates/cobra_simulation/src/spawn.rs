//! Spawn агентов с валидацией конфигурации
//!
//! Единственное место, где возвращается ошибка: дальше рантайм
//! работает без паник, на уже проверенных данных.

use bevy::prelude::*;

use crate::components::{AgentTuning, Archetype, ArchetypeState, Behavior, CobraAgent, Personality};
use crate::config::{LevelConfig, SteeringConfig};
use crate::error::ConfigError;
use crate::shooting::ProjectileLauncher;

/// Описание агента для spawn_cobra
#[derive(Debug, Clone)]
pub struct CobraSpawn {
    pub position: Vec2,
    pub archetype: Archetype,
    pub personality: Personality,
    /// Базовая скорость до personality
    pub speed: f32,
    /// None - агент не стреляет
    pub launcher: Option<ProjectileLauncher>,
}

impl CobraSpawn {
    pub fn new(archetype: Archetype, position: Vec2) -> Self {
        Self {
            position,
            archetype,
            personality: Personality::default(),
            speed: AgentTuning::default().speed,
            launcher: None,
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_launcher(mut self, launcher: ProjectileLauncher) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn validate(&self, level: &LevelConfig, steering: &SteeringConfig) -> Result<(), ConfigError> {
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !self.position.is_finite() {
            return Err(ConfigError::NonFinitePosition {
                x: self.position.x,
                y: self.position.y,
            });
        }
        level.arena.validate()?;
        steering.validate()?;
        self.archetype.validate()
    }
}

/// Создать cobra агента
///
/// Позиция клампится в арену. Пустой маршрут патруля допустим
/// (агент стоит на месте), но логируется warning.
pub fn spawn_cobra(
    commands: &mut Commands,
    spawn: CobraSpawn,
    level: &LevelConfig,
    steering: &SteeringConfig,
) -> Result<Entity, ConfigError> {
    spawn.validate(level, steering)?;

    if let Archetype::Patroller(config) = &spawn.archetype {
        if config.waypoints.is_empty() {
            crate::log_warning("spawn_cobra: пустой маршрут патруля, агент будет стоять");
        }
    }

    let position = level.arena.clamp(spawn.position);
    let agent = CobraAgent {
        personality: spawn.personality,
        tuning: spawn.personality.shape(AgentTuning::new(spawn.speed)),
        instant_kill: level.instant_kill,
    };

    let mut entity = commands.spawn((
        agent,
        Transform::from_xyz(position.x, position.y, 0.0),
        Name::new(format!("Cobra ({})", spawn.archetype.name())),
    ));
    let id = entity.id();

    // Sniper фаза зависит от Entity, поэтому state - после получения id
    entity.insert((
        ArchetypeState::for_archetype(&spawn.archetype, position, id),
        Behavior::new(spawn.archetype.clone()),
    ));
    if let Some(launcher) = spawn.launcher {
        entity.insert(launcher);
    }

    crate::log_info(&format!(
        "Spawned {:?}: {} ({:?}) at {:?}",
        id,
        spawn.archetype.name(),
        spawn.personality,
        position
    ));

    Ok(id)
}
