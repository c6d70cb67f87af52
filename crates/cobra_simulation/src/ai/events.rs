//! AI события (наружу и внутрь ядра)

use bevy::prelude::*;

pub use super::difficulty::DifficultyChanged;
pub use crate::shooting::ProjectileFireRequested;

/// Агент коснулся игрока
///
/// Генерируется один раз на контакт; повторно - только после того,
/// как игрок вышел из catch radius.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerCaught {
    pub agent: Entity,
    /// Instant-kill режим уровня/агента: game-over решает внешний код
    pub instant_kill: bool,
}

/// Hard escape сработал (для отладки/аналитики)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HardEscapeTriggered {
    pub agent: Entity,
    /// None - все 8 направлений закрыты, был случайный jitter
    pub direction: Option<Vec2>,
}
