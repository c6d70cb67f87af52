//! Visual state tag - единственный выход для внешнего рендера

use bevy::prelude::*;

/// Дискретный тег визуального состояния агента
///
/// Рендер читает через `Changed<VisualState>`, поэтому контроллер пишет
/// только при реальной смене тега.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub enum VisualState {
    #[default]
    Idle,
    Chasing,
    Intercepting,
    Wandering,
    Hiding,
    Striking,
    Patrolling,
    Alerted,
    Flanking,
    Strafing,
    Retreating,
    /// Hard escape в этом тике
    Escaping,
}

impl VisualState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualState::Idle => "idle",
            VisualState::Chasing => "chasing",
            VisualState::Intercepting => "intercepting",
            VisualState::Wandering => "wandering",
            VisualState::Hiding => "hiding",
            VisualState::Striking => "striking",
            VisualState::Patrolling => "patrolling",
            VisualState::Alerted => "alerted",
            VisualState::Flanking => "flanking",
            VisualState::Strafing => "strafing",
            VisualState::Retreating => "retreating",
            VisualState::Escaping => "escaping",
        }
    }
}
