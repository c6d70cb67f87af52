//! ECS Components для cobra агентов
//!
//! Организация по доменам:
//! - agent: CobraAgent, Personality, AgentTuning, Behavior (фиксированный архетип)
//! - archetype: конфиги архетипов + ArchetypeState + PatrolRoute
//! - motion: MotionState (stuck/detour), SteeringVelocity, PlayerContact
//! - visual: VisualState tag для рендера
//! - player: Player marker, PlayerSnapshot (player locator)

pub mod agent;
pub mod archetype;
pub mod motion;
pub mod player;
pub mod visual;

// Re-exports для удобного импорта
pub use agent::*;
pub use archetype::*;
pub use motion::*;
pub use player::*;
pub use visual::*;
