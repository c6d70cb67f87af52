//! Shooting domain - projectile cooldown + range gate (cobra)
//!
//! Содержит:
//! - ProjectileLauncher (cooldown в real time, не зависит от time scale)
//! - projectile_gate (FixedUpdate: cooldown готов + игрок в range → запрос)
//!
//! Сам снаряд (spawn, полёт, попадание) - снаружи ядра.

pub mod launcher;

// Re-export all components and systems
pub use launcher::*;
