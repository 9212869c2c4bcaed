//! Behavior composition: compound behaviors over movement sequences and
//! the per-agent engine that arbitrates between them.

pub mod composer;
pub mod engine;
pub mod get_ready;
pub mod kick;
pub mod stabilize;
pub mod walk;

pub use composer::{ComposerState, LimbTargets, SequencePolicy};
pub use engine::{
    BehaviorId, EngineConfig, KickConfig, KickScore, MovementEngine, UPRIGHT_SWITCH_THRESHOLD,
};
pub use get_ready::GetReadyBehavior;
pub use kick::KickBehavior;
pub use stabilize::StabilizeBehavior;
pub use walk::WalkBehavior;
