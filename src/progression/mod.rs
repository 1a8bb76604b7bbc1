//! Progression systems

pub mod xp;
pub mod identify;

pub use xp::{identification_reward, total_xp_for_level, xp_for_level, Experience};
pub use identify::{
    IdentificationEvent, IdentificationHost, IdentificationScheduler, IdentificationState, StartOutcome, TaskKey,
    TickReport,
};
