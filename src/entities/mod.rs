//! Item owners

pub mod owner;
pub mod player;
pub mod roster;

pub use owner::{ItemOwner, OwnerId};
pub use player::Player;
pub use roster::Roster;
