pub mod help;
pub mod ping;
pub mod player;
pub mod reactions;
