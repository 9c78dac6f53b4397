pub mod duels;
pub mod overview;
