pub mod action;
pub mod game;
pub mod lobby;
pub mod player;
pub mod role;
