pub mod action_service;
pub mod game_service;
pub mod phase_service;
