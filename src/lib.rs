//! Conquest Core - deterministic simulation core for a territory conquest game
//!
//! Players spread over a tile map, fight over borders, grow an economy and
//! spy on each other. Everything happens in discrete ticks driven by an
//! `ExecutionScheduler`; the same inputs always produce the same game.

pub mod combat;
pub mod core;
pub mod economy;
pub mod execution;
pub mod game;
pub mod intel;
pub mod simulation;
