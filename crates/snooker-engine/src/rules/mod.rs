pub mod classify;
pub mod engine;
pub mod outcome;
pub mod turn;
