// Core data models for the stage ledger

pub mod stage;

pub use stage::*;
