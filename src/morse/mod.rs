// src/morse/mod.rs  —  Symbols, code table, accumulator, timing
pub mod accumulator;
pub mod code;
pub mod timing;

pub use accumulator::SymbolAccumulator;
pub use code::{decode, Symbol};
pub use timing::KeyTiming;
