pub mod zobrist;

pub use zobrist::{ZobristKeys, zobrist_keys};
