pub mod attacks;
pub mod precompute;
pub mod search;
pub mod structs;

pub use attacks::{get_king_attacks, get_knight_attacks};
pub use precompute::{MagicTableSeed, generate_default_magic_tables, generate_magic_tables};
pub use structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};

use once_cell::sync::OnceCell;

static DEFAULT_TABLES: OnceCell<MagicTables> = OnceCell::new();

/// Process-wide magic bitboard tables, built once on first access.
pub fn default_tables() -> &'static MagicTables {
    DEFAULT_TABLES.get_or_init(generate_default_magic_tables)
}
