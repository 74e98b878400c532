mod obligation;
pub mod probe;
mod reserve_index;
mod shape;
#[cfg(test)]
mod tests;

pub use obligation::{normalize_entry, normalize_obligation, to_human};
pub use reserve_index::{normalize_reserve, ReserveIndex, ReserveLookup};
pub use shape::{BorrowField, DepositField, ObligationShape};
