pub mod api;
pub mod config;
pub mod pow;
pub mod score;

pub use pow::{Coordinator, NonceEncoding, PowError, Puzzle, search};
pub use score::Score;
