pub mod eval;
pub mod search;

pub use eval::{Stability, evaluate};
pub use search::{IterativeDeepening, SearchConfig, SearchOutcome, Searcher, best_move_within};
