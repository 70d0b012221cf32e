pub mod history;
pub mod quotes;
pub mod search;

pub use history::{fetch_history, HistoryPoint, RangeSpec};
pub use quotes::{fetch_quote, QuoteResult};
pub use search::{fetch_search, SearchResult};
