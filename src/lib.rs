pub mod api_server;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod nse_client;
pub mod straddle;

// Re-exports for convenience
pub use error::AnalyzerError;
pub use history::{assemble_series, DailyClose, HistoryProvider};
pub use models::{
    ContractSpec, DateRange, HistoricalSeries, OptionChain, OptionType, PricePoint,
    StraddleSnapshot,
};
pub use nse_client::NSEClient;
pub use straddle::{atm_strike, compute_snapshot};
