pub mod export;
pub mod match_store;
pub mod metrics;
pub mod open_data;
pub mod predict;
pub mod rankings;
pub mod state;
pub mod tally;
