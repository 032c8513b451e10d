pub mod fetch;
pub mod series;
pub mod worker;

pub use fetch::*;
pub use series::{PricePoint, TimeSeries};
pub use worker::{spawn_fetch_worker, FetchReport};
