//! API service modules for Alpaca endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the Alpaca trading and market data APIs.

mod accounts;
mod activities;
mod assets;
mod calendar;
mod market_data;
mod orders;
mod portfolio;
mod positions;
mod watchlists;

pub use accounts::AccountsService;
pub use activities::{ActivitiesQuery, ActivitiesService};
pub use assets::AssetsService;
pub use calendar::CalendarService;
pub use market_data::{BarsQuery, MarketDataService, TicksQuery};
pub use orders::{OrdersQuery, OrdersService};
pub use portfolio::{PortfolioHistoryQuery, PortfolioService};
pub use positions::{CloseAmount, PositionsService};
pub use watchlists::WatchlistsService;
