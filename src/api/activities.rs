//! Account activities service.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::client::{ClientInner, Params};
use crate::models::{Activity, SortDirection};
use crate::Result;

/// Query parameters for listing account activities.
///
/// `date` cannot be combined with `after` or `until`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivitiesQuery {
    /// Activity type codes such as `FILL` or `DIV`; empty means all types
    pub activity_types: Vec<String>,
    /// Only activities on this date
    pub date: Option<NaiveDate>,
    /// Only activities after this time
    pub after: Option<DateTime<Utc>>,
    /// Only activities until this time
    pub until: Option<DateTime<Utc>>,
    /// Sort order (API default: descending)
    pub direction: Option<SortDirection>,
    /// Page size (API default 50, max 100)
    pub page_size: Option<u32>,
    /// ID of the last activity of the previous page
    pub page_token: Option<String>,
}

impl ActivitiesQuery {
    /// Query a single activity type.
    pub fn of_type(activity_type: impl Into<String>) -> Self {
        Self {
            activity_types: vec![activity_type.into()],
            ..Default::default()
        }
    }

    fn path(&self) -> String {
        match self.activity_types.as_slice() {
            [single] => format!("/account/activities/{}", urlencoding::encode(single)),
            _ => "/account/activities".to_string(),
        }
    }

    fn to_params(&self) -> Params {
        let types = match self.activity_types.len() {
            0 | 1 => None,
            _ => Some(self.activity_types.clone()),
        };
        Params::new()
            .with("activity_types", types)
            .with("date", self.date)
            .with("after", self.after)
            .with("until", self.until)
            .with("direction", self.direction.map(|d| d.as_str()))
            .with("page_size", self.page_size)
            .with("page_token", self.page_token.clone())
    }
}

/// Service for account activities.
///
/// # Example
///
/// ```no_run
/// use alpaca_trade_rs::api::ActivitiesQuery;
/// use alpaca_trade_rs::models::Activity;
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let fills = client.activities().list(&ActivitiesQuery::of_type("FILL")).await?;
/// for activity in fills {
///     if let Activity::Trade(fill) = activity {
///         println!("{:?} {} {} @ {}", fill.side, fill.qty, fill.symbol, fill.price);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ActivitiesService {
    inner: Arc<ClientInner>,
}

impl ActivitiesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List account activities, fills and non-trade activities mixed.
    pub async fn list(&self, query: &ActivitiesQuery) -> Result<Vec<Activity>> {
        let params = query.to_params();
        self.inner.get_list(&query.path(), Some(&params)).await
    }
}
