//! Sales chart data and the live activity feed.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeloom_core::{ActivityId, ActivityKind};

/// Maximum number of entries kept in a live feed.
pub const LIVE_FEED_CAPACITY: usize = 20;

/// Timestamp label shown for freshly recorded activity.
pub const JUST_NOW: &str = "Just now";

/// One day of the sales chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesData {
    /// Short weekday label, e.g. `Mon`.
    pub date: String,
    pub sales: Decimal,
    pub profit: Decimal,
    pub visitors: u32,
}

impl SalesData {
    /// Seven zeroed days ending at `today`, oldest first.
    #[must_use]
    pub fn initial_week(today: NaiveDate) -> Vec<Self> {
        (0..7u64)
            .rev()
            .map(|offset| {
                let day = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
                Self {
                    date: day.format("%a").to_string(),
                    sales: Decimal::ZERO,
                    profit: Decimal::ZERO,
                    visitors: 0,
                }
            })
            .collect()
    }
}

/// An entry of the live activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveActivity {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    pub timestamp: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub customer_location: Option<String>,
}

/// Newest-first feed capped at [`LIVE_FEED_CAPACITY`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiveFeed(Vec<LiveActivity>);

impl LiveFeed {
    /// Prepend an entry, dropping the oldest beyond capacity.
    pub fn push(&mut self, activity: LiveActivity) {
        self.0.insert(0, activity);
        self.0.truncate(LIVE_FEED_CAPACITY);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[LiveActivity] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LiveActivity> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a LiveFeed {
    type Item = &'a LiveActivity;
    type IntoIter = std::slice::Iter<'a, LiveActivity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(n: usize) -> LiveActivity {
        LiveActivity {
            id: ActivityId::new(n.to_string()),
            kind: ActivityKind::Visitor,
            message: format!("event {n}"),
            timestamp: JUST_NOW.to_string(),
            amount: None,
            customer_location: None,
        }
    }

    #[test]
    fn test_feed_is_newest_first_and_capped() {
        let mut feed = LiveFeed::default();
        for n in 0..25 {
            feed.push(activity(n));
        }

        assert_eq!(feed.len(), LIVE_FEED_CAPACITY);
        let ids: Vec<&str> = feed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.first().copied(), Some("24"));
        assert_eq!(ids.last().copied(), Some("5"));
    }

    #[test]
    fn test_initial_week_ends_today() {
        // 2026-03-04 is a Wednesday
        let today = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap_or_default();
        let week = SalesData::initial_week(today);
        let labels: Vec<&str> = week.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(labels, ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]);
        assert!(week.iter().all(|d| d.sales.is_zero() && d.visitors == 0));
    }
}
