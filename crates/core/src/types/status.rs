//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// New orders start `Unfulfilled` and move to `Fulfilled` when shipped;
/// `Paid` and `Refunded` are alternate end states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Paid,
    #[default]
    Unfulfilled,
    Fulfilled,
    Refunded,
}

/// What kind of goods a product represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Physical,
    Digital,
    Service,
    Subscription,
}

impl ProductType {
    /// Whether stock levels constrain how many units can be bought.
    ///
    /// Digital goods and services are never out of stock.
    #[must_use]
    pub const fn tracks_inventory(self) -> bool {
        !matches!(self, Self::Digital | Self::Service)
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Physical => write!(f, "physical"),
            Self::Digital => write!(f, "digital"),
            Self::Service => write!(f, "service"),
            Self::Subscription => write!(f, "subscription"),
        }
    }
}

impl std::str::FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physical" => Ok(Self::Physical),
            "digital" => Ok(Self::Digital),
            "service" => Ok(Self::Service),
            "subscription" => Ok(Self::Subscription),
            _ => Err(format!("invalid product type: {s}")),
        }
    }
}

/// Catalog visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
    Info,
}

/// Kind of event shown in a store's live activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Order,
    Visitor,
    Fulfillment,
    Payment,
}

/// Channel a marketing campaign runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignPlatform {
    Instagram,
    TikTok,
    Email,
    Blog,
    YouTube,
}

/// Scheduling state of a marketing campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

/// Tone detected in a customer review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

/// Direction of an adjacent section swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

impl std::fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for MoveDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(format!("invalid direction: {s}")),
        }
    }
}
