//! The tenant aggregate and its settings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeloom_core::{DEFAULT_TAX_RATE, SecretKey, StoreId};

use super::activity::{LiveFeed, SalesData};
use super::brand::BrandIdentity;
use super::marketing::{CustomerReview, MarketingCampaign, MarketingStats};
use super::order::{Discount, Order};
use super::product::Product;
use super::section::ProfileSection;

/// Accent colour used when the category matches no keyword.
pub const DEFAULT_ACCENT: &str = "#00A884";

const LOGO_PLACEHOLDER: &str = "https://via.placeholder.com/200x200?text=";

/// One independent storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    /// Synthetic payment account reference, set when created with platform keys.
    #[serde(default)]
    pub external_account_ref: Option<String>,
    pub settings: StoreSettings,
    pub brand_identity: BrandIdentity,
    #[serde(default)]
    pub campaigns: Vec<MarketingCampaign>,
    #[serde(default)]
    pub reviews: Vec<CustomerReview>,
    /// Catalog, newest first.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Orders, newest first.
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub discounts: Vec<Discount>,
    /// Seven days, oldest first; the last entry is "today".
    #[serde(default)]
    pub sales_data: Vec<SalesData>,
    #[serde(default)]
    pub live_feed: LiveFeed,
    #[serde(default)]
    pub payout_balance: Decimal,
    /// Page layout in display order.
    #[serde(default = "ProfileSection::defaults")]
    pub sections: Vec<ProfileSection>,
    #[serde(default)]
    pub marketing_stats: MarketingStats,
}

impl Store {
    /// Build a tenant with full defaults, themed by its category.
    ///
    /// Payment linkage is left empty; the caller stamps it from the global
    /// credentials.
    #[must_use]
    pub fn new(id: StoreId, name: &str, category: &str, today: NaiveDate) -> Self {
        let accent = accent_for_category(category);

        let mut settings = StoreSettings {
            name: name.to_string(),
            category: category.to_string(),
            primary_color: accent.to_string(),
            ..StoreSettings::default()
        };
        settings.logo = logo_placeholder(name);

        let mut brand_identity = BrandIdentity::default();
        accent.clone_into(&mut brand_identity.colors.primary);

        Self {
            id,
            external_account_ref: None,
            settings,
            brand_identity,
            campaigns: Vec::new(),
            reviews: Vec::new(),
            products: Vec::new(),
            orders: Vec::new(),
            discounts: Vec::new(),
            sales_data: SalesData::initial_week(today),
            live_feed: LiveFeed::default(),
            payout_balance: Decimal::ZERO,
            sections: ProfileSection::defaults(),
            marketing_stats: MarketingStats::default(),
        }
    }

    /// Display name, from settings.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &storeloom_core::ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Mutable product lookup.
    pub fn product_mut(&mut self, id: &storeloom_core::ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| &p.id == id)
    }

    /// Tax rate applied at checkout.
    #[must_use]
    pub fn tax_rate(&self) -> Decimal {
        self.settings.tax_rate.unwrap_or(DEFAULT_TAX_RATE)
    }
}

/// Theme colour for a category, matched by keyword on the lower-cased name.
///
/// Later keywords win when several match.
#[must_use]
pub fn accent_for_category(category: &str) -> &'static str {
    let lower = category.to_lowercase();
    let mut accent = DEFAULT_ACCENT;
    for (keyword, color) in [("fashion", "#111B21"), ("tech", "#007AFF"), ("beauty", "#E91E63")] {
        if lower.contains(keyword) {
            accent = color;
        }
    }
    accent
}

fn logo_placeholder(name: &str) -> String {
    let initial = name.chars().next().map(String::from).unwrap_or_default();
    format!("{LOGO_PLACEHOLDER}{initial}")
}

// =============================================================================
// Settings
// =============================================================================

/// Corner treatment of storefront buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ButtonShape {
    #[default]
    Rounded,
    Square,
    Pill,
}

/// Storefront presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Classic,
    Cinematic,
}

/// A profile link shown in the storefront footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Flat storefront settings.
///
/// Colour, font, radius and logo double as a legacy projection of the
/// [`BrandIdentity`]; see [`super::brand::project_brand_onto_settings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub name: String,
    pub description: String,
    pub bio: Option<String>,
    pub contact_email: String,
    pub category: String,
    pub currency: String,
    pub country: String,
    pub language: String,
    pub timezone: String,
    pub logo: String,
    pub banner: String,
    pub primary_color: String,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: String,
    /// CSS length, e.g. `12px`.
    pub border_radius: String,
    pub button_style: Option<ButtonShape>,
    pub view_mode: ViewMode,
    pub show_powered_by: bool,
    pub social_links: Vec<SocialLink>,
    pub beginner_mode: bool,
    pub is_paused: bool,
    pub drop_mode: bool,
    pub legal_pages_generated: bool,
    /// Whether payment keys are attached to this tenant.
    pub payment_enabled: bool,
    pub payment_public_key: String,
    /// Per-tenant override of the global secret key.
    pub payment_secret_key: SecretKey,
    pub tax_rate: Option<Decimal>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            name: "My Brand".to_string(),
            description: "Welcome to my official store.".to_string(),
            bio: Some("We create sustainable, high-quality products for modern living.".to_string()),
            contact_email: String::new(),
            category: "General".to_string(),
            currency: "USD".to_string(),
            country: "United States".to_string(),
            language: "English".to_string(),
            timezone: "UTC-05:00 Eastern Time".to_string(),
            logo: format!("{LOGO_PLACEHOLDER}Logo"),
            banner: "https://via.placeholder.com/1200x400?text=Store+Banner".to_string(),
            primary_color: DEFAULT_ACCENT.to_string(),
            secondary_color: None,
            background_color: Some("#FFFFFF".to_string()),
            text_color: Some("#111B21".to_string()),
            font_family: "Inter".to_string(),
            border_radius: "12px".to_string(),
            button_style: Some(ButtonShape::Rounded),
            view_mode: ViewMode::Classic,
            show_powered_by: true,
            social_links: vec![
                SocialLink {
                    platform: "Instagram".to_string(),
                    url: "#".to_string(),
                },
                SocialLink {
                    platform: "TikTok".to_string(),
                    url: "#".to_string(),
                },
            ],
            beginner_mode: true,
            is_paused: false,
            drop_mode: false,
            legal_pages_generated: false,
            payment_enabled: false,
            payment_public_key: String::new(),
            payment_secret_key: SecretKey::default(),
            tax_rate: Some(DEFAULT_TAX_RATE),
        }
    }
}

/// Partial settings update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub bio: Option<String>,
    pub contact_email: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub border_radius: Option<String>,
    pub button_style: Option<ButtonShape>,
    pub view_mode: Option<ViewMode>,
    pub show_powered_by: Option<bool>,
    pub social_links: Option<Vec<SocialLink>>,
    pub beginner_mode: Option<bool>,
    pub is_paused: Option<bool>,
    pub drop_mode: Option<bool>,
    pub legal_pages_generated: Option<bool>,
    pub payment_secret_key: Option<SecretKey>,
    pub tax_rate: Option<Decimal>,
}

impl StoreSettings {
    /// Shallow merge of a patch.
    pub fn apply(&mut self, patch: SettingsPatch) {
        merge_fields!(self, patch; set: [
            name,
            description,
            contact_email,
            category,
            currency,
            country,
            language,
            timezone,
            logo,
            banner,
            primary_color,
            font_family,
            border_radius,
            view_mode,
            show_powered_by,
            social_links,
            beginner_mode,
            is_paused,
            drop_mode,
            legal_pages_generated,
            payment_secret_key,
        ]; wrap: [
            bio,
            secondary_color,
            background_color,
            text_color,
            button_style,
            tax_rate,
        ]);
    }
}
