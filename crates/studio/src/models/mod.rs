//! Domain models for a storefront tenant.
//!
//! Everything here is plain data plus pure transformations. Models are
//! serialized whole into snapshots, so every type derives serde.

/// Copy every `Some` field of a patch onto its target.
///
/// `set` fields are assigned as-is, `wrap` fields are assigned as `Some(value)`
/// on an optional target field.
macro_rules! merge_fields {
    ($target:expr, $patch:expr; set: [$($field:ident),* $(,)?] $(; wrap: [$($opt:ident),* $(,)?])?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )*
        $($(
            if let Some(value) = $patch.$opt {
                $target.$opt = Some(value);
            }
        )*)?
    };
}

pub mod activity;
pub mod brand;
pub mod marketing;
pub mod order;
pub mod product;
pub mod section;
pub mod store;

pub use activity::{LiveActivity, LiveFeed, SalesData, LIVE_FEED_CAPACITY};
pub use brand::{
    BrandColors, BrandColorsPatch, BrandIdentity, BrandIdentityPatch, ButtonFinish, CardStyle,
    InputStyle, LetterSpacing, Styling, StylingPatch, Typography, TypographyPatch,
    project_brand_onto_settings,
};
pub use marketing::{
    CustomerReview, MarketingCampaign, MarketingStats, MarketingStatsPatch, RANK_TITLES,
};
pub use order::{CartItem, Customer, Discount, Order, OrderTotals};
pub use product::{BuyerQuestion, Product, ProductOption, ProductPatch, ProductVariant, QuestionKind};
pub use section::{ProfileSection, SectionContent, SectionPatchError, SectionType};
pub use store::{ButtonShape, SettingsPatch, SocialLink, Store, StoreSettings, ViewMode};
