//! Page sections: an ordered list of typed content blocks.
//!
//! Every block type has its own content record. [`SectionContent`] is the
//! tagged union over them and serializes as an object whose `type` field is
//! the kebab-case block tag, e.g. `{"type": "hero", "headline": ...}`.
//!
//! Content updates are shallow JSON merges: the patch object's keys replace
//! the same keys of the current content, then the result must still parse as
//! the same block type.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use storeloom_core::SectionId;

/// Block type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Hero,
    Text,
    Image,
    Links,
    Video,
    Products,
    FeaturedProduct,
    Testimonial,
    Newsletter,
    Countdown,
    Faq,
    Gallery,
    Contact,
    VideoHero,
    Features,
    Story,
    Map,
    Pricing,
    Stats,
    Partners,
    Collections,
    Banner,
    Instagram,
}

impl SectionType {
    /// Every block type, in palette order.
    pub const ALL: [Self; 23] = [
        Self::Hero,
        Self::Text,
        Self::Image,
        Self::Links,
        Self::Video,
        Self::Products,
        Self::FeaturedProduct,
        Self::Testimonial,
        Self::Newsletter,
        Self::Countdown,
        Self::Faq,
        Self::Gallery,
        Self::Contact,
        Self::VideoHero,
        Self::Features,
        Self::Story,
        Self::Map,
        Self::Pricing,
        Self::Stats,
        Self::Partners,
        Self::Collections,
        Self::Banner,
        Self::Instagram,
    ];

    /// The kebab-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Text => "text",
            Self::Image => "image",
            Self::Links => "links",
            Self::Video => "video",
            Self::Products => "products",
            Self::FeaturedProduct => "featured-product",
            Self::Testimonial => "testimonial",
            Self::Newsletter => "newsletter",
            Self::Countdown => "countdown",
            Self::Faq => "faq",
            Self::Gallery => "gallery",
            Self::Contact => "contact",
            Self::VideoHero => "video-hero",
            Self::Features => "features",
            Self::Story => "story",
            Self::Map => "map",
            Self::Pricing => "pricing",
            Self::Stats => "stats",
            Self::Partners => "partners",
            Self::Collections => "collections",
            Self::Banner => "banner",
            Self::Instagram => "instagram",
        }
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid section type: {s}"))
    }
}

// =============================================================================
// Content records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    pub headline: String,
    pub subheadline: String,
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContent {
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub id: String,
    pub label: String,
    pub url: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksContent {
    pub links: Vec<LinkItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsContent {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedProductContent {
    /// Empty until a product is picked.
    pub product_id: String,
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialContent {
    pub quote: String,
    pub author: String,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterContent {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownContent {
    pub title: String,
    pub target_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqContent {
    pub title: String,
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGridContent {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactContent {
    pub title: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoHeroContent {
    pub video_url: String,
    pub headline: String,
    pub subheadline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub title: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesContent {
    pub title: String,
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryContent {
    pub title: String,
    pub text: String,
    pub image_url: String,
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapContent {
    pub address: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub name: String,
    /// Display price, e.g. `$29`.
    pub price: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingContent {
    pub title: String,
    pub plans: Vec<PricingPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsContent {
    pub items: Vec<StatItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnersContent {
    pub title: String,
    pub logos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionTile {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsContent {
    pub title: String,
    pub collections: Vec<CollectionTile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerContent {
    pub text: String,
    pub background_color: String,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramContent {
    pub title: String,
    pub images: Vec<String>,
}

/// Typed content of a block, tagged by [`SectionType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SectionContent {
    Hero(HeroContent),
    Text(TextContent),
    Image(MediaContent),
    Links(LinksContent),
    Video(MediaContent),
    Products(ProductsContent),
    FeaturedProduct(FeaturedProductContent),
    Testimonial(TestimonialContent),
    Newsletter(NewsletterContent),
    Countdown(CountdownContent),
    Faq(FaqContent),
    Gallery(ImageGridContent),
    Contact(ContactContent),
    VideoHero(VideoHeroContent),
    Features(FeaturesContent),
    Story(StoryContent),
    Map(MapContent),
    Pricing(PricingContent),
    Stats(StatsContent),
    Partners(PartnersContent),
    Collections(CollectionsContent),
    Banner(BannerContent),
    Instagram(InstagramContent),
}

/// Error from a content patch that does not fit the block type.
#[derive(Debug, Error)]
pub enum SectionPatchError {
    #[error("content patch must be a JSON object")]
    NotAnObject,
    #[error("{0}")]
    Invalid(#[from] serde_json::Error),
}

const PLACEHOLDER: &str = "https://via.placeholder.com";

fn placeholder(size: &str) -> String {
    format!("{PLACEHOLDER}/{size}")
}

fn strings<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

impl SectionContent {
    /// The block type this content belongs to.
    #[must_use]
    pub const fn kind(&self) -> SectionType {
        match self {
            Self::Hero(_) => SectionType::Hero,
            Self::Text(_) => SectionType::Text,
            Self::Image(_) => SectionType::Image,
            Self::Links(_) => SectionType::Links,
            Self::Video(_) => SectionType::Video,
            Self::Products(_) => SectionType::Products,
            Self::FeaturedProduct(_) => SectionType::FeaturedProduct,
            Self::Testimonial(_) => SectionType::Testimonial,
            Self::Newsletter(_) => SectionType::Newsletter,
            Self::Countdown(_) => SectionType::Countdown,
            Self::Faq(_) => SectionType::Faq,
            Self::Gallery(_) => SectionType::Gallery,
            Self::Contact(_) => SectionType::Contact,
            Self::VideoHero(_) => SectionType::VideoHero,
            Self::Features(_) => SectionType::Features,
            Self::Story(_) => SectionType::Story,
            Self::Map(_) => SectionType::Map,
            Self::Pricing(_) => SectionType::Pricing,
            Self::Stats(_) => SectionType::Stats,
            Self::Partners(_) => SectionType::Partners,
            Self::Collections(_) => SectionType::Collections,
            Self::Banner(_) => SectionType::Banner,
            Self::Instagram(_) => SectionType::Instagram,
        }
    }

    /// Starter content for a freshly added block.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn default_for(kind: SectionType, now: DateTime<Utc>) -> Self {
        match kind {
            SectionType::Hero => Self::Hero(HeroContent {
                headline: "Your Headline Here".to_string(),
                subheadline: "Describe your value proposition.".to_string(),
                layout: "center".to_string(),
            }),
            SectionType::Text => Self::Text(TextContent {
                text: "Write something engaging about your brand here.".to_string(),
            }),
            SectionType::Image => Self::Image(MediaContent {
                url: placeholder("800x400"),
                caption: String::new(),
            }),
            SectionType::Links => Self::Links(LinksContent {
                links: vec![LinkItem {
                    id: "1".to_string(),
                    label: "New Link".to_string(),
                    url: "#".to_string(),
                    style: "solid".to_string(),
                }],
            }),
            SectionType::Video => Self::Video(MediaContent {
                url: String::new(),
                caption: String::new(),
            }),
            SectionType::Products => Self::Products(ProductsContent {
                title: "Featured Products".to_string(),
            }),
            SectionType::FeaturedProduct => Self::FeaturedProduct(FeaturedProductContent {
                product_id: String::new(),
                layout: "split".to_string(),
            }),
            SectionType::Testimonial => Self::Testimonial(TestimonialContent {
                quote: "Share a customer review here.".to_string(),
                author: "Customer Name".to_string(),
                rating: 5,
            }),
            SectionType::Newsletter => Self::Newsletter(NewsletterContent {
                title: "Join the Club".to_string(),
                subtitle: "Get exclusive offers.".to_string(),
            }),
            SectionType::Countdown => Self::Countdown(CountdownContent {
                title: "Next Drop In".to_string(),
                target_date: now + Duration::days(1),
            }),
            SectionType::Faq => Self::Faq(FaqContent {
                title: "Common Questions".to_string(),
                items: vec![FaqItem {
                    question: "Shipping policy?".to_string(),
                    answer: "We ship worldwide.".to_string(),
                }],
            }),
            SectionType::Gallery => Self::Gallery(ImageGridContent {
                images: vec![placeholder("300"), placeholder("300")],
            }),
            SectionType::Contact => Self::Contact(ContactContent {
                title: "Get in Touch".to_string(),
                email: "support@brand.com".to_string(),
            }),
            SectionType::VideoHero => Self::VideoHero(VideoHeroContent {
                video_url: "https://www.w3schools.com/html/mov_bbb.mp4".to_string(),
                headline: "Cinematic Experience".to_string(),
                subheadline: "Watch our story unfold.".to_string(),
            }),
            SectionType::Features => Self::Features(FeaturesContent {
                title: "Why Choose Us".to_string(),
                items: [
                    ("Fast Shipping", "2-day delivery"),
                    ("Secure", "Encrypted payments"),
                    ("Support", "24/7 assistance"),
                ]
                .into_iter()
                .map(|(title, desc)| FeatureItem {
                    title: title.to_string(),
                    desc: desc.to_string(),
                })
                .collect(),
            }),
            SectionType::Story => Self::Story(StoryContent {
                title: "Our Origins".to_string(),
                text: "It started with a simple idea...".to_string(),
                image_url: placeholder("600x400"),
                layout: "image-left".to_string(),
            }),
            SectionType::Map => Self::Map(MapContent {
                address: "123 Commerce St, New York, NY".to_string(),
                title: "Visit Our Flagship".to_string(),
            }),
            SectionType::Pricing => Self::Pricing(PricingContent {
                title: "Plans".to_string(),
                plans: vec![
                    PricingPlan {
                        name: "Starter".to_string(),
                        price: "$0".to_string(),
                        features: strings(["Basic access"]),
                    },
                    PricingPlan {
                        name: "Pro".to_string(),
                        price: "$29".to_string(),
                        features: strings(["Full access", "Priority support"]),
                    },
                ],
            }),
            SectionType::Stats => Self::Stats(StatsContent {
                items: [
                    ("Happy Customers", "10k+"),
                    ("Years", "5+"),
                    ("Products", "500+"),
                ]
                .into_iter()
                .map(|(label, value)| StatItem {
                    label: label.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            }),
            SectionType::Partners => Self::Partners(PartnersContent {
                title: "Trusted By".to_string(),
                logos: vec![placeholder("100x50"); 3],
            }),
            SectionType::Collections => Self::Collections(CollectionsContent {
                title: "Shop by Category".to_string(),
                collections: ["Summer", "Winter"]
                    .into_iter()
                    .map(|name| CollectionTile {
                        name: name.to_string(),
                        image: placeholder("300"),
                    })
                    .collect(),
            }),
            SectionType::Banner => Self::Banner(BannerContent {
                text: "Free shipping on orders over $50!".to_string(),
                background_color: "#000000".to_string(),
                text_color: "#ffffff".to_string(),
            }),
            SectionType::Instagram => Self::Instagram(InstagramContent {
                title: "@MyBrand".to_string(),
                images: vec![placeholder("200"); 4],
            }),
        }
    }

    /// Shallow-merge a JSON object patch into this content.
    ///
    /// The `type` key of the patch is ignored; a block never changes type.
    /// `null` is treated as an empty patch.
    ///
    /// # Errors
    ///
    /// Returns [`SectionPatchError`] if the patch is not an object or the
    /// merged content no longer parses as this block type.
    pub fn merged(&self, patch: &Value) -> Result<Self, SectionPatchError> {
        let fields = match patch {
            Value::Null => return Ok(self.clone()),
            Value::Object(fields) => fields,
            _ => return Err(SectionPatchError::NotAnObject),
        };

        let mut current = serde_json::to_value(self)?;
        let Value::Object(target) = &mut current else {
            return Err(SectionPatchError::NotAnObject);
        };
        for (key, value) in fields {
            if key != "type" {
                target.insert(key.clone(), value.clone());
            }
        }

        Ok(serde_json::from_value(current)?)
    }
}

/// One block of a tenant's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSection {
    pub id: SectionId,
    #[serde(default)]
    pub title: Option<String>,
    pub is_visible: bool,
    pub content: SectionContent,
}

impl ProfileSection {
    /// The block type.
    #[must_use]
    pub const fn kind(&self) -> SectionType {
        self.content.kind()
    }

    /// Layout of a new tenant: a welcome hero followed by the product grid.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                id: SectionId::new("hero-default"),
                title: None,
                is_visible: true,
                content: SectionContent::Hero(HeroContent {
                    headline: "Welcome to My Store".to_string(),
                    subheadline: "Discover unique products curated just for you.".to_string(),
                    layout: "center".to_string(),
                }),
            },
            Self {
                id: SectionId::new("products-default"),
                title: None,
                is_visible: true,
                content: SectionContent::Products(ProductsContent {
                    title: "Latest Drops".to_string(),
                }),
            },
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_content_matches_kind() {
        let now = Utc::now();
        for kind in SectionType::ALL {
            assert_eq!(SectionContent::default_for(kind, now).kind(), kind);
        }
    }

    #[test]
    fn test_section_type_round_trips_through_str() {
        for kind in SectionType::ALL {
            assert_eq!(kind.as_str().parse::<SectionType>().unwrap(), kind);
        }
        assert!("carousel".parse::<SectionType>().is_err());
    }

    #[test]
    fn test_countdown_targets_next_day() {
        let now = Utc::now();
        let SectionContent::Countdown(countdown) =
            SectionContent::default_for(SectionType::Countdown, now)
        else {
            panic!("expected countdown");
        };
        assert_eq!(countdown.target_date - now, Duration::days(1));
    }

    #[test]
    fn test_serialized_shape() {
        let content = SectionContent::default_for(SectionType::FeaturedProduct, Utc::now());
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(
            value,
            json!({"type": "featured-product", "product_id": "", "layout": "split"})
        );
    }

    #[test]
    fn test_merge_replaces_only_given_keys() {
        let content = SectionContent::default_for(SectionType::Hero, Utc::now());
        let merged = content.merged(&json!({"headline": "Fresh Drops"})).unwrap();

        let SectionContent::Hero(hero) = merged else {
            panic!("expected hero");
        };
        assert_eq!(hero.headline, "Fresh Drops");
        assert_eq!(hero.subheadline, "Describe your value proposition.");
    }

    #[test]
    fn test_merge_cannot_change_type() {
        let content = SectionContent::default_for(SectionType::Text, Utc::now());
        let merged = content
            .merged(&json!({"type": "banner", "text": "Hi"}))
            .unwrap();
        assert_eq!(merged.kind(), SectionType::Text);
    }

    #[test]
    fn test_merge_rejects_wrong_shape() {
        let content = SectionContent::default_for(SectionType::Testimonial, Utc::now());
        assert!(matches!(
            content.merged(&json!({"rating": "five"})),
            Err(SectionPatchError::Invalid(_))
        ));
        assert!(matches!(
            content.merged(&json!(["rating"])),
            Err(SectionPatchError::NotAnObject)
        ));
    }

    #[test]
    fn test_merge_null_is_noop() {
        let content = SectionContent::default_for(SectionType::Map, Utc::now());
        assert_eq!(content.merged(&Value::Null).unwrap(), content);
    }
}
