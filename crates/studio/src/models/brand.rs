//! Brand identity: the design system a tenant's storefront is themed from.

use serde::{Deserialize, Serialize};

use super::store::StoreSettings;

/// Letter spacing preset for headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LetterSpacing {
    Tighter,
    Tight,
    #[default]
    Normal,
    Wide,
    Widest,
}

/// Button rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ButtonFinish {
    #[default]
    Flat,
    Gradient,
    Outline,
    Soft,
    Neo,
}

/// Form input rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputStyle {
    Modern,
    Filled,
    #[default]
    Outlined,
    Underlined,
}

/// Card rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardStyle {
    Flat,
    #[default]
    Shadow,
    Border,
    Glass,
}

/// Palette of the design system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub border: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: "#00A884".to_string(),
            secondary: "#111B21".to_string(),
            accent: "#34B7F1".to_string(),
            background: "#FFFFFF".to_string(),
            surface: "#F9FAFB".to_string(),
            text: "#111827".to_string(),
            border: "#E5E7EB".to_string(),
        }
    }
}

/// Type settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
    /// Type scale multiplier, 0.8 to 1.2.
    pub scale: f64,
    pub letter_spacing: LetterSpacing,
    /// CSS font weight, 400 to 900.
    pub heading_weight: u16,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            heading_font: "Inter".to_string(),
            body_font: "Inter".to_string(),
            scale: 1.0,
            letter_spacing: LetterSpacing::Normal,
            heading_weight: 700,
        }
    }
}

/// Surface treatment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styling {
    /// Corner radius in pixels.
    pub border_radius: u32,
    /// Border width in pixels.
    pub border_width: u32,
    /// 0 to 1.
    pub shadow_strength: f64,
    pub button_style: ButtonFinish,
    pub input_style: InputStyle,
    pub card_style: CardStyle,
    pub noise_texture: bool,
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            border_radius: 12,
            border_width: 1,
            shadow_strength: 0.5,
            button_style: ButtonFinish::Flat,
            input_style: InputStyle::Outlined,
            card_style: CardStyle::Shadow,
            noise_texture: false,
        }
    }
}

/// A tenant's brand identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandIdentity {
    pub mission: String,
    pub vision: String,
    pub values: Vec<String>,
    pub tone_of_voice: String,
    pub colors: BrandColors,
    pub typography: Typography,
    pub styling: Styling,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl Default for BrandIdentity {
    fn default() -> Self {
        Self {
            mission: "To inspire and innovate with every product we create.".to_string(),
            vision: "A world where quality and design are accessible to everyone.".to_string(),
            values: vec![
                "Quality".to_string(),
                "Integrity".to_string(),
                "Innovation".to_string(),
            ],
            tone_of_voice: "Friendly, Professional, and Trustworthy".to_string(),
            colors: BrandColors::default(),
            typography: Typography::default(),
            styling: Styling::default(),
            logo_url: None,
            favicon_url: None,
            cover_image: None,
        }
    }
}

// =============================================================================
// Patches
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandColorsPatch {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub background: Option<String>,
    pub surface: Option<String>,
    pub text: Option<String>,
    pub border: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypographyPatch {
    pub heading_font: Option<String>,
    pub body_font: Option<String>,
    pub scale: Option<f64>,
    pub letter_spacing: Option<LetterSpacing>,
    pub heading_weight: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StylingPatch {
    pub border_radius: Option<u32>,
    pub border_width: Option<u32>,
    pub shadow_strength: Option<f64>,
    pub button_style: Option<ButtonFinish>,
    pub input_style: Option<InputStyle>,
    pub card_style: Option<CardStyle>,
    pub noise_texture: Option<bool>,
}

/// Partial brand update. Nested groups merge field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandIdentityPatch {
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub values: Option<Vec<String>>,
    pub tone_of_voice: Option<String>,
    pub colors: Option<BrandColorsPatch>,
    pub typography: Option<TypographyPatch>,
    pub styling: Option<StylingPatch>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub cover_image: Option<String>,
}

impl BrandIdentity {
    /// Deep merge: top-level fields are replaced, nested groups are merged.
    pub fn apply(&mut self, patch: BrandIdentityPatch) {
        if let Some(colors) = patch.colors {
            merge_fields!(self.colors, colors; set: [
                primary, secondary, accent, background, surface, text, border,
            ]);
        }
        if let Some(typography) = patch.typography {
            merge_fields!(self.typography, typography; set: [
                heading_font, body_font, scale, letter_spacing, heading_weight,
            ]);
        }
        if let Some(styling) = patch.styling {
            merge_fields!(self.styling, styling; set: [
                border_radius,
                border_width,
                shadow_strength,
                button_style,
                input_style,
                card_style,
                noise_texture,
            ]);
        }
        merge_fields!(self, patch; set: [mission, vision, values, tone_of_voice]; wrap: [
            logo_url, favicon_url, cover_image,
        ]);
    }
}

/// Write the brand fields that the flat settings mirror.
///
/// Only fields present in the patch are projected; a zero border radius is a
/// value like any other.
pub fn project_brand_onto_settings(patch: &BrandIdentityPatch, settings: &mut StoreSettings) {
    if let Some(colors) = &patch.colors {
        if let Some(primary) = &colors.primary {
            settings.primary_color.clone_from(primary);
        }
        if let Some(background) = &colors.background {
            settings.background_color = Some(background.clone());
        }
        if let Some(text) = &colors.text {
            settings.text_color = Some(text.clone());
        }
    }
    if let Some(body_font) = patch.typography.as_ref().and_then(|t| t.body_font.as_ref()) {
        settings.font_family.clone_from(body_font);
    }
    if let Some(radius) = patch.styling.as_ref().and_then(|s| s.border_radius) {
        settings.border_radius = format!("{radius}px");
    }
    if let Some(logo) = &patch.logo_url {
        settings.logo.clone_from(logo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_merge_keeps_sibling_fields() {
        let mut identity = BrandIdentity::default();
        identity.apply(BrandIdentityPatch {
            colors: Some(BrandColorsPatch {
                primary: Some("#FF0000".to_string()),
                ..BrandColorsPatch::default()
            }),
            ..BrandIdentityPatch::default()
        });

        assert_eq!(identity.colors.primary, "#FF0000");
        assert_eq!(identity.colors.secondary, "#111B21");
        assert_eq!(identity.colors.accent, "#34B7F1");
        assert_eq!(identity.typography, Typography::default());
        assert_eq!(identity.mission, BrandIdentity::default().mission);
    }

    #[test]
    fn test_top_level_fields_replaced() {
        let mut identity = BrandIdentity::default();
        identity.apply(BrandIdentityPatch {
            values: Some(vec!["Speed".to_string()]),
            logo_url: Some("https://cdn.example.com/logo.png".to_string()),
            ..BrandIdentityPatch::default()
        });

        assert_eq!(identity.values, vec!["Speed".to_string()]);
        assert_eq!(
            identity.logo_url.as_deref(),
            Some("https://cdn.example.com/logo.png")
        );
    }

    #[test]
    fn test_projection_onto_settings() {
        let mut settings = StoreSettings::default();
        let patch = BrandIdentityPatch {
            colors: Some(BrandColorsPatch {
                primary: Some("#FF0000".to_string()),
                text: Some("#222222".to_string()),
                ..BrandColorsPatch::default()
            }),
            typography: Some(TypographyPatch {
                body_font: Some("Oswald".to_string()),
                ..TypographyPatch::default()
            }),
            styling: Some(StylingPatch {
                border_radius: Some(4),
                ..StylingPatch::default()
            }),
            logo_url: Some("https://cdn.example.com/l.png".to_string()),
            ..BrandIdentityPatch::default()
        };

        project_brand_onto_settings(&patch, &mut settings);

        assert_eq!(settings.primary_color, "#FF0000");
        assert_eq!(settings.text_color.as_deref(), Some("#222222"));
        assert_eq!(settings.background_color.as_deref(), Some("#FFFFFF"));
        assert_eq!(settings.font_family, "Oswald");
        assert_eq!(settings.border_radius, "4px");
        assert_eq!(settings.logo, "https://cdn.example.com/l.png");
    }

    #[test]
    fn test_zero_radius_is_projected() {
        let mut settings = StoreSettings::default();
        let patch = BrandIdentityPatch {
            styling: Some(StylingPatch {
                border_radius: Some(0),
                ..StylingPatch::default()
            }),
            ..BrandIdentityPatch::default()
        };
        project_brand_onto_settings(&patch, &mut settings);
        assert_eq!(settings.border_radius, "0px");
    }

    #[test]
    fn test_empty_patch_projects_nothing() {
        let mut settings = StoreSettings::default();
        project_brand_onto_settings(&BrandIdentityPatch::default(), &mut settings);
        assert_eq!(settings, StoreSettings::default());
    }
}
