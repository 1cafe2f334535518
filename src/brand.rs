//! Brand asset data model.
//!
//! A `BrandAsset` is the structured artifact produced by the generation stage
//! and consumed by the evaluation stage. Every field defaults to empty so a
//! partially populated tree never breaks downstream scoring; the gap-fill
//! pass in the generator replaces the slots that matter.

use serde::{Deserialize, Serialize};

/// Top-level brand asset document.
///
/// `brand_name` and `brand_assets` are required by the evaluation API; the
/// remaining top-level sections are optional context that some analysis
/// prompts reference but scoring tolerates being absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandAsset {
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub brand_assets: BrandAssets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_analysis: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_research: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandAssets {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand_image: BrandImage,
    #[serde(default)]
    pub user_personas: UserPersonas,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandImage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand_positioning: BrandPositioning,
    #[serde(default)]
    pub brand_expression: BrandExpression,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandPositioning {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub we_believe: PointList,
    #[serde(default)]
    pub we_oppose: PointList,
    #[serde(default)]
    pub brand_mission: TitledDescription,
    #[serde(default)]
    pub why_choose_us: WhyChooseUs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointList {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitledDescription {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhyChooseUs {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub additional_info: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandExpression {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language_style: LanguageStyle,
    #[serde(default)]
    pub brand_slogan: BrandSlogan,
    #[serde(default)]
    pub color_style: ColorStyle,
    #[serde(default)]
    pub tone: TitledDescription,
    #[serde(default)]
    pub icon: Placeholder,
    #[serde(default)]
    pub font_layout: Placeholder,
    #[serde(default)]
    pub web_link: WebLink,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageStyle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandSlogan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slogan: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorStyle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub palettes: Vec<Palette>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub secondary_background_color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Placeholder {
    #[serde(default)]
    pub placeholder: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebLink {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPersonas {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub personas: Vec<Persona>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_gender: String,
    #[serde(default)]
    pub percentage_in_group: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub user_characteristics: Vec<Characteristic>,
    #[serde(default)]
    pub user_scenarios: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Characteristic {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub percentage: f64,
}

/// Default persona used when the generator cannot extract one.
pub fn default_persona() -> Persona {
    Persona {
        id: "persona_1".to_string(),
        title: "目标用户".to_string(),
        avatar: "用户头像占位符".to_string(),
        name: "典型用户".to_string(),
        age_gender: "25-35岁，男女不限".to_string(),
        percentage_in_group: "60%".to_string(),
        description: "对品质有要求的消费者".to_string(),
        pain_points: vec![
            "产品质量不稳定".to_string(),
            "服务响应慢".to_string(),
            "价格不透明".to_string(),
        ],
        user_characteristics: vec![
            Characteristic {
                keyword: "品质导向".to_string(),
                percentage: 85.0,
            },
            Characteristic {
                keyword: "价格敏感".to_string(),
                percentage: 70.0,
            },
        ],
        user_scenarios: vec!["日常使用".to_string(), "特殊需求".to_string()],
    }
}

/// Default color palette used when the generator cannot extract one.
pub fn default_palette() -> Palette {
    Palette {
        name: "主色调".to_string(),
        primary_color: "#2563eb".to_string(),
        secondary_color: "#64748b".to_string(),
        background_color: "#ffffff".to_string(),
        secondary_background_color: "#f8fafc".to_string(),
    }
}
