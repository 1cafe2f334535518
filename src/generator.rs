//! Brand asset generation from free text.
//!
//! Each sub-step is one completion call that must return JSON; the
//! orchestrator sequences them (the three section generators run in
//! parallel) and the final gap-fill pass guarantees the required slots of
//! the asset tree are populated.

use std::sync::Arc;

use serde_json::Value;

use crate::brand::{
    default_palette, default_persona, BrandAsset, BrandExpression, BrandPositioning, UserPersonas,
};
use crate::llm::{LlmClient, LlmClientExt};

const DEFAULT_BRAND_NAME: &str = "未命名品牌";

/// Basic brand facts pulled out of the raw text before the detailed
/// sections are generated.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BasicBrandInfo {
    pub brand_name: String,
    pub brand_description: String,
}

/// Generates a structured `BrandAsset` from a free-text brand description.
pub struct AssetGenerator {
    llm: Arc<dyn LlmClient>,
}

impl AssetGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Sub-step 1: extract the brand name and a short description.
    pub async fn basic_info(&self, content: &str) -> anyhow::Result<BasicBrandInfo> {
        let prompt = format!(
            "请仔细分析以下品牌内容，并提取基本信息：\n{content}\n\
             请根据上述内容生成JSON格式的基本品牌信息：\n\
             {{\n  \"brand_name\": \"品牌名称\",\n  \"brand_description\": \"品牌简介\",\n  \"industry\": \"所属行业\",\n  \"main_products\": [\"主要产品1\", \"主要产品2\"]\n}}\n\
             重要：请提取真实具体的信息，不要使用模板化的占位符文字。只返回JSON，不要其他文字。"
        );
        let value = self
            .llm
            .json("你是品牌分析专家，请提取品牌基本信息。", &prompt)
            .await?;

        let brand_name = value["brand_name"]
            .as_str()
            .unwrap_or(DEFAULT_BRAND_NAME)
            .to_string();
        let brand_description = value["brand_description"].as_str().unwrap_or("").to_string();

        Ok(BasicBrandInfo {
            brand_name,
            brand_description,
        })
    }

    /// Sub-step 2a: brand positioning section.
    pub async fn positioning(
        &self,
        content: &str,
        brand_name: &str,
    ) -> anyhow::Result<BrandPositioning> {
        let prompt = format!(
            "请仔细分析以下{brand_name}的品牌内容，并基于内容生成具体的品牌定位信息：\n\n{content}\n\n\
             请返回JSON格式：\n\
             {{\n  \"title\": \"品牌定位\",\n  \"description\": \"品牌定位描述\",\n  \"we_believe\": {{\"title\": \"我们相信\", \"points\": [\"信念点1\", \"信念点2\", \"信念点3\"]}},\n  \"we_oppose\": {{\"title\": \"我们反对\", \"points\": [\"反对点1\", \"反对点2\", \"反对点3\"]}},\n  \"brand_mission\": {{\"title\": \"品牌使命\", \"description\": \"品牌使命描述\"}},\n  \"why_choose_us\": {{\"title\": \"为什么选择我们\", \"reason\": \"选择理由\", \"statement\": \"价值主张\", \"additional_info\": \"补充信息\"}}\n}}\n\
             重要：请根据品牌内容生成真实具体的内容，不要使用模板化的占位符文字。只返回JSON，不要其他文字。"
        );
        let value = self
            .llm
            .json("你是品牌定位专家，请生成品牌定位信息。", &prompt)
            .await?;
        Ok(section_from_value(value))
    }

    /// Sub-step 2b: brand expression section (language, slogan, colors, tone).
    pub async fn expression(
        &self,
        content: &str,
        brand_name: &str,
    ) -> anyhow::Result<BrandExpression> {
        let prompt = format!(
            "请仔细分析以下{brand_name}的品牌内容，并基于内容生成具体的品牌表达信息：\n\n{content}\n\n\
             请返回JSON格式：\n\
             {{\n  \"title\": \"品牌表达\",\n  \"description\": \"品牌表达描述\",\n  \"language_style\": {{\"title\": \"语言风格\", \"options\": [\"风格1\", \"风格2\", \"风格3\"]}},\n  \"brand_slogan\": {{\"title\": \"品牌口号\", \"slogan\": \"品牌口号内容\"}},\n  \"color_style\": {{\"title\": \"色彩风格\", \"description\": \"色彩风格描述\", \"palettes\": [{{\"name\": \"主色调\", \"primary_color\": \"#主色值\", \"secondary_color\": \"#辅助色值\", \"background_color\": \"#背景色值\", \"secondary_background_color\": \"#次背景色值\"}}]}},\n  \"tone\": {{\"title\": \"品牌调性\", \"description\": \"品牌调性描述\"}},\n  \"icon\": {{\"placeholder\": \"图标占位符\"}},\n  \"font_layout\": {{\"placeholder\": \"字体布局占位符\"}},\n  \"web_link\": {{\"url\": \"网站链接\"}}\n}}\n\
             颜色值请使用标准十六进制格式（如#FF5733）。品牌口号要朗朗上口且符合品牌定位。只返回JSON，不要其他文字。"
        );
        let value = self
            .llm
            .json("你是品牌表达专家，请生成品牌视觉和语言表达信息。", &prompt)
            .await?;
        Ok(section_from_value(value))
    }

    /// Sub-step 2c: user persona section (1-3 personas).
    pub async fn personas(&self, content: &str, brand_name: &str) -> anyhow::Result<UserPersonas> {
        let prompt = format!(
            "请仔细分析以下{brand_name}的品牌内容，并基于内容生成具体的用户画像信息：\n\n{content}\n\n\
             请返回JSON格式：\n\
             {{\n  \"title\": \"用户画像\",\n  \"description\": \"用户画像描述\",\n  \"personas\": [{{\n    \"id\": \"persona_1\",\n    \"title\": \"用户画像1\",\n    \"avatar\": \"头像占位符\",\n    \"name\": \"用户名称\",\n    \"age_gender\": \"年龄性别\",\n    \"percentage_in_group\": \"占比\",\n    \"description\": \"用户描述\",\n    \"pain_points\": [\"痛点1\", \"痛点2\", \"痛点3\"],\n    \"user_characteristics\": [{{\"keyword\": \"特征关键词\", \"percentage\": 80}}],\n    \"user_scenarios\": [\"使用场景1\", \"使用场景2\"]\n  }}]\n}}\n\
             请生成1-3个不同的用户画像，用户画像要符合品牌的目标客户群体。只返回JSON，不要其他文字。"
        );
        let value = self
            .llm
            .json("你是用户研究专家，请生成详细的用户画像。", &prompt)
            .await?;
        let mut personas: UserPersonas = section_from_value(value);
        personas.personas.truncate(3);
        Ok(personas)
    }

    /// Sub-step 3: assemble the sections into the asset tree. Pure.
    pub fn assemble(
        &self,
        basic: &BasicBrandInfo,
        positioning: BrandPositioning,
        expression: BrandExpression,
        personas: UserPersonas,
    ) -> BrandAsset {
        let mut asset = BrandAsset::default();
        asset.brand_name = if basic.brand_name.is_empty() {
            DEFAULT_BRAND_NAME.to_string()
        } else {
            basic.brand_name.clone()
        };
        asset.brand_assets.title = "品牌资产".to_string();
        asset.brand_assets.description = if basic.brand_description.is_empty() {
            "品牌资产描述".to_string()
        } else {
            basic.brand_description.clone()
        };
        asset.brand_assets.brand_image.title = "品牌形象".to_string();
        asset.brand_assets.brand_image.description = "品牌形象描述".to_string();
        asset.brand_assets.brand_image.brand_positioning = positioning;
        asset.brand_assets.brand_image.brand_expression = expression;
        asset.brand_assets.user_personas = personas;
        asset
    }

    /// Sub-step 4: fill the required slots that came back empty.
    ///
    /// For substantive slots one completion attempt is made first; the static
    /// defaults below are the sanctioned fallbacks when that attempt fails.
    /// Never errors: a generated asset always leaves this step complete.
    pub async fn validate_and_fill(&self, mut asset: BrandAsset, content: &str) -> BrandAsset {
        if asset.brand_name.is_empty() {
            asset.brand_name = DEFAULT_BRAND_NAME.to_string();
        }
        let brand_name = asset.brand_name.clone();

        if asset.brand_assets.title.is_empty() {
            asset.brand_assets.title = "品牌资产".to_string();
        }
        if asset.brand_assets.description.is_empty() {
            asset.brand_assets.description = "品牌资产描述".to_string();
        }

        let image = &mut asset.brand_assets.brand_image;
        if image.title.is_empty() {
            image.title = "品牌形象".to_string();
        }
        if image.description.is_empty() {
            image.description = "品牌形象描述".to_string();
        }

        let positioning = &mut image.brand_positioning;
        if positioning.title.is_empty() {
            positioning.title = "品牌定位".to_string();
        }
        if positioning.we_believe.points.is_empty() {
            positioning.we_believe.points = self
                .fill_string_list("we_believe.points", content, &brand_name)
                .await
                .unwrap_or_else(|| vec!["创新驱动价值".to_string(), "用户体验至上".to_string()]);
        }
        if positioning.we_oppose.points.is_empty() {
            positioning.we_oppose.points = self
                .fill_string_list("we_oppose.points", content, &brand_name)
                .await
                .unwrap_or_else(|| vec!["低质量产品".to_string(), "虚假宣传".to_string()]);
        }
        if positioning.brand_mission.description.is_empty() {
            positioning.brand_mission.description = self
                .fill_text("brand_mission.description", content, &brand_name)
                .await
                .unwrap_or_else(|| "为用户创造价值".to_string());
        }

        let expression = &mut image.brand_expression;
        if expression.language_style.options.is_empty() {
            expression.language_style.options = self
                .fill_string_list("language_style.options", content, &brand_name)
                .await
                .unwrap_or_else(|| vec!["专业".to_string(), "友好".to_string()]);
        }
        if expression.brand_slogan.slogan.is_empty() {
            expression.brand_slogan.slogan = self
                .fill_text("brand_slogan.slogan", content, &brand_name)
                .await
                .unwrap_or_else(|| "创新引领未来".to_string());
        }
        if expression.color_style.palettes.is_empty() {
            expression.color_style.palettes = vec![default_palette()];
        }

        if asset.brand_assets.user_personas.personas.is_empty() {
            asset.brand_assets.user_personas.personas = vec![default_persona()];
        }

        asset
    }

    /// Ask the model for one missing field; `None` means fall back to the
    /// static default.
    async fn fill_field(&self, field: &str, content: &str, brand_name: &str) -> Option<Value> {
        let prompt = format!(
            "请为品牌\"{brand_name}\"生成缺失的字段\"{field}\"的值。\n\n品牌内容：{content}\n\n\
             请根据字段路径返回合适的值，格式为JSON对象 {{\"value\": ...}}。只返回JSON，不要其他文字。"
        );
        match self
            .llm
            .json("你是品牌数据补全专家，请生成缺失字段的合理值。", &prompt)
            .await
        {
            Ok(value) => Some(value.get("value").cloned().unwrap_or(value)),
            Err(e) => {
                tracing::warn!(field, "field gap-fill failed, using default: {}", e);
                None
            }
        }
    }

    async fn fill_string_list(
        &self,
        field: &str,
        content: &str,
        brand_name: &str,
    ) -> Option<Vec<String>> {
        let value = self.fill_field(field, content, brand_name).await?;
        let list: Vec<String> = value
            .as_array()?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        (!list.is_empty()).then_some(list)
    }

    async fn fill_text(&self, field: &str, content: &str, brand_name: &str) -> Option<String> {
        let value = self.fill_field(field, content, brand_name).await?;
        let text = value.as_str()?.to_string();
        (!text.is_empty()).then_some(text)
    }
}

/// Deserialize a generated section, tolerating missing fields.
fn section_from_value<T: serde::de::DeserializeOwned + Default>(value: Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, ChatOptions};
    use async_trait::async_trait;

    /// Fake completion client that always fails; gap-fill must still finish.
    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: ChatOptions,
        ) -> anyhow::Result<String> {
            anyhow::bail!("completion service unreachable")
        }
    }

    /// Fake completion client returning a fixed response.
    struct FixedLlm(String);

    #[async_trait]
    impl LlmClient for FixedLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: ChatOptions,
        ) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_validate_and_fill_uses_defaults_when_llm_fails() {
        let generator = AssetGenerator::new(Arc::new(FailingLlm));
        let asset = generator
            .validate_and_fill(BrandAsset::default(), "一家咖啡店")
            .await;

        assert_eq!(asset.brand_name, DEFAULT_BRAND_NAME);
        let positioning = &asset.brand_assets.brand_image.brand_positioning;
        assert!(!positioning.we_believe.points.is_empty());
        assert!(!positioning.brand_mission.description.is_empty());
        let expression = &asset.brand_assets.brand_image.brand_expression;
        assert_eq!(expression.brand_slogan.slogan, "创新引领未来");
        assert_eq!(expression.color_style.palettes.len(), 1);
        assert_eq!(asset.brand_assets.user_personas.personas.len(), 1);
    }

    #[tokio::test]
    async fn test_basic_info_parses_json() {
        let generator = AssetGenerator::new(Arc::new(FixedLlm(
            r#"{"brand_name": "星辰咖啡", "brand_description": "精品咖啡品牌"}"#.to_string(),
        )));
        let info = generator.basic_info("星辰咖啡的介绍").await.unwrap();
        assert_eq!(info.brand_name, "星辰咖啡");
        assert_eq!(info.brand_description, "精品咖啡品牌");
    }

    #[tokio::test]
    async fn test_basic_info_propagates_collaborator_failure() {
        let generator = AssetGenerator::new(Arc::new(FailingLlm));
        assert!(generator.basic_info("星辰咖啡").await.is_err());
    }

    #[tokio::test]
    async fn test_personas_truncated_to_three() {
        let persona = r#"{"id": "p", "title": "用户"}"#;
        let json = format!(
            r#"{{"title": "用户画像", "description": "", "personas": [{p}, {p}, {p}, {p}]}}"#,
            p = persona
        );
        let generator = AssetGenerator::new(Arc::new(FixedLlm(json)));
        let personas = generator.personas("内容", "品牌").await.unwrap();
        assert_eq!(personas.personas.len(), 3);
    }

    #[test]
    fn test_assemble_populates_tree() {
        let generator = AssetGenerator::new(Arc::new(FailingLlm));
        let basic = BasicBrandInfo {
            brand_name: "星辰咖啡".to_string(),
            brand_description: "精品咖啡".to_string(),
        };
        let asset = generator.assemble(
            &basic,
            BrandPositioning::default(),
            BrandExpression::default(),
            UserPersonas::default(),
        );
        assert_eq!(asset.brand_name, "星辰咖啡");
        assert_eq!(asset.brand_assets.title, "品牌资产");
        assert_eq!(asset.brand_assets.description, "精品咖啡");
    }
}
