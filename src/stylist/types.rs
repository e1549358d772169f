use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

pub const DEFAULT_VIBE: &str = "casual";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, alias = "sub_category", skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Free-form styling context. `weather` has no fixed schema; it is passed to
/// the model as JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitContext {
    #[serde(default)]
    pub vibe: Option<String>,
    #[serde(default)]
    pub weather: Option<Map<String, Value>>,
}

impl OutfitContext {
    pub fn vibe(&self) -> &str {
        self.vibe.as_deref().unwrap_or(DEFAULT_VIBE)
    }

    /// Weather only counts as specified when it carries at least one key.
    pub fn weather(&self) -> Option<&Map<String, Value>> {
        self.weather.as_ref().filter(|weather| !weather.is_empty())
    }
}

/// Body layout the caller used. Flat bodies put `vibe` and `weather` beside
/// `items` and are answered with snake_case field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestShape {
    #[default]
    Nested,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(from = "OutfitRequestBody")]
pub struct OutfitRequest {
    #[validate(length(min = 1, message = "No items provided for recommendation"))]
    pub items: Vec<ClothingItem>,
    pub context: OutfitContext,
    #[serde(skip)]
    pub shape: RequestShape,
}

#[derive(Deserialize)]
struct OutfitRequestBody {
    items: Vec<ClothingItem>,
    #[serde(default)]
    context: Option<OutfitContext>,
    #[serde(default)]
    vibe: Option<String>,
    #[serde(default)]
    weather: Option<Map<String, Value>>,
}

impl From<OutfitRequestBody> for OutfitRequest {
    fn from(body: OutfitRequestBody) -> Self {
        let shape = if body.context.is_none() && (body.vibe.is_some() || body.weather.is_some()) {
            RequestShape::Flat
        } else {
            RequestShape::Nested
        };

        // Nested values win; top-level ones only fill gaps.
        let mut context = body.context.unwrap_or_default();
        if context.vibe.is_none() {
            context.vibe = body.vibe;
        }
        if context.weather.is_none() {
            context.weather = body.weather;
        }

        Self {
            items: body.items,
            context,
            shape,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitRecommendation {
    pub title: String,
    pub description: String,
    #[serde(alias = "item_ids")]
    pub item_ids: Vec<String>,
    #[serde(alias = "style_category")]
    pub style_category: String,
}

#[derive(Debug, Serialize)]
pub struct SnakeCaseRecommendation<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub item_ids: &'a [String],
    pub style_category: &'a str,
}

impl OutfitRecommendation {
    pub fn as_snake_case(&self) -> SnakeCaseRecommendation<'_> {
        SnakeCaseRecommendation {
            title: &self.title,
            description: &self.description,
            item_ids: &self.item_ids,
            style_category: &self.style_category,
        }
    }
}
