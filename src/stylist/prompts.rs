use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stylist::types::{ClothingItem, OutfitRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromptLocale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-cn")]
    ZhCn,
}

/// Every locale-dependent fragment of the outfit prompt. The layout of the
/// prompt itself is shared.
struct PromptText {
    role: &'static str,
    vibe_label: &'static str,
    weather_label: &'static str,
    not_specified: &'static str,
    items_heading: &'static str,
    color_label: &'static str,
    tags_label: &'static str,
    instructions_heading: &'static str,
    instructions: [&'static str; 5],
    format_heading: &'static str,
    format_example: &'static str,
}

const EN: PromptText = PromptText {
    role: concat!(
        "You are a professional fashion stylist. Based on the user's available wardrobe items, ",
        "weather conditions, and requested vibe, suggest ONE perfect outfit."
    ),
    vibe_label: "User's Vibe",
    weather_label: "Weather",
    not_specified: "Not specified",
    items_heading: "[CRITICAL] Use the following Available Wardrobe items only:",
    color_label: "Color",
    tags_label: "Tags",
    instructions_heading: "Instructions:",
    instructions: [
        "Select 2-4 items from the available list that make a cohesive outfit.",
        concat!(
            "[STRICT REQUIREMENT] In your JSON response, the \"itemIds\" field MUST contain the ",
            "original ID strings from the list above. Never use item names."
        ),
        "Provide a catchy title for the outfit.",
        "Write a short \"Stylist Note\" explaining why this combination works.",
        "Categorize the style (e.g., Casual, Formal, Streetwear).",
    ],
    format_heading: "Response Format (JSON only):",
    format_example: concat!(
        "{\n",
        "  \"title\": \"Outfit Title\",\n",
        "  \"description\": \"Stylist Note explaining the choice\",\n",
        "  \"itemIds\": [\"id_1\", \"id_2\"],\n",
        "  \"styleCategory\": \"Style Category\"\n",
        "}"
    ),
};

const ZH_CN: PromptText = PromptText {
    role: "你是一位专业的时尚造型师。根据用户的衣橱单品、天气条件和风格偏好，推荐一套完美的穿搭方案。",
    vibe_label: "用户风格偏好",
    weather_label: "天气情况",
    not_specified: "未指定",
    items_heading: "【重要】只能从以下可用衣橱单品中选择：",
    color_label: "颜色",
    tags_label: "标签",
    instructions_heading: "要求：",
    instructions: [
        "从上述列表中选择 2-4 件单品，组成一套协调的穿搭方案",
        "【严格要求】JSON 响应中的 \"itemIds\" 字段必须包含上述列表中的原始 ID 字符串，不要使用单品名称",
        "为穿搭方案起一个吸引人的中文标题",
        "用中文撰写简短的\"造型师建议\"，解释为什么这套搭配效果好",
        "用中文标注风格类别（例如：休闲、正式、街头、通勤等）",
    ],
    format_heading: "响应格式（仅返回 JSON）：",
    format_example: concat!(
        "{\n",
        "  \"title\": \"穿搭方案标题（中文）\",\n",
        "  \"description\": \"造型师建议，解释搭配理由（中文）\",\n",
        "  \"itemIds\": [\"id_1\", \"id_2\"],\n",
        "  \"styleCategory\": \"风格类别（中文）\"\n",
        "}"
    ),
};

impl PromptLocale {
    fn text(self) -> &'static PromptText {
        match self {
            Self::En => &EN,
            Self::ZhCn => &ZH_CN,
        }
    }
}

pub fn build_outfit_prompt(request: &OutfitRequest, locale: PromptLocale) -> String {
    let text = locale.text();

    let weather = request
        .context
        .weather()
        .map(|weather| Value::Object(weather.clone()).to_string())
        .unwrap_or_else(|| text.not_specified.to_string());

    let items = request
        .items
        .iter()
        .map(|item| render_item_line(item, text))
        .collect::<Vec<_>>()
        .join("\n");

    let instructions = text
        .instructions
        .iter()
        .enumerate()
        .map(|(index, line)| format!("{}. {}", index + 1, line))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{role}\n\n{vibe_label}: {vibe}\n{weather_label}: {weather}\n\n{items_heading}\n{items}\n\n{instructions_heading}\n{instructions}\n\n{format_heading}\n{format_example}\n",
        role = text.role,
        vibe_label = text.vibe_label,
        vibe = request.context.vibe(),
        weather_label = text.weather_label,
        weather = weather,
        items_heading = text.items_heading,
        items = items,
        instructions_heading = text.instructions_heading,
        instructions = instructions,
        format_heading = text.format_heading,
        format_example = text.format_example,
    )
}

fn render_item_line(item: &ClothingItem, text: &PromptText) -> String {
    let category = match item.sub_category.as_deref() {
        Some(sub_category) if !sub_category.trim().is_empty() => {
            format!("{}/{}", item.category, sub_category)
        }
        _ => item.category.clone(),
    };
    let color = item
        .color
        .as_deref()
        .filter(|color| !color.trim().is_empty())
        .unwrap_or(text.not_specified);
    let tags = if item.tags.is_empty() {
        text.not_specified.to_string()
    } else {
        item.tags.join(", ")
    };

    format!(
        "- {} ({}) {}: {}, {}: {} (ID: {})",
        item.name, category, text.color_label, color, text.tags_label, tags, item.id
    )
}
