use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::stylist::{
    error::StylistError,
    extract::parse_outfit_payload,
    ports::OutfitModelPort,
    prompts::{PromptLocale, build_outfit_prompt},
    reconcile::reconcile_item_ids,
    types::{OutfitRecommendation, OutfitRequest},
};

#[derive(Clone)]
pub struct OutfitRecommender {
    model: Arc<dyn OutfitModelPort>,
    locale: PromptLocale,
}

impl OutfitRecommender {
    pub fn new(model: Arc<dyn OutfitModelPort>, locale: PromptLocale) -> Self {
        Self { model, locale }
    }

    pub async fn generate_outfit(
        &self,
        request: OutfitRequest,
    ) -> Result<OutfitRecommendation, StylistError> {
        request
            .validate()
            .map_err(|errors| StylistError::InvalidRequest(first_validation_message(&errors)))?;

        let request_id = Uuid::now_v7().to_string();
        tracing::info!(
            target: "stylist",
            request_id = %request_id,
            item_count = request.items.len(),
            vibe = %request.context.vibe(),
            "outfit_generation_started"
        );

        let prompt = build_outfit_prompt(&request, self.locale);
        let raw = self.model.generate(&request_id, prompt).await?;

        let parsed = parse_outfit_payload(&raw).inspect_err(|err| {
            tracing::warn!(
                target: "stylist",
                request_id = %request_id,
                error = %err,
                raw_len = raw.len(),
                "model_output_malformed"
            );
        })?;

        for value in &parsed.discarded {
            tracing::warn!(
                target: "stylist",
                request_id = %request_id,
                token = %value,
                "item_id_unresolved"
            );
        }

        let reconciliation = reconcile_item_ids(&parsed.item_ids, &request.items);
        for (name, id) in &reconciliation.remapped {
            tracing::warn!(
                target: "stylist",
                request_id = %request_id,
                name = %name,
                id = %id,
                "item_id_remapped"
            );
        }
        for token in &reconciliation.unresolved {
            tracing::warn!(
                target: "stylist",
                request_id = %request_id,
                token = %token,
                "item_id_unresolved"
            );
        }

        tracing::info!(
            target: "stylist",
            request_id = %request_id,
            returned = parsed.item_ids.len() + parsed.discarded.len(),
            selected = reconciliation.item_ids.len(),
            "outfit_generated"
        );

        Ok(OutfitRecommendation {
            title: parsed.title,
            description: parsed.description,
            item_ids: reconciliation.item_ids,
            style_category: parsed.style_category,
        })
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
