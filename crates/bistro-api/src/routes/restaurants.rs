use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bistro_chain::MenuSuggestion;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub country: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantResponse {
    pub country: String,
    pub restaurant_name: String,
    /// Comma-separated list exactly as generated
    pub menu_items: String,
    pub items: Vec<String>,
}

impl RestaurantResponse {
    fn new(country: String, suggestion: MenuSuggestion) -> Self {
        let items = suggestion.items();
        Self {
            country,
            restaurant_name: suggestion.restaurant_name,
            menu_items: suggestion.menu_items,
            items,
        }
    }
}

/// List the configured country choices
pub async fn list_countries(State(state): State<Arc<AppState>>) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: state.config.app.countries.clone(),
    })
}

/// Generate a restaurant name and menu for a country
///
/// Runs both model calls before responding; nothing is cached.
pub async fn generate_restaurant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<RestaurantResponse>> {
    let suggestion = state.generator.generate(&req.country).await?;

    tracing::info!(
        country = %req.country,
        restaurant_name = %suggestion.restaurant_name,
        "Generated restaurant"
    );

    Ok(Json(RestaurantResponse::new(req.country, suggestion)))
}
