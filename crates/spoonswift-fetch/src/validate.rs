//! Per-use-case response validation and projection.
//!
//! Relays routinely return well-formed JSON that is nonetheless an error
//! page, a stale payload, or a truncated envelope. A [`Validator`] accepts a
//! parsed body only if the minimum required structure is present, and
//! projects the normalized subset the consumer actually uses. Pass/fail is
//! all-or-nothing: partial data is never exposed as success.

use serde_json::Value;

use crate::error::ValidationFailure;

/// Type discriminator the upstream tags real menu category cards with;
/// everything else in the grouped card list (offers, nutrition banners) is
/// filtered out.
const ITEM_CATEGORY_TYPE: &str = "type.googleapis.com/swiggy.presentation.food.v2.ItemCategory";

const LISTING_RESTAURANTS_PATH: &str =
    "/data/cards/1/card/card/gridElements/infoWithStyle/restaurants";
const MENU_INFO_PATH: &str = "/data/cards/2/card/card/info";
const MENU_CATEGORIES_PATH: &str = "/data/cards/4/groupedCard/cardGroupMap/REGULAR/cards";

/// Structural check plus projection for one use case.
///
/// Implementations must be deterministic: identical input always yields the
/// identical pass/fail outcome and identical projection.
pub trait Validator: Send + Sync {
    type Output: Clone + Send + 'static;

    /// Validates the parsed body and projects the normalized subset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] naming the first requirement that is
    /// missing or malformed. Always recoverable by trying the next relay.
    fn validate(&self, body: &Value) -> Result<Self::Output, ValidationFailure>;
}

/// Rejects relay/upstream error pages before any shape check.
///
/// Both the first-party proxy and the upstream itself signal failure inside
/// a 200 body as `{"error": ..., "message": ...}`.
fn reject_error_page(body: &Value) -> Result<(), ValidationFailure> {
    if body.get("error").is_some_and(|e| !e.is_null()) {
        return Err(ValidationFailure::missing("error-free envelope"));
    }
    Ok(())
}

/// Normalized home-listing payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingData {
    /// Raw carousel card block; empty array when the envelope carries none.
    pub carousel_items: Value,
    /// Section header above the restaurant grid; empty when absent.
    pub header_title: String,
    /// Raw restaurant records, guaranteed non-empty.
    pub restaurants: Vec<Value>,
}

/// Requires a non-empty restaurant array at the fixed grid path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingValidator;

impl Validator for ListingValidator {
    type Output = ListingData;

    fn validate(&self, body: &Value) -> Result<ListingData, ValidationFailure> {
        reject_error_page(body)?;

        let restaurants = body
            .pointer(LISTING_RESTAURANTS_PATH)
            .and_then(Value::as_array)
            .ok_or_else(|| ValidationFailure::missing(LISTING_RESTAURANTS_PATH))?;
        if restaurants.is_empty() {
            return Err(ValidationFailure::missing(LISTING_RESTAURANTS_PATH));
        }

        let carousel_items = body
            .pointer("/data/cards/0/card/card")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let header_title = body
            .pointer("/data/cards/1/card/card/header/title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        Ok(ListingData {
            carousel_items,
            header_title,
            restaurants: restaurants.clone(),
        })
    }
}

/// Normalized restaurant-menu payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuData {
    /// Restaurant info block (name, rating, cuisines, ...).
    pub restaurant_info: Value,
    /// Menu category cards, filtered to real item categories.
    pub categories: Vec<Value>,
}

/// Requires at least five top-level cards, restaurant info at a fixed
/// section, and a grouped category card list filtered by the item-category
/// type tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuValidator;

impl Validator for MenuValidator {
    type Output = MenuData;

    fn validate(&self, body: &Value) -> Result<MenuData, ValidationFailure> {
        reject_error_page(body)?;

        let cards = body
            .pointer("/data/cards")
            .and_then(Value::as_array)
            .ok_or_else(|| ValidationFailure::missing("/data/cards"))?;
        if cards.len() < 5 {
            return Err(ValidationFailure::missing("/data/cards (fewer than 5 sections)"));
        }

        let restaurant_info = body
            .pointer(MENU_INFO_PATH)
            .filter(|info| !info.is_null())
            .cloned()
            .ok_or_else(|| ValidationFailure::missing(MENU_INFO_PATH))?;

        let grouped = body
            .pointer(MENU_CATEGORIES_PATH)
            .and_then(Value::as_array)
            .ok_or_else(|| ValidationFailure::missing(MENU_CATEGORIES_PATH))?;

        let categories = grouped
            .iter()
            .filter(|card| {
                card.pointer("/card/card/@type").and_then(Value::as_str)
                    == Some(ITEM_CATEGORY_TYPE)
            })
            .cloned()
            .collect();

        Ok(MenuData {
            restaurant_info,
            categories,
        })
    }
}

/// Normalized type-ahead suggestions payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionsData {
    pub suggestions: Vec<Value>,
}

/// Requires a top-level `data` field; projects `data.suggestions`,
/// defaulting to empty (no suggestions is a valid answer).
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionsValidator;

impl Validator for SuggestionsValidator {
    type Output = SuggestionsData;

    fn validate(&self, body: &Value) -> Result<SuggestionsData, ValidationFailure> {
        reject_error_page(body)?;

        let data = body
            .get("data")
            .filter(|d| !d.is_null())
            .ok_or_else(|| ValidationFailure::missing("/data"))?;
        let suggestions = data
            .get("suggestions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(SuggestionsData { suggestions })
    }
}

/// Full search-results payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchData {
    /// The complete result envelope; consumers walk its card structure.
    pub payload: Value,
}

/// Requires a top-level `data` field; returns the full envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchValidator;

impl Validator for SearchValidator {
    type Output = SearchData;

    fn validate(&self, body: &Value) -> Result<SearchData, ValidationFailure> {
        reject_error_page(body)?;

        if body.get("data").is_none_or(Value::is_null) {
            return Err(ValidationFailure::missing("/data"));
        }

        Ok(SearchData {
            payload: body.clone(),
        })
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
