use serde_json::{json, Value};

use super::*;

fn listing_envelope(restaurant_count: usize) -> Value {
    let restaurants: Vec<Value> = (0..restaurant_count)
        .map(|i| json!({ "info": { "id": i.to_string(), "name": format!("Restaurant {i}") } }))
        .collect();
    json!({
        "data": {
            "cards": [
                { "card": { "card": { "id": "carousel", "imageGridCards": {} } } },
                {
                    "card": {
                        "card": {
                            "header": { "title": "Top restaurant chains" },
                            "gridElements": { "infoWithStyle": { "restaurants": restaurants } }
                        }
                    }
                }
            ]
        }
    })
}

fn menu_envelope() -> Value {
    json!({
        "data": {
            "cards": [
                {},
                {},
                { "card": { "card": { "info": { "name": "Udupi Kitchen", "avgRating": 4.4 } } } },
                {},
                {
                    "groupedCard": {
                        "cardGroupMap": {
                            "REGULAR": {
                                "cards": [
                                    { "card": { "card": {
                                        "@type": "type.googleapis.com/swiggy.presentation.food.v2.ItemCategory",
                                        "title": "Dosas"
                                    } } },
                                    { "card": { "card": {
                                        "@type": "type.googleapis.com/swiggy.presentation.food.v2.NestedItemCategory",
                                        "title": "Combos"
                                    } } },
                                    { "card": { "card": {
                                        "@type": "type.googleapis.com/swiggy.presentation.food.v2.ItemCategory",
                                        "title": "Beverages"
                                    } } }
                                ]
                            }
                        }
                    }
                }
            ]
        }
    })
}

#[test]
fn listing_accepts_valid_envelope() {
    let data = ListingValidator.validate(&listing_envelope(20)).unwrap();
    assert_eq!(data.restaurants.len(), 20);
    assert_eq!(data.header_title, "Top restaurant chains");
    assert!(data.carousel_items.is_object());
}

#[test]
fn listing_rejects_empty_restaurant_array() {
    let result = ListingValidator.validate(&listing_envelope(0));
    assert!(result.is_err());
}

#[test]
fn listing_rejects_envelope_without_grid() {
    let body = json!({ "data": { "cards": [] } });
    let err = ListingValidator.validate(&body).unwrap_err();
    assert!(err.missing_path.contains("restaurants"), "{err}");
}

#[test]
fn listing_rejects_error_page() {
    let body = json!({ "error": "Failed to fetch restaurants", "message": "upstream 503" });
    assert!(ListingValidator.validate(&body).is_err());
}

#[test]
fn listing_defaults_optional_header_fields() {
    let mut body = listing_envelope(3);
    body["data"]["cards"][1]["card"]["card"]
        .as_object_mut()
        .unwrap()
        .remove("header");
    let data = ListingValidator.validate(&body).unwrap();
    assert_eq!(data.header_title, "");
    assert_eq!(data.restaurants.len(), 3);
}

#[test]
fn listing_is_deterministic() {
    let body = listing_envelope(7);
    let a = ListingValidator.validate(&body).unwrap();
    let b = ListingValidator.validate(&body).unwrap();
    assert_eq!(a, b);
}

#[test]
fn menu_accepts_valid_envelope_and_filters_categories() {
    let data = MenuValidator.validate(&menu_envelope()).unwrap();
    assert_eq!(data.restaurant_info["name"], "Udupi Kitchen");
    assert_eq!(data.categories.len(), 2, "nested category must be filtered out");
}

#[test]
fn menu_rejects_fewer_than_five_cards() {
    let body = json!({ "data": { "cards": [{}, {}, {}] } });
    let err = MenuValidator.validate(&body).unwrap_err();
    assert!(err.missing_path.contains("cards"), "{err}");
}

#[test]
fn menu_rejects_missing_info_section() {
    let mut body = menu_envelope();
    body["data"]["cards"][2] = json!({});
    let err = MenuValidator.validate(&body).unwrap_err();
    assert!(err.missing_path.contains("info"), "{err}");
}

#[test]
fn menu_rejects_missing_category_list() {
    let mut body = menu_envelope();
    body["data"]["cards"][4] = json!({});
    assert!(MenuValidator.validate(&body).is_err());
}

#[test]
fn menu_rejects_error_page() {
    let body = json!({ "error": "Failed to fetch restaurant menu", "message": "no id" });
    assert!(MenuValidator.validate(&body).is_err());
}

#[test]
fn suggestions_projects_list() {
    let body = json!({ "data": { "suggestions": [
        { "text": "pizza", "metadata": "{}" },
        { "text": "pasta", "metadata": "{}" }
    ] } });
    let data = SuggestionsValidator.validate(&body).unwrap();
    assert_eq!(data.suggestions.len(), 2);
}

#[test]
fn suggestions_default_to_empty_list() {
    let body = json!({ "data": {} });
    let data = SuggestionsValidator.validate(&body).unwrap();
    assert!(data.suggestions.is_empty());
}

#[test]
fn suggestions_require_data_field() {
    let body = json!({ "statusCode": 1 });
    let err = SuggestionsValidator.validate(&body).unwrap_err();
    assert_eq!(err.missing_path, "/data");
}

#[test]
fn search_returns_full_envelope() {
    let body = json!({ "data": { "cards": [ { "groupedCard": {} } ] } });
    let data = SearchValidator.validate(&body).unwrap();
    assert_eq!(data.payload, body);
}

#[test]
fn search_rejects_null_data() {
    let body = json!({ "data": null });
    assert!(SearchValidator.validate(&body).is_err());
}
