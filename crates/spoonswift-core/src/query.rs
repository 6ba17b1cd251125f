//! Upstream query model.
//!
//! An [`UpstreamQuery`] captures one semantic request against the external
//! catalog service: the home listing, a restaurant's menu, search
//! suggestions, or full search results. [`UpstreamQuery::upstream_url`]
//! renders it as the concrete upstream URL, which relays then wrap in their
//! own convention.

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// The menu endpoint requires coordinates but they do not affect the menu
/// payload; the first-party relay pins the default city, and so do we.
const MENU_LAT: f64 = crate::config::DEFAULT_LAT;
const MENU_LNG: f64 = crate::config::DEFAULT_LNG;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// How a search was submitted, forwarded to the upstream for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitAction {
    /// Free-text query submitted directly.
    #[default]
    Enter,
    /// A suggestion entry was clicked; the query carries the suggestion's
    /// metadata and unique id.
    Suggestion,
}

impl SubmitAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmitAction::Enter => "ENTER",
            SubmitAction::Suggestion => "SUGGESTION",
        }
    }
}

/// One semantic query against the upstream catalog service.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamQuery {
    /// Restaurant listing for a location.
    Listing {
        location: GeoPoint,
        offset: u32,
    },
    /// Full menu for one restaurant.
    Menu {
        restaurant_id: String,
    },
    /// Type-ahead suggestions for a partial query string.
    Suggestions {
        location: GeoPoint,
        query: String,
    },
    /// Full search results for a submitted query.
    Search {
        location: GeoPoint,
        query: String,
        tracking_id: Option<String>,
        query_unique_id: Option<String>,
        meta_data: Option<String>,
        submit_action: SubmitAction,
    },
}

impl UpstreamQuery {
    /// Short label for logs and attempt records.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamQuery::Listing { .. } => "listing",
            UpstreamQuery::Menu { .. } => "menu",
            UpstreamQuery::Suggestions { .. } => "suggestions",
            UpstreamQuery::Search { .. } => "search",
        }
    }

    /// Renders the fully formed upstream URL for this query.
    ///
    /// `base` is the upstream origin (e.g. `https://www.swiggy.com`). All
    /// parameter values are percent-encoded via [`Url::query_pairs_mut`];
    /// nothing here concatenates raw strings.
    #[must_use]
    pub fn upstream_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_fragment(None);
        url.set_query(None);
        match self {
            UpstreamQuery::Listing { location, offset } => {
                url.set_path("/dapi/restaurants/list/v5");
                url.query_pairs_mut()
                    .append_pair("offset", &offset.to_string())
                    .append_pair("is-seo-homepage-enabled", "true")
                    .append_pair("lat", &location.lat.to_string())
                    .append_pair("lng", &location.lng.to_string())
                    .append_pair("carousel", "true")
                    .append_pair("third_party_vendor", "1");
            }
            UpstreamQuery::Menu { restaurant_id } => {
                url.set_path("/dapi/menu/pl");
                url.query_pairs_mut()
                    .append_pair("page-type", "REGULAR_MENU")
                    .append_pair("complete-menu", "true")
                    .append_pair("lat", &MENU_LAT.to_string())
                    .append_pair("lng", &MENU_LNG.to_string())
                    .append_pair("restaurantId", restaurant_id)
                    .append_pair("catalog_qa", "undefined")
                    .append_pair("submitAction", "ENTER");
            }
            UpstreamQuery::Suggestions { location, query } => {
                url.set_path("/dapi/restaurants/search/suggest");
                url.query_pairs_mut()
                    .append_pair("lat", &location.lat.to_string())
                    .append_pair("lng", &location.lng.to_string())
                    .append_pair("str", query);
            }
            UpstreamQuery::Search {
                location,
                query,
                tracking_id,
                query_unique_id,
                meta_data,
                submit_action,
            } => {
                url.set_path("/dapi/restaurants/search/v3");
                let mut pairs = url.query_pairs_mut();
                pairs
                    .append_pair("lat", &location.lat.to_string())
                    .append_pair("lng", &location.lng.to_string())
                    .append_pair("str", query)
                    .append_pair("trackingId", tracking_id.as_deref().unwrap_or("undefined"))
                    .append_pair("submitAction", submit_action.as_str());
                if let Some(id) = query_unique_id {
                    pairs.append_pair("queryUniqueId", id);
                }
                if let Some(meta) = meta_data {
                    pairs.append_pair("metaData", meta);
                }
            }
        }
        url
    }
}
