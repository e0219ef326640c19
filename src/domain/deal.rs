use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shown when a deal carries neither a title nor an external title.
pub const PLACEHOLDER_TITLE: &str = "Juego";

/// One listing as returned by the deals API.
///
/// Every field is optional: the API owns the schema and omits freely. Values
/// arrive either as JSON numbers or as strings, so every field goes through a
/// lenient deserializer and anything unreadable becomes `None` instead of
/// failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub external: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumb: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub normal_price: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cheapest: Option<String>,
    #[serde(
        default,
        deserialize_with = "number_or_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub savings: Option<f64>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub deal_rating: Option<String>,
    #[serde(
        default,
        deserialize_with = "number_or_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub metacritic_score: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub steam_release_date: Option<f64>,
    #[serde(
        rename = "gameID",
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub game_id: Option<String>,
    #[serde(
        rename = "dealID",
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub deal_id: Option<String>,
    #[serde(
        rename = "storeID",
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub store_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub steam_rating_text: Option<String>,
    #[serde(
        rename = "descripcion",
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl Deal {
    #[cfg(test)]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Title used for matching and name ordering: `title`, then `external`,
    /// then the empty string.
    pub fn search_title(&self) -> &str {
        first_filled(&[&self.title, &self.external]).unwrap_or("")
    }

    pub fn display_title(&self) -> &str {
        first_filled(&[&self.title, &self.external]).unwrap_or(PLACEHOLDER_TITLE)
    }

    pub fn image_src(&self) -> &str {
        first_filled(&[&self.thumb, &self.thumbnail]).unwrap_or("")
    }

    pub fn normal_price(&self) -> Option<&str> {
        first_filled(&[&self.normal_price])
    }

    pub fn sale_price(&self) -> Option<&str> {
        first_filled(&[&self.sale_price, &self.cheapest])
    }

    /// Rounded savings percentage. A savings value of zero counts as absent,
    /// the same as a missing one.
    pub fn savings_percent(&self) -> Option<i64> {
        self.savings
            .filter(|s| *s != 0.0)
            .map(|s| s.round() as i64)
    }

    pub fn rating_label(&self) -> &str {
        first_filled(&[&self.rating, &self.deal_rating]).unwrap_or("N/A")
    }

    pub fn score(&self) -> f64 {
        self.metacritic_score.unwrap_or(0.0)
    }

    pub fn released_at(&self) -> f64 {
        self.steam_release_date.unwrap_or(0.0)
    }

    pub fn description(&self) -> &str {
        first_filled(&[&self.description]).unwrap_or("")
    }
}

fn first_filled<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.is_empty())
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}
