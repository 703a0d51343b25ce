use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Salty,
    Sweet,
    Drink,
    Side,
}

/// One value for each category, keyed by the category code.
///
/// Every key is always present in JSON, even when the value is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    #[serde(rename = "SALTY")]
    pub salty: T,
    #[serde(rename = "SWEET")]
    pub sweet: T,
    #[serde(rename = "DRINK")]
    pub drink: T,
    #[serde(rename = "SIDE")]
    pub side: T,
}

impl<T> From<[T; 4]> for PerCategory<T> {
    /// Values in `SALTY`, `SWEET`, `DRINK`, `SIDE` order.
    fn from([salty, sweet, drink, side]: [T; 4]) -> Self {
        Self {
            salty,
            sweet,
            drink,
            side,
        }
    }
}

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldErrorView {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Per-field messages, only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldErrorView>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub mod guest {
    use super::*;
    use crate::contribution::ContributionView;

    /// Fields are kept as raw JSON and type checked by validation, so a
    /// missing or mistyped field is reported by name. `null` reads as absent.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct GuestNew {
        pub first_name: Value,
        pub last_name: Value,
        pub comment: Value,
    }

    /// Absent fields are left untouched. An empty `comment` clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct GuestUpdate {
        pub first_name: Value,
        pub last_name: Value,
        pub comment: Value,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GuestView {
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
        pub comment: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GuestWithContributions {
        #[serde(flatten)]
        pub guest: GuestView,
        pub contributions: Vec<ContributionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GuestList {
        pub success: bool,
        pub data: Vec<GuestWithContributions>,
        pub total: usize,
    }
}

pub mod contribution {
    use super::*;

    /// Raw JSON like [`crate::guest::GuestNew`]. `guestId` and `servings`
    /// must be whole numbers.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct ContributionNew {
        pub guest_id: Value,
        pub category: Value,
        pub description: Value,
        pub servings: Value,
    }

    /// The owning guest cannot be changed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct ContributionUpdate {
        pub category: Value,
        pub description: Value,
        pub servings: Value,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributionView {
        pub id: i32,
        pub guest_id: i32,
        pub category: Category,
        pub description: String,
        pub servings: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GuestSummaryView {
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributionWithGuest {
        #[serde(flatten)]
        pub contribution: ContributionView,
        pub guest: Option<GuestSummaryView>,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryStats {
        pub count: u64,
        pub servings: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributionStats {
        pub total_contributions: u64,
        pub total_servings: i64,
        pub by_category: PerCategory<CategoryStats>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionListResponse {
        pub success: bool,
        pub data: PerCategory<Vec<ContributionWithGuest>>,
        pub stats: ContributionStats,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ContributionQuery {
        /// Category code. Unknown codes are ignored.
        pub category: Option<String>,
    }
}

pub mod stats {
    use super::*;
    use crate::contribution::CategoryStats;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum AlertKind {
        Warning,
        Info,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertView {
        #[serde(rename = "type")]
        pub kind: AlertKind,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Statistic {
        pub guests_count: u64,
        pub contributions_count: u64,
        pub total_servings: i64,
        /// Rounded to one decimal.
        pub servings_per_guest: f64,
        pub category_coverage: PerCategory<bool>,
        pub by_category: PerCategory<CategoryStats>,
        /// In raise order: missing categories first.
        pub alerts: Vec<AlertView>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_category_keeps_every_code() {
        let grouped: PerCategory<Vec<u8>> = [vec![1], vec![], vec![], vec![2, 3]].into();
        let json = serde_json::to_value(&grouped).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"SALTY": [1], "SWEET": [], "DRINK": [], "SIDE": [2, 3]})
        );
    }

    #[test]
    fn guest_view_is_camel_case_and_flattened() {
        let at = DateTime::parse_from_rfc3339("2026-02-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let view = guest::GuestWithContributions {
            guest: guest::GuestView {
                id: 1,
                first_name: "Pierre".to_string(),
                last_name: "Lefebvre".to_string(),
                comment: None,
                created_at: at,
                updated_at: at,
            },
            contributions: vec![],
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["firstName"], "Pierre");
        assert_eq!(json["lastName"], "Lefebvre");
        assert!(json["comment"].is_null());
        assert!(json["createdAt"].is_string());
        assert_eq!(json["contributions"], serde_json::json!([]));
    }

    #[test]
    fn alert_kind_is_serialized_as_type() {
        let alert = stats::AlertView {
            kind: stats::AlertKind::Info,
            message: "x".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&alert).unwrap(),
            serde_json::json!({"type": "info", "message": "x"})
        );
    }

    #[test]
    fn error_details_are_omitted_when_absent() {
        let body = ErrorResponse {
            success: false,
            error: "Invité non trouvé".to_string(),
            details: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"success": false, "error": "Invité non trouvé"})
        );
    }

    #[test]
    fn contribution_new_reads_camel_case() {
        let new: contribution::ContributionNew = serde_json::from_str(
            r#"{"guestId": 3, "category": "DRINK", "description": "Cidre", "servings": 6}"#,
        )
        .unwrap();
        assert_eq!(new.guest_id, 3);
        assert_eq!(new.category, "DRINK");
        assert_eq!(new.servings, 6);
    }

    #[test]
    fn bodies_keep_mistyped_fields() {
        let new: contribution::ContributionNew =
            serde_json::from_str(r#"{"servings": "5", "description": null}"#).unwrap();
        assert_eq!(new.servings, "5");
        assert!(new.description.is_null());
        assert!(new.guest_id.is_null());

        let update: guest::GuestUpdate = serde_json::from_str(r#"{"firstName": 12}"#).unwrap();
        assert_eq!(update.first_name, 12);
        assert!(update.comment.is_null());
    }
}
