//! Category Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::util::{hex_color, not_blank};

/// Color used when a category is created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// Category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `#RRGGBB`
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: String,
    #[validate(length(max = 50))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl CategoryCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            icon: None,
        }
    }
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "hex_color"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[validate(length(max = 50))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_create_defaults_color() {
        let create = CategoryCreate::new("Work");
        assert_eq!(create.color, DEFAULT_CATEGORY_COLOR);
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_category_validation_rejects_bad_color() {
        let mut create = CategoryCreate::new("Home");
        create.color = "blue".to_string();
        assert!(create.validate().is_err());

        let update = CategoryUpdate {
            color: Some("#12345".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
