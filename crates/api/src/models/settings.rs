//! Dealership settings models.
//!
//! Settings form a single logical document split into four sections. Each
//! section has a `*Patch` counterpart whose fields are all optional; a patch
//! merges over the stored section one level deep, exactly like the dashboard
//! expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kifaru_core::{ApiKeyId, SessionId};

/// Marketplace fee structure (percentages and flat listing fees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeStructure {
    pub dealer_commission: f64,
    pub individual_commission: f64,
    pub premium_listing_fee: f64,
    pub featured_listing_fee: f64,
}

impl Default for FeeStructure {
    fn default() -> Self {
        Self {
            dealer_commission: 5.0,
            individual_commission: 8.0,
            premium_listing_fee: 500.0,
            featured_listing_fee: 1000.0,
        }
    }
}

/// Partial fee structure update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructurePatch {
    pub dealer_commission: Option<f64>,
    pub individual_commission: Option<f64>,
    pub premium_listing_fee: Option<f64>,
    pub featured_listing_fee: Option<f64>,
}

/// PUT body for the fee section. The dashboard wraps the patch under its
/// section key (`{"feeStructure": {...}}`); the key is required so a body
/// that misses it is rejected instead of merging nothing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructureUpdate {
    pub fee_structure: FeeStructurePatch,
}

impl FeeStructure {
    /// Merge provided fields over the stored section.
    pub fn apply(&mut self, patch: FeeStructurePatch) {
        if let Some(v) = patch.dealer_commission {
            self.dealer_commission = v;
        }
        if let Some(v) = patch.individual_commission {
            self.individual_commission = v;
        }
        if let Some(v) = patch.premium_listing_fee {
            self.premium_listing_fee = v;
        }
        if let Some(v) = patch.featured_listing_fee {
            self.featured_listing_fee = v;
        }
    }
}

/// Static content pages shown by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPages {
    pub about_us: String,
    pub contact: String,
    pub privacy: String,
}

impl Default for ContentPages {
    fn default() -> Self {
        Self {
            about_us: "Welcome to Kifaru Motors...".to_owned(),
            contact: "Get in touch with us...".to_owned(),
            privacy: "Privacy Policy content...".to_owned(),
        }
    }
}

/// Partial content pages update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPagesPatch {
    pub about_us: Option<String>,
    pub contact: Option<String>,
    pub privacy: Option<String>,
}

/// PUT body for the content section, wrapped under `contentPages`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPagesUpdate {
    pub content_pages: ContentPagesPatch,
}

impl ContentPages {
    /// Merge provided fields over the stored section.
    pub fn apply(&mut self, patch: ContentPagesPatch) {
        if let Some(v) = patch.about_us {
            self.about_us = v;
        }
        if let Some(v) = patch.contact {
            self.contact = v;
        }
        if let Some(v) = patch.privacy {
            self.privacy = v;
        }
    }
}

/// Notification toggles for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub order_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            order_alerts: true,
        }
    }
}

/// Partial notification settings update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsPatch {
    pub email: Option<bool>,
    pub push: Option<bool>,
    pub order_alerts: Option<bool>,
}

/// PUT body for the notification section, wrapped under `notificationSettings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsUpdate {
    pub notification_settings: NotificationSettingsPatch,
}

impl NotificationSettings {
    /// Merge provided fields over the stored section.
    pub fn apply(&mut self, patch: NotificationSettingsPatch) {
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.push {
            self.push = v;
        }
        if let Some(v) = patch.order_alerts {
            self.order_alerts = v;
        }
    }
}

/// Dashboard appearance preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppearanceSettings {
    pub theme: String,
    pub language: String,
    pub timezone: String,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: "Light mode".to_owned(),
            language: "English".to_owned(),
            timezone: "EAT (UTC+3)".to_owned(),
        }
    }
}

/// Partial appearance settings update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettingsPatch {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
}

/// PUT body for the appearance section, wrapped under `appearanceSettings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettingsUpdate {
    pub appearance_settings: AppearanceSettingsPatch,
}

impl AppearanceSettings {
    /// Merge provided fields over the stored section.
    pub fn apply(&mut self, patch: AppearanceSettingsPatch) {
        if let Some(v) = patch.theme {
            self.theme = v;
        }
        if let Some(v) = patch.language {
            self.language = v;
        }
        if let Some(v) = patch.timezone {
            self.timezone = v;
        }
    }
}

/// Sanitized API key listing entry. The secret is never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySummary {
    pub id: ApiKeyId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

/// A tracked dashboard session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: SessionId,
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// The composed settings singleton returned by `GET /api/settings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    pub fee_structure: FeeStructure,
    pub content_pages: ContentPages,
    pub notification_settings: NotificationSettings,
    pub appearance_settings: AppearanceSettings,
    #[serde(default)]
    pub api_keys: Vec<ApiKeySummary>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_defaults() {
        let fees = FeeStructure::default();
        assert!((fees.dealer_commission - 5.0).abs() < f64::EPSILON);
        assert!((fees.individual_commission - 8.0).abs() < f64::EPSILON);
        assert!((fees.premium_listing_fee - 500.0).abs() < f64::EPSILON);
        assert!((fees.featured_listing_fee - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_merges_one_level() {
        let mut fees = FeeStructure::default();
        fees.apply(FeeStructurePatch {
            dealer_commission: Some(6.5),
            ..Default::default()
        });
        assert!((fees.dealer_commission - 6.5).abs() < f64::EPSILON);
        // Untouched fields keep their stored values
        assert!((fees.individual_commission - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_section_deserializes_with_missing_fields() {
        // Older stored documents may lack newer fields; defaults fill them in.
        let pages: ContentPages = serde_json::from_str(r#"{"aboutUs":"Hello"}"#).unwrap();
        assert_eq!(pages.about_us, "Hello");
        assert_eq!(pages.privacy, ContentPages::default().privacy);
    }

    #[test]
    fn test_update_body_unwraps_section_key() {
        // The dashboard sends the patch wrapped under its section key.
        let body: FeeStructureUpdate =
            serde_json::from_str(r#"{"feeStructure":{"dealerCommission":6.5}}"#).unwrap();
        let mut fees = FeeStructure::default();
        fees.apply(body.fee_structure);
        assert!((fees.dealer_commission - 6.5).abs() < f64::EPSILON);
        assert!((fees.individual_commission - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_body_without_section_key_is_rejected() {
        // Bare fields at the top level are not a valid section update.
        let result =
            serde_json::from_str::<FeeStructureUpdate>(r#"{"dealerCommission":6.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_notification_patch() {
        let mut settings = NotificationSettings::default();
        settings.apply(NotificationSettingsPatch {
            push: Some(false),
            ..Default::default()
        });
        assert!(settings.email);
        assert!(!settings.push);
        assert!(settings.order_alerts);
    }

    #[test]
    fn test_document_json_field_names() {
        let doc = SettingsDocument::default();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["feeStructure"]["dealerCommission"].is_number());
        assert!(json["contentPages"]["aboutUs"].is_string());
        assert!(json["notificationSettings"]["orderAlerts"].is_boolean());
        assert!(json["appearanceSettings"]["timezone"].is_string());
        assert!(json["apiKeys"].is_array());
        assert!(json["sessions"].is_array());
    }
}
