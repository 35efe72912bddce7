// src/domain/fingerprint/value_objects.rs
//
// Device Fingerprint Value Objects
//
// Payload sent to the heuristics backend, plus the two sources it is assembled
// from: platform facts and the optional web-runtime fragment.
//
// CRITICAL INVARIANTS:
// - Wire field names are fixed (camelCase), optional fields are omitted when absent
// - Every web-sourced device field falls back to a platform value or "unknown"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_VALUE: &str = "unknown";

// ============================================================================
// DEVICE FINGERPRINT (WIRE PAYLOAD)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFingerprint {
    /// Epoch milliseconds of first install
    pub app_installation_time: i64,
    pub os_version: String,
    pub bundle_id: String,

    /// `{platform}/{version}`
    pub sdk_version: String,

    /// Candidate link read from the clipboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_match_link_to_check: Option<String>,

    /// Launch or referrer link that started this resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_link: Option<String>,

    pub device: DeviceInfo,
}

impl DeviceFingerprint {
    pub fn uses_clipboard(&self) -> bool {
        self.unique_match_link_to_check.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_model_name: String,
    pub language_code: String,
    pub language_code_from_web_view: String,
    pub app_version_from_web_view: String,
    pub language_code_raw: String,
    pub screen_resolution_width: u32,
    pub screen_resolution_height: u32,
    pub timezone: String,
}

impl DeviceInfo {
    /// Merge the web fragment over platform facts.
    pub fn merge(platform: &PlatformDevice, web: &WebHeuristics) -> Self {
        Self {
            device_model_name: platform.model.clone(),
            language_code: platform.language_tag.clone(),
            language_code_from_web_view: web
                .language
                .clone()
                .unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            app_version_from_web_view: web
                .app_version
                .clone()
                .or_else(|| platform.app_version.clone())
                .unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            language_code_raw: platform.language_tag.replace('-', "_"),
            screen_resolution_width: web.screen_width.unwrap_or(platform.screen_width),
            screen_resolution_height: web.screen_height.unwrap_or(platform.screen_height),
            timezone: web
                .timezone
                .clone()
                .unwrap_or_else(|| platform.timezone.clone()),
        }
    }
}

// ============================================================================
// PLATFORM DEVICE (HOST-PROVIDED FACTS)
// ============================================================================

/// Facts the host application knows without a web runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDevice {
    /// First install (or last update) time of the app
    pub install_time: DateTime<Utc>,
    pub os_version: String,
    pub bundle_id: String,
    pub model: String,

    /// BCP-47 tag, e.g. `en-US`
    pub language_tag: String,
    pub app_version: Option<String>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub timezone: String,
}

// ============================================================================
// WEB HEURISTICS (WEB-RUNTIME FRAGMENT)
// ============================================================================

/// Values reported by the embedded web runtime. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebHeuristics {
    pub language: Option<String>,
    pub languages: Option<Vec<String>>,
    pub timezone: Option<String>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub device_pixel_ratio: Option<f64>,
    pub platform: Option<String>,
    pub user_agent: Option<String>,
    pub connection_type: Option<String>,
    pub hardware_concurrency: Option<u32>,
    pub memory: Option<f64>,
    pub color_depth: Option<u32>,
    pub app_version: Option<String>,
}
