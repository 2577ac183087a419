//! Settings page
//!
//! The form starts from fixed defaults and is overlaid with the user's
//! stored row when one exists. Saving always upserts the whole form.

use serde::{Deserialize, Serialize};

use crate::gateway::{Gateway, GatewayResult, SettingsPatch, UserSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub full_name: String,
    pub phone: String,
    pub language: String,
    pub timezone: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub sms_notifications: bool,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            language: "zh-CN".to_string(),
            timezone: "Asia/Shanghai".to_string(),
            email_notifications: true,
            push_notifications: true,
            sms_notifications: false,
        }
    }
}

impl From<&UserSettings> for SettingsForm {
    fn from(settings: &UserSettings) -> Self {
        let defaults = Self::default();
        Self {
            full_name: settings.full_name.clone(),
            phone: settings.phone.clone(),
            language: non_empty_or(&settings.language, defaults.language),
            timezone: non_empty_or(&settings.timezone, defaults.timezone),
            email_notifications: settings.email_notifications,
            push_notifications: settings.push_notifications,
            sms_notifications: settings.sms_notifications,
        }
    }
}

fn non_empty_or(value: &str, fallback: String) -> String {
    if value.is_empty() {
        fallback
    } else {
        value.to_string()
    }
}

impl SettingsForm {
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            full_name: Some(self.full_name.clone()),
            phone: Some(self.phone.clone()),
            language: Some(self.language.clone()),
            timezone: Some(self.timezone.clone()),
            email_notifications: Some(self.email_notifications),
            push_notifications: Some(self.push_notifications),
            sms_notifications: Some(self.sms_notifications),
        }
    }
}

/// Stored settings, or the defaults when the user has none yet
pub async fn load_settings(gateway: &Gateway, user_id: &str) -> GatewayResult<SettingsForm> {
    let stored = gateway.settings().get(user_id).await?;
    Ok(stored.as_ref().map(SettingsForm::from).unwrap_or_default())
}

pub async fn save_settings(
    gateway: &Gateway,
    user_id: &str,
    form: &SettingsForm,
) -> GatewayResult<SettingsForm> {
    let saved = gateway.settings().upsert(user_id, &form.to_patch()).await?;
    tracing::info!(user_id = %user_id, "Settings saved");
    Ok(SettingsForm::from(&saved))
}
