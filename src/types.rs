// src/types.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct DeviceReq<'a> {
    #[serde(rename = "deviceId")]
    pub device_id: &'a str,
}

/// Register reply. Only `status` drives a decision; the plan fields are
/// informational and kept as raw JSON so any type prints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRes {
    pub status: Option<Value>,
    pub handler: Option<Value>,
    pub plan_tier: Option<Value>,
    pub limit: Option<Value>,
    pub devices_used: Option<Value>,
    pub remaining: Option<Value>,
    #[serde(skip)]
    pub raw: Value,
}

/// Validate reply. Only `allowed` drives a decision.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateRes {
    pub status: Option<Value>,
    pub handler: Option<Value>,
    pub allowed: Option<Value>,
    pub reason: Option<Value>,
    pub code: Option<Value>,
    pub request_id: Option<Value>,
    #[serde(skip)]
    pub raw: Value,
}

/// Render an optional reply field: strings unquoted, other JSON as-is,
/// absent or null as `none`
pub fn show(field: Option<&Value>) -> String {
    match field {
        None | Some(Value::Null) => "none".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterStatus {
    Ok,
    Exists,
    LimitReached,
    /// Anything else, including the error-shaped reply
    Failed,
}

impl RegisterRes {
    pub fn from_value(raw: Value) -> serde_json::Result<Self> {
        let mut res: Self = serde_json::from_value(raw.clone())?;
        res.raw = raw;
        Ok(res)
    }

    pub fn status(&self) -> RegisterStatus {
        match self.status.as_ref().and_then(Value::as_str) {
            Some("ok") => RegisterStatus::Ok,
            Some("exists") => RegisterStatus::Exists,
            Some("limit_reached") => RegisterStatus::LimitReached,
            _ => RegisterStatus::Failed,
        }
    }

    /// `planTier=.. limit=..` for whichever plan fields are present
    pub fn plan_summary(&self) -> Option<String> {
        let fields = [
            ("planTier", &self.plan_tier),
            ("limit", &self.limit),
            ("devicesUsed", &self.devices_used),
            ("remaining", &self.remaining),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter(|(_, v)| v.as_ref().is_some_and(|v| !v.is_null()))
            .map(|(name, v)| format!("{name}={}", show(v.as_ref())))
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

impl ValidateRes {
    pub fn from_value(raw: Value) -> serde_json::Result<Self> {
        let mut res: Self = serde_json::from_value(raw.clone())?;
        res.raw = raw;
        Ok(res)
    }

    /// Anything but a JSON `true` counts as a denial
    pub fn is_allowed(&self) -> bool {
        self.allowed.as_ref().and_then(Value::as_bool).unwrap_or(false)
    }
}
