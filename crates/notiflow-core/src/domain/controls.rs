//! Per-kind control values.
//!
//! Control values are the user-editable configuration of a step. Each step
//! kind has its own record; the union layer in [`super::steps`] binds each
//! record to its [`StepType`](super::StepType).

use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Serialize, Serializer};

use super::enums::{DelayType, DigestType, EditorType, RedirectTarget, TimeUnit};
use crate::codec::{Fallback, FieldRule, JsonMap, WireModel, nullable, number};

/// Redirect attached to an in-app notification or one of its actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectDto {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<RedirectTarget>,
}

impl WireModel for RedirectDto {
    const NAME: &'static str = "RedirectDto";
    const RULES: &'static [FieldRule] = &[FieldRule::OneOf {
        field: "target",
        allowed: RedirectTarget::TAGS,
    }];
}

/// A button on an in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDto {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectDto>,
}

impl WireModel for ActionDto {
    const NAME: &'static str = "ActionDto";
    const RULES: &'static [FieldRule] = &[FieldRule::Nested {
        field: "redirect",
        normalize: RedirectDto::normalize,
    }];
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppControlValues {
    /// JSON-logic rule; the step is skipped when it evaluates to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_action: Option<ActionDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_action: Option<ActionDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectDto>,
    pub disable_output_sanitization: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonMap>,
}

impl WireModel for InAppControlValues {
    const NAME: &'static str = "InAppControlValues";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Default {
            field: "disableOutputSanitization",
            value: Fallback::Bool(false),
        },
        FieldRule::Nested {
            field: "primaryAction",
            normalize: ActionDto::normalize,
        },
        FieldRule::Nested {
            field: "secondaryAction",
            normalize: ActionDto::normalize,
        },
        FieldRule::Nested {
            field: "redirect",
            normalize: RedirectDto::normalize,
        },
    ];
}

/// Wire names of the fields [`EmailControlValues`] models itself.
pub const EMAIL_CONTROL_FIELDS: &[&str] = &[
    "skip",
    "subject",
    "body",
    "editorType",
    "disableOutputSanitization",
    "layoutId",
];

/// Email control values. This record is open: fields it does not know are
/// kept in `additional_properties` and written back on encode. A residual
/// key that names a modelled field fails to encode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailControlValues {
    #[serde(default)]
    pub skip: Option<JsonMap>,
    pub subject: String,
    pub body: String,
    pub editor_type: EditorType,
    pub disable_output_sanitization: bool,
    /// `None` uses the default layout, `Some(None)` sends without a layout.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub layout_id: Option<Option<String>>,
    #[serde(flatten)]
    pub additional_properties: JsonMap,
}

impl Serialize for EmailControlValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(skip) = &self.skip {
            map.serialize_entry("skip", skip)?;
        }
        map.serialize_entry("subject", &self.subject)?;
        map.serialize_entry("body", &self.body)?;
        map.serialize_entry("editorType", &self.editor_type)?;
        map.serialize_entry("disableOutputSanitization", &self.disable_output_sanitization)?;
        if let Some(layout_id) = &self.layout_id {
            map.serialize_entry("layoutId", layout_id)?;
        }
        for (key, value) in &self.additional_properties {
            if EMAIL_CONTROL_FIELDS.contains(&key.as_str()) {
                return Err(S::Error::custom(format!(
                    "additional property `{key}` shadows a modelled email field"
                )));
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl EmailControlValues {
    /// Email with the given subject and every other field at its default.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            skip: None,
            subject: subject.into(),
            body: String::new(),
            editor_type: EditorType::default(),
            disable_output_sanitization: false,
            layout_id: None,
            additional_properties: JsonMap::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

impl WireModel for EmailControlValues {
    const NAME: &'static str = "EmailControlValues";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Default {
            field: "body",
            value: Fallback::Str(""),
        },
        FieldRule::Default {
            field: "editorType",
            value: Fallback::Str("block"),
        },
        FieldRule::OneOf {
            field: "editorType",
            allowed: EditorType::TAGS,
        },
        FieldRule::Default {
            field: "disableOutputSanitization",
            value: Fallback::Bool(false),
        },
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SmsControlValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl WireModel for SmsControlValues {
    const NAME: &'static str = "SmsControlValues";
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatControlValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl WireModel for ChatControlValues {
    const NAME: &'static str = "ChatControlValues";
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PushControlValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl WireModel for PushControlValues {
    const NAME: &'static str = "PushControlValues";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayControlValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<JsonMap>,
    #[serde(rename = "type")]
    pub delay_type: DelayType,
    #[serde(with = "number")]
    pub amount: f64,
    pub unit: TimeUnit,
}

impl DelayControlValues {
    pub fn new(amount: f64, unit: TimeUnit) -> Self {
        Self {
            skip: None,
            delay_type: DelayType::default(),
            amount,
            unit,
        }
    }
}

impl WireModel for DelayControlValues {
    const NAME: &'static str = "DelayControlValues";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Default {
            field: "type",
            value: Fallback::Str("regular"),
        },
        FieldRule::OneOf {
            field: "type",
            allowed: DelayType::TAGS,
        },
        FieldRule::OneOf {
            field: "unit",
            allowed: TimeUnit::TAGS,
        },
    ];
}

/// How far back a digest looks for earlier events before opening a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookBackWindow {
    #[serde(with = "number")]
    pub amount: f64,
    pub unit: TimeUnit,
}

impl WireModel for LookBackWindow {
    const NAME: &'static str = "LookBackWindow";
    const RULES: &'static [FieldRule] = &[FieldRule::OneOf {
        field: "unit",
        allowed: TimeUnit::TAGS,
    }];
}

/// Digest control values. `amount`/`unit`/`lookBackWindow` apply to regular
/// digests, `cron` to timed ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestControlValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<JsonMap>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub digest_type: Option<DigestType>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "number::option")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<TimeUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_back_window: Option<LookBackWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_key: Option<String>,
}

impl WireModel for DigestControlValues {
    const NAME: &'static str = "DigestControlValues";
    const RULES: &'static [FieldRule] = &[
        FieldRule::OneOf {
            field: "type",
            allowed: DigestType::TAGS,
        },
        FieldRule::OneOf {
            field: "unit",
            allowed: TimeUnit::TAGS,
        },
        FieldRule::Nested {
            field: "lookBackWindow",
            normalize: LookBackWindow::normalize,
        },
    ];
}

/// Control values of a custom step: arbitrary keys, `skip` included.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomControlValues(pub JsonMap);

impl WireModel for CustomControlValues {
    const NAME: &'static str = "CustomControlValues";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use serde_json::json;

    #[test]
    fn test_email_defaults_are_filled_and_emitted() {
        let email = EmailControlValues::decode_value(json!({ "subject": "Hi" })).unwrap();
        assert_eq!(email, EmailControlValues::new("Hi"));
        assert_eq!(
            email.encode_value().unwrap(),
            json!({
                "subject": "Hi",
                "body": "",
                "editorType": "block",
                "disableOutputSanitization": false
            })
        );
    }

    #[test]
    fn test_email_keeps_unknown_fields() {
        let input = json!({
            "subject": "Hi",
            "body": "b",
            "editorType": "html",
            "disableOutputSanitization": true,
            "preheader": "p",
            "rendering": { "mode": "dark" }
        });
        let email = EmailControlValues::decode_value(input.clone()).unwrap();
        assert_eq!(email.additional_properties.len(), 2);
        assert_eq!(email.additional_properties["preheader"], "p");
        assert_eq!(email.encode_value().unwrap(), input);
    }

    #[test]
    fn test_email_layout_id_is_tri_state() {
        let base = json!({
            "subject": "s",
            "body": "",
            "editorType": "block",
            "disableOutputSanitization": false
        });

        let mut with_null = base.clone();
        with_null["layoutId"] = serde_json::Value::Null;
        let mut with_id = base.clone();
        with_id["layoutId"] = json!("layout-1");

        let absent = EmailControlValues::decode_value(base.clone()).unwrap();
        let null = EmailControlValues::decode_value(with_null.clone()).unwrap();
        let set = EmailControlValues::decode_value(with_id.clone()).unwrap();

        assert_eq!(absent.layout_id, None);
        assert_eq!(null.layout_id, Some(None));
        assert_eq!(set.layout_id, Some(Some("layout-1".to_string())));
        assert!(null.additional_properties.is_empty());

        assert_eq!(absent.encode_value().unwrap(), base);
        assert_eq!(null.encode_value().unwrap(), with_null);
        assert_eq!(set.encode_value().unwrap(), with_id);
    }

    #[test]
    fn test_email_residual_cannot_shadow_known_fields() {
        let mut email = EmailControlValues::new("Real subject");
        email
            .additional_properties
            .insert("subject".to_string(), json!("Shadow"));
        email
            .additional_properties
            .insert("layoutId".to_string(), serde_json::Value::Null);

        let err = email.encode_value().unwrap_err();
        assert!(matches!(err, CodecError::Encode { .. }));
        assert!(err.to_string().contains("EmailControlValues"));

        email.additional_properties.retain(|key, _| key != "subject" && key != "layoutId");
        email
            .additional_properties
            .insert("preheader".to_string(), json!("p"));
        let encoded = email.encode_value().unwrap();
        assert_eq!(encoded["subject"], "Real subject");
        assert_eq!(EmailControlValues::decode_value(encoded).unwrap(), email);
    }

    #[test]
    fn test_email_rejects_unknown_editor() {
        let err = EmailControlValues::decode_value(json!({ "subject": "s", "editorType": "mjml" }))
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEnumValue { ref field, ref value }
                if field == "editorType" && value == "mjml"
        ));
    }

    #[test]
    fn test_delay_type_defaults_to_regular() {
        let delay = DelayControlValues::decode_value(json!({ "amount": 5, "unit": "minutes" }))
            .unwrap();
        assert_eq!(delay, DelayControlValues::new(5.0, TimeUnit::Minutes));
        assert_eq!(
            delay.encode_value().unwrap(),
            json!({ "type": "regular", "amount": 5, "unit": "minutes" })
        );
    }

    #[test]
    fn test_delay_requires_amount() {
        let err = DelayControlValues::decode_value(json!({ "unit": "minutes" })).unwrap_err();
        assert!(matches!(err, CodecError::Decode { model: "DelayControlValues", .. }));
    }

    #[test]
    fn test_digest_look_back_window_unit_path() {
        let err = DigestControlValues::decode_value(json!({
            "type": "regular",
            "lookBackWindow": { "amount": 1, "unit": "decades" }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEnumValue { ref field, .. } if field == "lookBackWindow.unit"
        ));
    }

    #[test]
    fn test_in_app_nested_redirect_target() {
        let err = InAppControlValues::decode_value(json!({
            "body": "b",
            "primaryAction": { "label": "Go", "redirect": { "url": "/x", "target": "_new" } }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEnumValue { ref field, .. }
                if field == "primaryAction.redirect.target"
        ));

        let in_app = InAppControlValues::decode_value(json!({
            "body": "b",
            "redirect": { "url": "/inbox", "target": "_blank" }
        }))
        .unwrap();
        assert!(!in_app.disable_output_sanitization);
        assert_eq!(
            in_app.redirect.and_then(|r| r.target),
            Some(RedirectTarget::Blank)
        );
    }

    #[test]
    fn test_custom_keeps_every_key() {
        let input = json!({ "skip": { "==": [1, 1] }, "anything": [1, 2, 3] });
        let custom = CustomControlValues::decode_value(input.clone()).unwrap();
        assert_eq!(custom.encode_value().unwrap(), input);
    }
}
