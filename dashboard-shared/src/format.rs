//! Per-field formatting of inbound metric values.
//!
//! Each present field turns into a [`FieldRender`]: the text to show (or
//! `None` for the placeholder) and the group tag to apply.

use serde_json::Value;

use crate::metrics::{FieldKind, MetricName};
use crate::slot::{DtcTag, IgnitionTag, StateTag};

const SECONDS_PER_DAY: i64 = 86_400;

/// Text returned for a slot whose trouble-code field carries no fault.
pub const NO_DTC_TEXT: &str = "None";

/// Result of formatting one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRender {
    /// Rendered text, `None` for the placeholder
    pub text: Option<String>,
    /// Tag to set on the slot's group, `None` clears it
    pub tag: Option<StateTag>,
}

impl FieldRender {
    /// Placeholder text with no tag.
    pub fn absent() -> Self {
        Self {
            text: None,
            tag: None,
        }
    }

    /// Plain text with no tag.
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            tag: None,
        }
    }
}

/// Format a field value for its slot.
///
/// Null clears the slot to its placeholder, except for trouble codes where
/// null means "no fault" and renders like an explicit `None`.
pub fn render_field(name: MetricName, value: &Value) -> FieldRender {
    match name.kind() {
        FieldKind::TroubleCode => render_dtc(value),
        _ if value.is_null() => FieldRender::absent(),
        FieldKind::Ignition => render_ignition(value),
        FieldKind::Duration => match seconds_of(value) {
            Some(seconds) => FieldRender::text(format_idling_time(seconds)),
            None => FieldRender::absent(),
        },
        FieldKind::Gauge { decimals } => match value.as_f64() {
            Some(number) => FieldRender::text(format_fixed(number, decimals)),
            None => FieldRender::text(plain_text(value)),
        },
    }
}

fn render_ignition(value: &Value) -> FieldRender {
    let label = plain_text(value);
    let tag = value
        .as_str()
        .and_then(IgnitionTag::from_label)
        .map(StateTag::Ignition);
    FieldRender {
        text: Some(label),
        tag,
    }
}

fn render_dtc(value: &Value) -> FieldRender {
    let codes = match value {
        Value::String(code) if !code.is_empty() && code != NO_DTC_TEXT => Some(code.clone()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(plain_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    };

    match codes {
        Some(text) => FieldRender {
            text: Some(text),
            tag: Some(StateTag::Dtc(DtcTag::HasDtc)),
        },
        None => FieldRender {
            text: Some(NO_DTC_TEXT.to_string()),
            tag: Some(StateTag::Dtc(DtcTag::NoDtc)),
        },
    }
}

fn seconds_of(value: &Value) -> Option<i64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !seconds.is_finite() || seconds.abs() > i64::MAX as f64 {
        return None;
    }
    Some(seconds.trunc() as i64)
}

/// Format elapsed seconds as `HH:MM:SS` on a 24-hour clock.
///
/// Counts past a day wrap around; negative counts wrap backwards from midnight.
pub fn format_idling_time(seconds: i64) -> String {
    let of_day = seconds.rem_euclid(SECONDS_PER_DAY);
    let hours = of_day / 3600;
    let mins = (of_day / 60) % 60;
    let secs = of_day % 60;
    format!("{hours:02}:{mins:02}:{secs:02}")
}

/// Fixed-point text with `decimals` fractional digits.
///
/// Values that round to zero are shown without a sign, so reformatting the
/// parsed output always reproduces the same text.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    match text.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => text,
    }
}

/// Plain text representation of a JSON value.
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn text(name: MetricName, value: Value) -> Option<String> {
        render_field(name, &value).text
    }

    #[test]
    fn test_idling_time_examples() {
        assert_eq!(format_idling_time(0), "00:00:00");
        assert_eq!(format_idling_time(3661), "01:01:01");
        assert_eq!(format_idling_time(86_399), "23:59:59");
    }

    #[test]
    fn test_idling_time_wraps_past_a_day() {
        assert_eq!(format_idling_time(86_400), "00:00:00");
        assert_eq!(format_idling_time(90_061), "01:01:01");
        assert_eq!(format_idling_time(-1), "23:59:59");
    }

    #[test]
    fn test_idling_time_field_values() {
        assert_eq!(
            text(MetricName::IdlingTime, json!(125)),
            Some("00:02:05".to_string())
        );
        assert_eq!(
            text(MetricName::IdlingTime, json!(61.9)),
            Some("00:01:01".to_string())
        );
        assert_eq!(
            text(MetricName::IdlingTime, json!("90")),
            Some("00:01:30".to_string())
        );
        assert_eq!(text(MetricName::IdlingTime, json!("soon")), None);
    }

    #[test]
    fn test_gauge_precision() {
        assert_eq!(text(MetricName::Rpm, json!(812)), Some("812.0".to_string()));
        assert_eq!(text(MetricName::Mpg, json!(31.46)), Some("31.5".to_string()));
        assert_eq!(
            text(MetricName::Acceleration, json!(-0.5)),
            Some("-0.50".to_string())
        );
        assert_eq!(
            text(MetricName::TripDistance, json!(12.345678)),
            Some("12.35".to_string())
        );
    }

    proptest! {
        #[test]
        fn test_fixed_formatting_is_idempotent(
            value in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            decimals in 1usize..=2,
        ) {
            let once = format_fixed(value, decimals);
            let reparsed: f64 = once.parse().unwrap();
            prop_assert_eq!(format_fixed(reparsed, decimals), once);
        }

        #[test]
        fn test_idling_time_is_always_a_clock(seconds in any::<i64>()) {
            let text = format_idling_time(seconds);
            let bytes = text.as_bytes();
            prop_assert_eq!(bytes.len(), 8);
            prop_assert_eq!(bytes[2], b':');
            prop_assert_eq!(bytes[5], b':');
            for i in [0, 1, 3, 4, 6, 7] {
                prop_assert!(bytes[i].is_ascii_digit(), "{}", text);
            }
            prop_assert!(text[0..2].parse::<u32>().unwrap() < 24);
            prop_assert!(text[3..5].parse::<u32>().unwrap() < 60);
            prop_assert!(text[6..8].parse::<u32>().unwrap() < 60);
        }
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_fixed(-0.0, 1), "0.0");
        assert_eq!(format_fixed(-0.004, 2), "0.00");
        assert_eq!(format_fixed(-0.06, 1), "-0.1");
    }

    #[test]
    fn test_null_is_absent() {
        for name in MetricName::ALL.into_iter().filter(|name| *name != MetricName::Dtc) {
            assert_eq!(render_field(name, &Value::Null), FieldRender::absent());
        }
    }

    #[test]
    fn test_dtc_without_fault_renders_none() {
        for value in [json!("None"), Value::Null, json!(""), json!([]), json!(0)] {
            let render = render_field(MetricName::Dtc, &value);
            assert_eq!(render.text.as_deref(), Some("None"));
            assert_eq!(render.tag, Some(StateTag::Dtc(DtcTag::NoDtc)));
        }
    }

    #[test]
    fn test_dtc_with_fault() {
        let render = render_field(MetricName::Dtc, &json!("P0300"));
        assert_eq!(render.text.as_deref(), Some("P0300"));
        assert_eq!(render.tag, Some(StateTag::Dtc(DtcTag::HasDtc)));

        let render = render_field(MetricName::Dtc, &json!(["P0300", "P0171"]));
        assert_eq!(render.text.as_deref(), Some("P0300, P0171"));
        assert_eq!(render.tag, Some(StateTag::Dtc(DtcTag::HasDtc)));
    }

    #[test]
    fn test_ignition_labels_and_tags() {
        let render = render_field(MetricName::IgnitionState, &json!("Running"));
        assert_eq!(render.text.as_deref(), Some("Running"));
        assert_eq!(render.tag, Some(StateTag::Ignition(IgnitionTag::Running)));

        let render = render_field(MetricName::IgnitionState, &json!("Accessory"));
        assert_eq!(render.text.as_deref(), Some("Accessory"));
        assert_eq!(render.tag, None);
    }

    #[test]
    fn test_non_numeric_gauge_values_render_plain_text() {
        assert_eq!(
            text(MetricName::Speed, json!("stalled")),
            Some("stalled".to_string())
        );
        assert_eq!(text(MetricName::Soc, json!(true)), Some("true".to_string()));
        assert_eq!(
            text(MetricName::Rpm, json!({"raw": 3})),
            Some(r#"{"raw":3}"#.to_string())
        );
    }
}
