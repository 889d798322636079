use crate::schema::Schema;
use crate::value::{ControlValue, ValueKind};
use std::collections::BTreeMap;

pub const NO_CONTROLS_PARAM: &str = "nocontrols";
pub const REMOTE_CONTROLS_PARAM: &str = "remote";
pub const REMOTE_CONTROLS_CONTROLLER: &str = "controller";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (k, v) = part.split_once('=').unwrap_or((part, ""));
                (form_decode(k), form_decode(v))
            })
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.pairs.iter().cloned().collect()
    }

    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub path: String,
    pub query: QueryParams,
}

impl PageLocation {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.split('#').next().unwrap_or_default();
        let without_origin = match raw.find("://") {
            Some(idx) => {
                let rest = &raw[idx + 3..];
                rest.find(['/', '?']).map(|i| &rest[i..]).unwrap_or("")
            }
            None => raw,
        };
        let (path, query) = without_origin
            .split_once('?')
            .unwrap_or((without_origin, ""));
        Self {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query: QueryParams::parse(query),
        }
    }

    pub fn controls_hidden(&self) -> bool {
        self.query.get(NO_CONTROLS_PARAM) == Some("true")
    }

    pub fn requests_controller(&self) -> bool {
        self.query.get(REMOTE_CONTROLS_PARAM) == Some(REMOTE_CONTROLS_CONTROLLER)
    }
}

/// JS `parseFloat`: longest numeric prefix after leading whitespace, NaN if none.
pub fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let rest = &s[end..];
    if rest.starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

pub fn parse_param(raw: &str, default: &ControlValue) -> ControlValue {
    match default.kind() {
        ValueKind::Number => {
            let parsed = parse_float_prefix(raw);
            if parsed.is_finite() {
                ControlValue::Number(parsed)
            } else {
                default.clone()
            }
        }
        ValueKind::Bool => ControlValue::Bool(raw == "true"),
        ValueKind::Text => ControlValue::Text(raw.to_string()),
    }
}

pub fn merge_url_params(schema: &Schema, params: &QueryParams) -> Schema {
    let overrides = params.to_map();
    schema
        .iter()
        .map(|(key, control)| {
            let mut control = control.clone();
            if let (Some(raw), Some(default)) = (overrides.get(key), control.default_value()) {
                if !raw.is_empty() {
                    control.kind.set_default_value(parse_param(raw, &default));
                }
            }
            (key.clone(), control)
        })
        .collect()
}

pub fn preview_url<'a, I>(base_path: &str, values: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a ControlValue)>,
{
    let mut params = QueryParams::default();
    params.set(NO_CONTROLS_PARAM, "true");
    for (key, value) in values {
        params.set(key.clone(), value.to_string());
    }
    format!("{base_path}?{}", params.to_query_string())
}

fn form_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn form_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => out.push(b as char),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
