use crate::registry::Values;
use crate::value::ControlValue;
use std::fmt;
use std::path::Path;

const HEADER: &str = "# playground-canvas values v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    Io(String),
    Parse { line: usize, message: String },
    Unstorable { key: String, reason: &'static str },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::Unstorable { key, reason } => write!(f, "cannot store {key:?}: {reason}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuesSnapshot {
    pub values: Values,
}

impl ValuesSnapshot {
    pub fn new(values: Values) -> Self {
        Self { values }
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = match std::fs::read_to_string(path) {
            Ok(v) => v,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(SnapshotError::Io(err.to_string())),
        };
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        let mut values = Values::new();
        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key_raw, value_raw)) = line.split_once('=') else {
                return Err(SnapshotError::Parse {
                    line: line_no,
                    message: "expected <key>=<json>".to_string(),
                });
            };
            let key = key_raw.trim();
            if key.is_empty() {
                return Err(SnapshotError::Parse {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }
            let value: ControlValue =
                serde_json::from_str(value_raw.trim()).map_err(|e| SnapshotError::Parse {
                    line: line_no,
                    message: e.to_string(),
                })?;
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn render(&self) -> Result<String, SnapshotError> {
        let mut body = format!("{HEADER}\n");
        for (key, value) in &self.values {
            if !storable_key(key) {
                return Err(SnapshotError::Unstorable {
                    key: key.clone(),
                    reason: "key does not fit <key>=<json>",
                });
            }
            if value.as_f64().is_some_and(|n| !n.is_finite()) {
                return Err(SnapshotError::Unstorable {
                    key: key.clone(),
                    reason: "non-finite number",
                });
            }
            let json = serde_json::to_string(value).map_err(|e| SnapshotError::Io(e.to_string()))?;
            body.push_str(key);
            body.push('=');
            body.push_str(&json);
            body.push('\n');
        }
        Ok(body)
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SnapshotError::Io(e.to_string()))?;
            }
        }
        let body = self.render()?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &body).map_err(|e| SnapshotError::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| SnapshotError::Io(e.to_string()))
    }
}

// Must survive the trim, comment skip and first-`=` split in `parse`.
fn storable_key(key: &str) -> bool {
    !key.is_empty()
        && key.trim() == key
        && !key.starts_with('#')
        && !key.contains(['=', '\n', '\r'])
}
