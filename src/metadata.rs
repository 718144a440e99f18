use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// One entry of the post index: `file` first, then every front-matter key in
/// the order it was declared.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub(crate) struct PostRecord {
    fields: Map<String, Value>,
}

impl PostRecord {
    /// Front-matter keys are spread on top of `file`, so a `file:` key in the
    /// front-matter replaces the name derived from the path.
    pub fn new(file: &str, front_matter: Map<String, Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("file".to_string(), Value::String(file.to_string()));
        fields.extend(front_matter);

        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn file(&self) -> Option<&str> {
        self.fields.get("file").and_then(Value::as_str)
    }

    /// Manual priority. Anything that is not a number counts as 0.
    pub fn z_index(&self) -> f64 {
        self.fields
            .get("z-index")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn time(&self) -> Option<NaiveDateTime> {
        self.fields
            .get("time")
            .and_then(Value::as_str)
            .and_then(parse_time)
    }
}

/// Parses the `time` field of a post. Offsets are normalised to UTC; naive
/// values are taken as written. Month and day may be unpadded.
pub(crate) fn parse_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
