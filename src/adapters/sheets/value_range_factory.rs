use google_sheets4::api::ValueRange;
use serde_json::Value;
use std::borrow::Cow;

pub trait ValueRangeFactory {
    fn from_rows<'a, T: Into<Cow<'a, str>>>(rows: Vec<Vec<T>>) -> Self;
}

fn wrap_value<'a, T: Into<Cow<'a, str>>>(value: T) -> Value {
    Value::String(value.into().into_owned())
}

impl ValueRangeFactory for ValueRange {
    fn from_rows<'a, T: Into<Cow<'a, str>>>(rows: Vec<Vec<T>>) -> Self {
        let values = rows
            .into_iter()
            .map(|row| row.into_iter().map(wrap_value).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(values),
        }
    }
}
