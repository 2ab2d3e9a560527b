//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn invalid_field_error(field: FieldName, message: &str, value: &str) -> Error {
    Error::invalid_request(message.to_owned()).with_details(json!({
        "field": field.as_str(),
        "value": value,
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let field_name = field.as_str();
        invalid_field_error(field, &format!("{field_name} must be a valid UUID"), value)
    })
}

/// Parse an enum-like field via its `FromStr`, reporting the offending
/// value in the error details.
pub(crate) fn parse_enum_field<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value).map_err(|err| invalid_field_error(field, &err.to_string(), value))
}

/// Parse an optional enum-like query/body field.
pub(crate) fn parse_optional_enum_field<T>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map(|raw| parse_enum_field(raw, field)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::TransactionDirection;
    use rstest::rstest;

    #[rstest]
    fn uuid_errors_carry_field_and_value() {
        let err = parse_uuid("nope", FieldName::new("jobId")).expect_err("invalid uuid");
        let details = err.details().expect("details");
        assert_eq!(details["field"], "jobId");
        assert_eq!(details["value"], "nope");
    }

    #[rstest]
    fn enum_fields_parse_through_from_str() {
        let direction: TransactionDirection =
            parse_enum_field("earn", FieldName::new("direction")).expect("valid direction");
        assert_eq!(direction, TransactionDirection::Earn);
    }

    #[rstest]
    fn optional_enum_fields_pass_none_through() {
        let parsed: Option<TransactionDirection> =
            parse_optional_enum_field(None, FieldName::new("direction")).expect("none is fine");
        assert!(parsed.is_none());
    }
}
