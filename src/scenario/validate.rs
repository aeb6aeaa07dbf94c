//! Field well-formedness checks

use url::Url;
use uuid::Uuid;

use crate::common::{Error, Result};
use crate::driver::{FieldShape, InfoField};

/// Length of the canonical hyphenated UUID form
const HYPHENATED_UUID_LEN: usize = 36;

/// Assert a displayed value is present and not just whitespace
pub fn require_non_blank(step: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::assertion(step, "a non-blank value", format!("{:?}", value)));
    }
    Ok(())
}

/// Parse a value as a UUID in the 8-4-4-4-12 hyphenated form
pub fn parse_uuid(step: &str, value: &str) -> Result<Uuid> {
    match Uuid::parse_str(value) {
        Ok(uuid) if value.len() == HYPHENATED_UUID_LEN => Ok(uuid),
        _ => Err(Error::assertion(step, "a UUID", format!("{:?}", value))),
    }
}

/// Parse a value as an absolute URL
pub fn parse_url(step: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| Error::assertion(step, "a URL", format!("{:?} ({})", value, e)))
}

/// Check an info field value against its expected shape
pub fn check_field(field: InfoField, value: &str) -> Result<()> {
    let step = format!("{} is well-formed", field);
    match field.shape() {
        FieldShape::Uuid => parse_uuid(&step, value).map(drop),
        FieldShape::Url => parse_url(&step, value).map(drop),
    }
}
