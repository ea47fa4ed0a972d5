//! Message table shared by domain errors and request validation.
//!
//! Every user facing message is looked up by [`ErrorCode`] and rendered by
//! substituting `{name}` placeholders. There is exactly one table; new
//! messages are added here rather than formatted ad hoc at call sites.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    AlreadyExists,
    AlreadyLiked,
    AlreadyReviewed,
    FieldRequired,
    FieldBlank,
    FieldTooLong,
    ScoreOutOfRange,
    InvalidUsername,
    InvalidEmail,
    InvalidUrl,
    NegativePrice,
    PriceScale,
    PriceTooLarge,
    CharacterRequired,
    InvalidIdentifier,
    InvalidPageNumber,
    InvalidPageSize,
    UnknownFilterKey,
    MalformedBody,
    ValidationFailed,
    Unexpected,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::AlreadyLiked => "already_liked",
            ErrorCode::AlreadyReviewed => "already_reviewed",
            ErrorCode::FieldRequired => "field_required",
            ErrorCode::FieldBlank => "field_blank",
            ErrorCode::FieldTooLong => "field_too_long",
            ErrorCode::ScoreOutOfRange => "score_out_of_range",
            ErrorCode::InvalidUsername => "invalid_username",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::NegativePrice => "negative_price",
            ErrorCode::PriceScale => "price_scale",
            ErrorCode::PriceTooLarge => "price_too_large",
            ErrorCode::CharacterRequired => "character_required",
            ErrorCode::InvalidIdentifier => "invalid_identifier",
            ErrorCode::InvalidPageNumber => "invalid_page_number",
            ErrorCode::InvalidPageSize => "invalid_page_size",
            ErrorCode::UnknownFilterKey => "unknown_filter_key",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::ValidationFailed => "validation_failed",
            ErrorCode::Unexpected => "unexpected",
        }
    }

    /// Message template with `{placeholder}` slots.
    pub const fn template(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "{aggregate} not found with id: {id}",
            ErrorCode::AlreadyExists => "{aggregate} already exists: {value}",
            ErrorCode::AlreadyLiked => "User {user} already liked media {media}",
            ErrorCode::AlreadyReviewed => "User {user} already reviewed media {media}",
            ErrorCode::FieldRequired => "{field} is required",
            ErrorCode::FieldBlank => "{field} must not be blank",
            ErrorCode::FieldTooLong => "{field} must be at most {max} characters",
            ErrorCode::ScoreOutOfRange => "Score must be between {min} and {max}",
            ErrorCode::InvalidUsername => {
                "Username must be 3-30 characters: letters, digits, '_' or '.'"
            }
            ErrorCode::InvalidEmail => "Email must be a valid address",
            ErrorCode::InvalidUrl => "{field} must be an http(s) URL: {value}",
            ErrorCode::NegativePrice => "Price must not be negative",
            ErrorCode::PriceScale => "Price must have at most {max} decimal places",
            ErrorCode::PriceTooLarge => "Price must be less than {limit}",
            ErrorCode::CharacterRequired => "Actors must have a character name",
            ErrorCode::InvalidIdentifier => "{field} must be a numeric id: {value}",
            ErrorCode::InvalidPageNumber => "Page must be a non-negative integer: {value}",
            ErrorCode::InvalidPageSize => "Page size must be between 1 and {max}",
            ErrorCode::UnknownFilterKey => "Unknown search key: {key}",
            ErrorCode::MalformedBody => "Malformed request body: {detail}",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::Unexpected => "An unexpected error occurred",
        }
    }

    pub fn render(self, args: &[(&str, &dyn fmt::Display)]) -> String {
        render(self.template(), args)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn render(template: &str, args: &[(&str, &dyn fmt::Display)]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(&value.to_string()),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: ErrorCode,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: ErrorCode,
        args: &[(&str, &dyn fmt::Display)],
    ) -> Self {
        Self {
            field: field.into(),
            code,
            message: code.render(args),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_named_placeholders() {
        let msg = ErrorCode::NotFound.render(&[("aggregate", &"Developer"), ("id", &42)]);
        assert_eq!(msg, "Developer not found with id: 42");
    }

    #[test]
    fn leaves_unknown_placeholders_in_place() {
        let msg = ErrorCode::FieldTooLong.render(&[("field", &"text")]);
        assert_eq!(msg, "text must be at most {max} characters");
    }

    #[test]
    fn codes_have_distinct_wire_names() {
        let codes = [
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::AlreadyLiked,
            ErrorCode::AlreadyReviewed,
            ErrorCode::ScoreOutOfRange,
            ErrorCode::FieldTooLong,
        ];
        let names: std::collections::HashSet<_> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), codes.len());
    }
}
