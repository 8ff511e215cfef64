use picker_candidates::{looks_like_email, looks_like_phone, ContactReference};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryType {
    /// Nothing typed yet
    Empty,
    /// Free text matched against names
    Name,
    /// Parses as a contact reference; a new recipient can be invited
    Reference(ContactReference),
    /// Digits and separators that do not form a dialable number
    MalformedPhone,
    /// Contains `@` but is not a valid address
    MalformedEmail,
}

impl QueryType {
    #[must_use]
    pub const fn reference(&self) -> Option<&ContactReference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

pub struct QueryClassifier;

impl QueryClassifier {
    /// Classify a query. Leading and trailing whitespace is ignored.
    #[must_use]
    pub fn classify(query: &str, default_country_code: &str) -> QueryType {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return QueryType::Empty;
        }

        if let Some(reference) = ContactReference::parse(trimmed, default_country_code) {
            return QueryType::Reference(reference);
        }

        if looks_like_phone(trimmed) {
            return QueryType::MalformedPhone;
        }

        if looks_like_email(trimmed) {
            return QueryType::MalformedEmail;
        }

        QueryType::Name
    }
}
