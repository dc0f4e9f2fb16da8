//! Aggregation query.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Date format used on the wire (`YYYY-MM-DD`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised when building a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The start of the range is after its end.
    #[error("from date {from} is after to date {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    /// A required text field is blank.
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
}

/// What to aggregate: a city, an inclusive date range and the country context.
///
/// A query is immutable once built and is shared read-only by every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    city: String,
    from_date: NaiveDate,
    to_date: NaiveDate,
    country: String,
    country_code: String,
}

impl Query {
    /// Builds a query, rejecting blank fields and inverted ranges.
    pub fn new(
        city: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
        country: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let city = city.into();
        let country = country.into();
        let country_code = country_code.into();

        for (field, value) in [
            ("city", &city),
            ("country", &country),
            ("country_code", &country_code),
        ] {
            if value.trim().is_empty() {
                return Err(QueryError::MissingField { field });
            }
        }

        if from_date > to_date {
            return Err(QueryError::InvertedRange {
                from: from_date,
                to: to_date,
            });
        }

        Ok(Self {
            city,
            from_date,
            to_date,
            country,
            country_code,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Start of the range as `YYYY-MM-DD`.
    pub fn from_iso(&self) -> String {
        self.from_date.format(ISO_DATE_FORMAT).to_string()
    }

    /// End of the range as `YYYY-MM-DD`.
    pub fn to_iso(&self) -> String {
        self.to_date.format(ISO_DATE_FORMAT).to_string()
    }
}
