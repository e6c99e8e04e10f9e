//! PocketBase filter expression builder.
//!
//! PocketBase filters are strings such as
//! `created >= '2024-05-01 00:00:00' && created < '2024-06-01 00:00:00'`.
//! Values are single-quoted; embedded quotes are backslash-escaped.

use chrono::NaiveDateTime;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Clone)]
pub struct FilterBuilder {
    clauses: Vec<String>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field >= 'datetime'`
    pub fn at_or_after(mut self, field: &str, at: NaiveDateTime) -> Self {
        self.clauses
            .push(format!("{} >= '{}'", field, at.format(DATETIME_FORMAT)));
        self
    }

    /// `field < 'datetime'`
    pub fn before(mut self, field: &str, at: NaiveDateTime) -> Self {
        self.clauses
            .push(format!("{} < '{}'", field, at.format(DATETIME_FORMAT)));
        self
    }

    /// `field = 'value'`
    pub fn equals(mut self, field: &str, value: &str) -> Self {
        self.clauses
            .push(format!("{} = '{}'", field, escape_value(value)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn build(self) -> String {
        self.clauses.join(" && ")
    }
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn renders_half_open_range() {
        let filter = FilterBuilder::new()
            .at_or_after("sale_date", midnight(2024, 5, 1))
            .before("sale_date", midnight(2024, 6, 1))
            .build();
        assert_eq!(
            filter,
            "sale_date >= '2024-05-01 00:00:00' && sale_date < '2024-06-01 00:00:00'"
        );
    }

    #[test]
    fn escapes_quotes_in_equality_values() {
        let filter = FilterBuilder::new().equals("status", "o'neil").build();
        assert_eq!(filter, "status = 'o\\'neil'");
    }

    #[test]
    fn empty_builder_renders_empty_string() {
        let builder = FilterBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.build(), "");
    }
}
