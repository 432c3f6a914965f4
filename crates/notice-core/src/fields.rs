//! Per-row form field mapping

use crate::error::NoticeError;
use crate::records::TenantRecord;
use std::collections::BTreeMap;

/// Organization name printed on every notice.
pub const COMPANY_NAME: &str = "The Experts Team Realty, Inc";

/// Office phone printed on every notice.
pub const PHONE: &str = "407-674-7994";

/// Form field name -> value, built fresh per row.
pub type FieldMap = BTreeMap<String, String>;

/// The four user-supplied date strings, shared read-only across all rows of
/// a run. All four are opaque free text ("19th", "August", "24", ...).
#[derive(Debug, Clone)]
pub struct NoticeContext {
    pub due_date: String,
    pub month: String,
    pub year: String,
    pub mailed_date: String,
}

impl NoticeContext {
    /// Build a context, rejecting blank inputs up front so a bad request
    /// never reaches the filesystem.
    pub fn new(
        due_date: impl Into<String>,
        month: impl Into<String>,
        year: impl Into<String>,
        mailed_date: impl Into<String>,
    ) -> Result<Self, NoticeError> {
        let ctx = Self {
            due_date: due_date.into(),
            month: month.into(),
            year: year.into(),
            mailed_date: mailed_date.into(),
        };

        let blank: Vec<&str> = [
            ("due_date", &ctx.due_date),
            ("month", &ctx.month),
            ("year", &ctx.year),
            ("mailed_date", &ctx.mailed_date),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !blank.is_empty() {
            return Err(NoticeError::Input(blank.join(", ")));
        }

        Ok(ctx)
    }
}

/// Combine one record with the run context into the 15 template fields.
///
/// `date_1` and `date_2` both carry the mailed date, and `company` /
/// `company_2` both carry the organization name; the template prints them in
/// separate places.
pub fn build_field_map(record: &TenantRecord, ctx: &NoticeContext) -> FieldMap {
    let mut map = FieldMap::new();
    map.insert("tenant".into(), record.tenant.clone());
    map.insert("address_1".into(), record.address_1.clone());
    map.insert("address_2".into(), record.address_2.clone());
    map.insert("money".into(), record.money.clone());
    map.insert("county".into(), record.county.clone());
    map.insert("due_date".into(), ctx.due_date.clone());
    map.insert("month".into(), ctx.month.clone());
    map.insert("year".into(), ctx.year.clone());
    map.insert("mailed_date".into(), ctx.mailed_date.clone());
    map.insert("company_2".into(), COMPANY_NAME.into());
    map.insert("phone".into(), PHONE.into());
    map.insert("date_1".into(), ctx.mailed_date.clone());
    map.insert("date_2".into(), ctx.mailed_date.clone());
    map.insert("company".into(), COMPANY_NAME.into());
    map.insert("full_adress".into(), record.full_address.clone());
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_record() -> TenantRecord {
        TenantRecord {
            tenant: "Jane Doe".into(),
            full_address: "1 Main St, Apt 2".into(),
            address_1: "1 Main St".into(),
            address_2: "Apt 2".into(),
            money: "1200".into(),
            county: "Orange".into(),
            zip: "32801".into(),
        }
    }

    fn test_context() -> NoticeContext {
        NoticeContext::new("19th", "August", "24", "08/02/2024").unwrap()
    }

    #[test]
    fn map_contains_exactly_the_fifteen_template_fields() {
        let map = build_field_map(&test_record(), &test_context());
        // BTreeMap iterates in key order.
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "address_1",
                "address_2",
                "company",
                "company_2",
                "county",
                "date_1",
                "date_2",
                "due_date",
                "full_adress",
                "mailed_date",
                "money",
                "month",
                "phone",
                "tenant",
                "year",
            ]
        );
    }

    #[test]
    fn duplicated_fields_share_their_source_value() {
        let map = build_field_map(&test_record(), &test_context());
        assert_eq!(map["date_1"], "08/02/2024");
        assert_eq!(map["date_2"], "08/02/2024");
        assert_eq!(map["date_1"], map["mailed_date"]);
        assert_eq!(map["company"], COMPANY_NAME);
        assert_eq!(map["company_2"], COMPANY_NAME);
        assert_eq!(map["phone"], PHONE);
    }

    #[test]
    fn record_values_flow_through_unchanged() {
        let map = build_field_map(&test_record(), &test_context());
        assert_eq!(map["tenant"], "Jane Doe");
        assert_eq!(map["full_adress"], "1 Main St, Apt 2");
        assert_eq!(map["money"], "1200");
        assert_eq!(map["county"], "Orange");
    }

    #[test]
    fn blank_inputs_are_rejected_before_any_work() {
        let err = NoticeContext::new("19th", "  ", "24", "").unwrap_err();
        assert!(matches!(err, NoticeError::Input(_)));
        let msg = err.to_string();
        assert!(msg.contains("month"));
        assert!(msg.contains("mailed_date"));
        assert!(!msg.contains("due_date"));
    }
}
