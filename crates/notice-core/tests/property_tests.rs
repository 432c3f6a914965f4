//! Property-based tests for the naming policy and field mapping.

use notice_core::{
    artifact_file_name, build_field_map, NoticeContext, TenantRecord, COMPANY_NAME,
};
use proptest::prelude::*;

fn address_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{1,30}"
}

fn cell_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9,./ -]{0,40}"
}

fn input_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9/]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn artifact_names_never_contain_spaces(index in 0usize..1000, address in address_strategy()) {
        let name = artifact_file_name(index, &address);
        prop_assert!(!name.contains(' '));
        let prefix = format!("{}_", index);
        prop_assert!(name.starts_with(&prefix));
        prop_assert!(name.ends_with("_3day.pdf"));
    }

    #[test]
    fn artifact_names_are_deterministic(index in 0usize..1000, address in address_strategy()) {
        prop_assert_eq!(
            artifact_file_name(index, &address),
            artifact_file_name(index, &address)
        );
    }

    #[test]
    fn field_map_always_carries_fifteen_keys(
        tenant in cell_strategy(),
        full_address in cell_strategy(),
        address_1 in address_strategy(),
        address_2 in cell_strategy(),
        money in cell_strategy(),
        county in cell_strategy(),
        zip in cell_strategy(),
        due_date in input_strategy(),
        month in input_strategy(),
        year in input_strategy(),
        mailed_date in input_strategy(),
    ) {
        let record = TenantRecord {
            tenant,
            full_address,
            address_1,
            address_2,
            money,
            county,
            zip,
        };
        let ctx = NoticeContext::new(due_date, month, year, mailed_date).unwrap();
        let map = build_field_map(&record, &ctx);

        prop_assert_eq!(map.len(), 15);
        prop_assert_eq!(&map["date_1"], &map["mailed_date"]);
        prop_assert_eq!(&map["date_2"], &map["mailed_date"]);
        prop_assert_eq!(map["company"].as_str(), COMPANY_NAME);
        prop_assert_eq!(map["company_2"].as_str(), COMPANY_NAME);
    }
}
