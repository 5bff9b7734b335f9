//! Record-mapping scenarios with two record types sharing one table.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use dynamock_core::{Expectation, IsoExpectation, Key, NativeValue, Needles, Schema, Values};

    use crate::{
        collect_pages, key_query, mock_client, product_schema, save_record, store_schema,
    };

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, day, 3, 4, 5)
            .single()
            .expect("valid datetime")
    }

    fn values(pairs: Vec<(&str, NativeValue)>) -> Values {
        pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    fn product(id: &str, category: &str, units: i64) -> Values {
        values(vec![
            ("product_id", format!("prod:{id}").into()),
            ("line", "line:standard".into()),
            ("category", category.into()),
            ("name", format!("Product {id}").into()),
            ("units", units.into()),
            ("price", 12.5.into()),
            ("created_at", at(1).into()),
        ])
    }

    fn store(id: &str, employees: i64) -> Values {
        values(vec![
            ("store_id", format!("store:{id}").into()),
            ("region", "region:eu".into()),
            ("name", format!("Store {id}").into()),
            ("employees", employees.into()),
            ("created_at", at(1).into()),
        ])
    }

    #[test]
    fn test_should_store_and_decode_records() -> anyhow::Result<()> {
        let mut client = mock_client();
        let (products, stores) = (product_schema(), store_schema());
        save_record(&mut client, &products, &product("1", "cat:toys", 4))?;
        save_record(&mut client, &products, &product("2", "cat:books", 7))?;
        save_record(&mut client, &stores, &store("1", 12))?;

        let decoded = client.table().all_rows_matching(&products)?;
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0]["product_id"], NativeValue::from("prod:1"));
        assert_eq!(decoded[0]["units"], NativeValue::Integer(4));
        assert_eq!(decoded[0]["price"], NativeValue::Float(12.5));
        assert_eq!(decoded[0]["created_at"], NativeValue::Datetime(at(1)));

        let decoded = client.table().all_rows_matching(&stores)?;
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0]["employees"], NativeValue::Integer(12));
        Ok(())
    }

    #[test]
    fn test_should_tell_record_types_apart() -> anyhow::Result<()> {
        let mut client = mock_client();
        let (products, stores) = (product_schema(), store_schema());
        save_record(&mut client, &products, &product("1", "cat:toys", 4))?;
        save_record(&mut client, &stores, &store("1", 12))?;

        let mut kinds = Vec::new();
        for item in client.scan_items() {
            let schema = Schema::first_match(&[&products, &stores], &item).expect("known type");
            kinds.push(schema.partition_key.name.clone());
        }
        assert_eq!(kinds, vec!["product_id", "store_id"]);
        Ok(())
    }

    #[test]
    fn test_should_query_records_by_global_index() -> anyhow::Result<()> {
        let mut client = mock_client();
        let products = product_schema();
        save_record(&mut client, &products, &product("1", "cat:toys", 4))?;
        save_record(&mut client, &products, &product("2", "cat:books", 7))?;
        save_record(&mut client, &products, &product("3", "cat:toys", 1))?;

        let input = key_query(
            Some("g1_partition"),
            "#g1k = :g1k AND begins_with(#pk, :pk)",
            &[("#g1k", "g1k"), ("#pk", "pk")],
            &[(":g1k", "cat:toys"), (":pk", "prod:")],
        );
        let items = collect_pages(&client, "query", &input)?;
        let ids: Vec<_> = items
            .iter()
            .filter_map(|item| products.decode_row(item).transpose())
            .map(|values| values.map(|v| v["product_id"].clone()))
            .collect::<Result<_, _>>()?;
        assert_eq!(ids, vec![NativeValue::from("prod:1"), NativeValue::from("prod:3")]);
        Ok(())
    }

    #[test]
    fn test_should_preserve_creation_time_on_resave() -> anyhow::Result<()> {
        let mut client = mock_client();
        let products = product_schema();
        save_record(&mut client, &products, &product("1", "cat:toys", 4))?;

        let mut changed = product("1", "", 9);
        changed.insert("created_at".to_owned(), at(20).into());
        changed.insert("updated_at".to_owned(), at(20).into());
        let stored = save_record(&mut client, &products, &changed)?;
        assert!(!stored.contains_key("g1k"), "empty category is removed");

        let key = Key::new("prod:1", Some("line:standard"));
        client.table().assert_row_values(
            &key,
            &[
                ("units", 9_i64.into()),
                ("units", Expectation::KindOf(vec!["integer"])),
                ("price", NativeValue::Float(12.5).into()),
                ("name", Expectation::like("Product *")),
                ("pk", Expectation::matches(r"prod:\d+")),
                ("g1k", Expectation::Optional("cat:toys".into())),
                (
                    "created_at",
                    Expectation::Iso(IsoExpectation {
                        year: Some(2020),
                        month: Some(1),
                        day: Some(1),
                        ..IsoExpectation::default()
                    }),
                ),
                (
                    "updated_at",
                    Expectation::Iso(IsoExpectation {
                        min: Some(at(19)),
                        ..IsoExpectation::default()
                    }),
                ),
            ],
        );

        let input = key_query(
            Some("g1_partition"),
            "#g1k = :g1k",
            &[("#g1k", "g1k")],
            &[(":g1k", "cat:toys")],
        );
        assert!(collect_pages(&client, "query", &input)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_should_find_records_by_needles() -> anyhow::Result<()> {
        let mut client = mock_client();
        let (products, stores) = (product_schema(), store_schema());
        save_record(&mut client, &products, &product("1", "cat:toys", 4))?;
        save_record(&mut client, &products, &product("2", "cat:books", 7))?;
        save_record(&mut client, &stores, &store("1", 4))?;

        let needles: Needles = [("units".to_owned(), NativeValue::Integer(4))].into();
        let found = client.table().find_rows_matching(&needles, &products)?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], NativeValue::from("Product 1"));

        let needles: Needles = [("name".to_owned(), NativeValue::from("Store *"))].into();
        assert!(client.table().find_rows_matching(&needles, &products)?.is_empty());
        assert_eq!(client.table().find_rows(&needles)?.len(), 1);

        client.table().assert_matching_row_values(
            "prod:1",
            Some("line:"),
            &[("g1k", Expectation::In(vec!["cat:toys".into(), "cat:books".into()]))],
            false,
        );
        Ok(())
    }
}
