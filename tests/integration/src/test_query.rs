//! Query and scan scenarios over the shared six-row fixture.

#[cfg(test)]
mod tests {
    use dynamock_core::{MockClient, TableConfig, index};
    use dynamock_model::{AttributeValue, Item};
    use dynamock_model::error::DynamoDBErrorCode;
    use dynamock_model::input::PaginateInput;

    use crate::{collect_pages, key_query, mock_client, prefix_query, seed_prefix_rows};

    fn sort_values(items: &[dynamock_model::Item]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| item.get("sk").and_then(AttributeValue::as_s))
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_should_query_primary_index_by_sort_prefix() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let baz = collect_pages(&client, "query", &prefix_query("foo", "baz"))?;
        assert_eq!(sort_values(&baz), vec!["baz4", "baz5"]);

        let ba = collect_pages(&client, "query", &prefix_query("foo", "ba"))?;
        assert_eq!(ba.len(), 5);

        let spam = collect_pages(&client, "query", &prefix_query("spam", "ba"))?;
        assert_eq!(spam.len(), 1);

        let none = collect_pages(&client, "query", &prefix_query("nope", ""))?;
        assert!(none.is_empty());
        Ok(())
    }

    #[test]
    fn test_should_answer_query_with_empty_page_first() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let pages = client
            .get_paginator("query")?
            .paginate(&prefix_query("foo", "bar"))?;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].count, 0);
        assert_eq!(pages[1].count, 3);
        Ok(())
    }

    #[test]
    fn test_should_query_inverted_index() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let input = key_query(
            Some(index::INVERTED.id),
            "#sk = :sk AND begins_with(#pk, :pk)",
            &[("#pk", "pk"), ("#sk", "sk")],
            &[(":sk", "bar1"), (":pk", "foo")],
        );
        let items = collect_pages(&client, "query", &input)?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["pk"], AttributeValue::S("foo".to_owned()));
        Ok(())
    }

    #[test]
    fn test_should_query_sparse_global_index() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let g1 = |value: &str| {
            key_query(
                Some("g1_partition"),
                "#g1k = :g1k AND begins_with(#pk, :pk)",
                &[("#g1k", "g1k"), ("#pk", "pk")],
                &[(":g1k", value), (":pk", "foo")],
            )
        };
        assert_eq!(collect_pages(&client, "query", &g1("c"))?.len(), 1);
        assert_eq!(collect_pages(&client, "query", &g1("a"))?.len(), 2);

        let g2 = key_query(
            Some("g2_partition"),
            "#g2k = :g2k",
            &[("#g2k", "g2k")],
            &[(":g2k", "a")],
        );
        assert!(collect_pages(&client, "query", &g2)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_should_limit_query_results() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let mut input = prefix_query("foo", "ba");
        input.limit = Some(3);
        let items = collect_pages(&client, "query", &input)?;
        assert_eq!(sort_values(&items), vec!["bar1", "bar2", "bar3"]);
        Ok(())
    }

    #[test]
    fn test_should_stop_at_limit_of_ten() -> anyhow::Result<()> {
        let mut client = mock_client();
        for n in 0..15 {
            client
                .table_mut()
                .add("many", Some(format!("row{n:02}").as_str()), None, None, Item::new())?;
        }

        let mut input = prefix_query("many", "row");
        assert_eq!(collect_pages(&client, "query", &input)?.len(), 15);

        input.limit = Some(10);
        let pages = client.get_paginator("query")?.paginate(&input)?;
        assert_eq!(pages.iter().map(|page| page.count).sum::<usize>(), 10);
        let items: Vec<_> = pages.into_iter().flat_map(|page| page.items).collect();
        let expected: Vec<String> = (0..10).map(|n| format!("row{n:02}")).collect();
        assert_eq!(sort_values(&items), expected);
        Ok(())
    }

    #[test]
    fn test_should_query_indexes_of_custom_key_names() -> anyhow::Result<()> {
        crate::init_tracing();
        let mut client = MockClient::new(TableConfig {
            partition_key: "id".to_owned(),
            sort_key: Some("kind".to_owned()),
            first_global_index_key: Some("owner".to_owned()),
            ..TableConfig::default()
        });
        client
            .table_mut()
            .add("foo", Some("bar1"), Some("alice"), None, Item::new())?
            .add("foo", Some("bar2"), Some("bob"), None, Item::new())?;

        let inverted = key_query(
            Some(index::INVERTED.id),
            "#kind = :kind",
            &[("#kind", "kind")],
            &[(":kind", "bar2")],
        );
        let items = collect_pages(&client, "query", &inverted)?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], AttributeValue::S("foo".to_owned()));

        let by_owner = key_query(
            Some("g1_partition"),
            "#owner = :owner",
            &[("#owner", "owner")],
            &[(":owner", "alice")],
        );
        let items = collect_pages(&client, "query", &by_owner)?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["kind"], AttributeValue::S("bar1".to_owned()));
        Ok(())
    }

    #[test]
    fn test_should_query_with_range_conditions() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let input = key_query(
            None,
            "#pk = :pk AND #sk BETWEEN :lo AND :hi",
            &[("#pk", "pk"), ("#sk", "sk")],
            &[(":pk", "foo"), (":lo", "bar2"), (":hi", "baz4")],
        );
        let items = collect_pages(&client, "query", &input)?;
        assert_eq!(sort_values(&items), vec!["bar2", "bar3", "baz4"]);

        let input = key_query(
            None,
            "#pk = :pk AND #sk > :sk",
            &[("#pk", "pk"), ("#sk", "sk")],
            &[(":pk", "foo"), (":sk", "bar3")],
        );
        let items = collect_pages(&client, "query", &input)?;
        assert_eq!(sort_values(&items), vec!["baz4", "baz5"]);
        Ok(())
    }

    #[test]
    fn test_should_run_query_captured_as_json() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let input: PaginateInput = serde_json::from_value(serde_json::json!({
            "TableName": "NA",
            "IndexName": "g1_partition",
            "KeyConditionExpression": "#g1k = :g1k",
            "ExpressionAttributeNames": {"#g1k": "g1k"},
            "ExpressionAttributeValues": {":g1k": {"S": "b"}},
            "Limit": 1
        }))?;
        let items = collect_pages(&client, "query", &input)?;
        assert_eq!(sort_values(&items), vec!["bar3"]);

        let json = serde_json::to_value(&items[0])?;
        assert_eq!(json["g1k"], serde_json::json!({"S": "b"}));
        Ok(())
    }

    #[test]
    fn test_should_scan_every_row() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let pages = client
            .get_paginator("scan")?
            .paginate(&PaginateInput::default())?;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].items.len(), 6);
        Ok(())
    }

    #[test]
    fn test_should_reject_unknown_index_and_operation() -> anyhow::Result<()> {
        let mut client = mock_client();
        seed_prefix_rows(client.table_mut())?;

        let input = key_query(Some("nope"), "#pk = :pk", &[("#pk", "pk")], &[(":pk", "foo")]);
        let err = collect_pages(&client, "query", &input).expect_err("unknown index");
        assert_eq!(err.code, DynamoDBErrorCode::ValidationException);

        let err = client.get_paginator("list_tables").err().expect("unsupported");
        assert_eq!(err.code, DynamoDBErrorCode::UnsupportedOperationException);
        Ok(())
    }
}
