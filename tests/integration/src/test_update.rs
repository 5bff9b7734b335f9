//! Write scenarios: update expressions, batches and transactions.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use dynamock_core::{Expectation, Key};
    use dynamock_model::{AttributeValue, Item};
    use dynamock_model::error::DynamoDBErrorCode;
    use dynamock_model::input::{
        BatchWriteItemInput, DeleteItemInput, GetItemInput, TransactWriteItemsInput,
        UpdateItemInput,
    };
    use dynamock_model::types::{Put, TransactWriteItem, Update, WriteRequest};

    use crate::mock_client;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_owned())
    }

    fn item(pairs: &[(&str, &str)]) -> Item {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), s(v))).collect()
    }

    fn update(key: &[(&str, &str)], expression: &str, values: &[(&str, &str)]) -> UpdateItemInput {
        let names: HashMap<String, String> = ["k0", "k1", "k2", "k3"]
            .iter()
            .map(|k| (format!("#{k}"), (*k).to_owned()))
            .filter(|(placeholder, _)| expression.contains(placeholder.as_str()))
            .collect();
        UpdateItemInput {
            table_name: "NA".to_owned(),
            key: item(key),
            update_expression: Some(expression.to_owned()),
            expression_attribute_names: names,
            expression_attribute_values: values
                .iter()
                .map(|(k, v)| ((*k).to_owned(), s(v)))
                .collect(),
        }
    }

    #[test]
    fn test_should_keep_first_value_with_if_not_exists() -> anyhow::Result<()> {
        let mut client = mock_client();
        let key = [("pk", "foo"), ("sk", "bar")];

        client.update_item(&update(
            &key,
            "SET #k0=:v0, #k1=if_not_exists(#k1, :v1)",
            &[(":v0", "a"), (":v1", "first")],
        ))?;
        let output = client.update_item(&update(
            &key,
            "SET #k0=:v0, #k1=if_not_exists(#k1, :v1)",
            &[(":v0", "b"), (":v1", "second")],
        ))?;

        assert_eq!(output.attributes["k0"], s("b"));
        assert_eq!(output.attributes["k1"], s("first"));
        client.table().assert_row_values(
            &Key::new("foo", Some("bar")),
            &[
                ("k0", "b".into()),
                ("k1", "first".into()),
                ("k2", Expectation::Optional("never".into())),
            ],
        );
        Ok(())
    }

    #[test]
    fn test_should_set_and_remove_in_one_expression() -> anyhow::Result<()> {
        let mut client = mock_client();
        client
            .table_mut()
            .add_row(item(&[("pk", "foo"), ("sk", "bar"), ("k2", "old"), ("k3", "keep")]))?;

        let output = client.update_item(&update(
            &[("pk", "foo"), ("sk", "bar")],
            "SET #k0=:v0 REMOVE #k2",
            &[(":v0", "new")],
        ))?;
        assert_eq!(output.attributes["k0"], s("new"));
        assert!(!output.attributes.contains_key("k2"));
        assert_eq!(output.attributes["k3"], s("keep"));
        Ok(())
    }

    #[test]
    fn test_should_round_trip_get_and_delete() -> anyhow::Result<()> {
        let mut client = mock_client();
        let key = item(&[("pk", "foo"), ("sk", "bar")]);
        client.update_item(&update(&[("pk", "foo"), ("sk", "bar")], "SET #k0=:v0", &[(":v0", "x")]))?;

        let get = GetItemInput {
            table_name: "NA".to_owned(),
            key: key.clone(),
        };
        assert!(client.get_item(&get)?.item.is_some());

        let delete = DeleteItemInput {
            table_name: "NA".to_owned(),
            key,
        };
        assert_eq!(client.delete_item(&delete)?.attributes["k0"], s("x"));
        assert!(client.get_item(&get)?.item.is_none());
        assert!(client.delete_item(&delete)?.attributes.is_empty());
        Ok(())
    }

    #[test]
    fn test_should_reject_update_with_unresolved_placeholder() {
        let mut client = mock_client();
        let mut input = update(&[("pk", "foo"), ("sk", "bar")], "SET #k0=:v0", &[]);
        input.expression_attribute_values.clear();
        let err = client.update_item(&input).expect_err("unresolved");
        assert_eq!(err.code, DynamoDBErrorCode::ValidationException);
        assert!(client.table().is_empty());
    }

    #[test]
    fn test_should_refuse_to_rewrite_key_attributes() -> anyhow::Result<()> {
        let mut client = mock_client();
        client.table_mut().add_row(item(&[("pk", "foo"), ("sk", "bar")]))?;

        let mut input = update(&[("pk", "foo"), ("sk", "bar")], "SET #key=:v0", &[(":v0", "other")]);
        input
            .expression_attribute_names
            .insert("#key".to_owned(), "pk".to_owned());
        let err = client.update_item(&input).expect_err("key attribute");
        assert_eq!(err.code, DynamoDBErrorCode::ValidationException);
        assert!(err.message.contains("part of the key"));

        assert_eq!(client.table().get_rows("foo", None).len(), 1);
        assert!(client.table().get_rows("other", None).is_empty());
        client
            .table()
            .assert_row_values(&Key::new("foo", Some("bar")), &[("pk", "foo".into())]);
        Ok(())
    }

    #[test]
    fn test_should_batch_write_puts_and_deletes() -> anyhow::Result<()> {
        let mut client = mock_client();
        client.table_mut().add_row(item(&[("pk", "old"), ("sk", "1")]))?;

        let input = BatchWriteItemInput {
            request_items: [(
                "NA".to_owned(),
                vec![
                    WriteRequest::put(item(&[("pk", "new"), ("sk", "1")])),
                    WriteRequest::put(item(&[("pk", "new"), ("sk", "2")])),
                    WriteRequest::delete(item(&[("pk", "old"), ("sk", "1")])),
                ],
            )]
            .into(),
        };
        client.batch_write_item(&input)?;
        assert_eq!(client.table().get_rows("new", None).len(), 2);
        assert!(client.table().get_rows("old", None).is_empty());

        let err = client.batch_write_item(&input).expect_err("duplicate put");
        assert_eq!(err.code, DynamoDBErrorCode::ConditionalCheckFailedException);
        Ok(())
    }

    #[test]
    fn test_should_apply_transaction_atomically() -> anyhow::Result<()> {
        let mut client = mock_client();
        client.table_mut().add_row(item(&[("pk", "taken"), ("sk", "1")]))?;

        let put = |pk: &str| TransactWriteItem {
            put: Some(Put {
                table_name: "NA".to_owned(),
                item: item(&[("pk", pk), ("sk", "1")]),
            }),
            ..TransactWriteItem::default()
        };
        let touch = TransactWriteItem {
            update: Some(Update {
                table_name: "NA".to_owned(),
                key: item(&[("pk", "counter"), ("sk", "1")]),
                update_expression: "SET #k0=if_not_exists(#k0, :v0)".to_owned(),
                expression_attribute_names: [("#k0".to_owned(), "k0".to_owned())].into(),
                expression_attribute_values: [(":v0".to_owned(), s("init"))].into(),
            }),
            ..TransactWriteItem::default()
        };

        let failing = TransactWriteItemsInput {
            transact_items: vec![put("fresh"), touch.clone(), put("taken")],
        };
        let err = client.transact_write_items(&failing).expect_err("duplicate");
        assert_eq!(err.code, DynamoDBErrorCode::ConditionalCheckFailedException);
        assert_eq!(client.table().len(), 1);

        let passing = TransactWriteItemsInput {
            transact_items: vec![put("fresh"), touch],
        };
        client.transact_write_items(&passing)?;
        assert_eq!(client.table().len(), 3);
        client
            .table()
            .assert_row_values(&Key::new("counter", Some("1")), &[("k0", "init".into())]);
        Ok(())
    }
}
