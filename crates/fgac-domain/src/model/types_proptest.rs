//! Property-based tests for the DSL compiler.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::model::{parse, RelationReference, Userset};

    /// Strategy to generate identifiers that are not reserved keywords
    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z_]{0,9}".prop_filter("reserved keyword", |s| {
            !matches!(
                s.as_str(),
                "type" | "relations" | "define" | "or" | "and" | "but" | "not" | "from" | "this"
            )
        })
    }

    /// Strategy to generate one subject list entry and its expected reference
    fn restriction_strategy() -> impl Strategy<Value = (String, RelationReference)> {
        prop_oneof![
            name_strategy().prop_map(|t| (t.clone(), RelationReference::direct(t))),
            name_strategy().prop_map(|t| (format!("{t}:*"), RelationReference::wildcard(t))),
            (name_strategy(), name_strategy()).prop_map(|(t, r)| (
                format!("{t}#{r}"),
                RelationReference::userset(t, r)
            )),
        ]
    }

    /// Strategy to generate a single-operand expression
    fn operand_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::collection::vec(restriction_strategy(), 1..4).prop_map(|entries| {
                let names: Vec<_> = entries.into_iter().map(|(text, _)| text).collect();
                format!("[{}]", names.join(", "))
            }),
            name_strategy(),
            (name_strategy(), name_strategy()).prop_map(|(a, b)| format!("{a} from {b}")),
        ]
    }

    /// Strategy to generate a whole model: per type, a list of relation expressions
    fn model_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(
            prop::collection::vec(
                prop::collection::vec(operand_strategy(), 1..4)
                    .prop_map(|operands| operands.join(" or ")),
                0..5,
            ),
            0..6,
        )
    }

    fn render(types: &[Vec<String>]) -> String {
        let mut dsl = String::from("model\n  schema 1.1\n");
        for (i, relations) in types.iter().enumerate() {
            dsl.push_str(&format!("\ntype t{i}\n"));
            if !relations.is_empty() {
                dsl.push_str("  relations\n");
            }
            for (j, expression) in relations.iter().enumerate() {
                dsl.push_str(&format!("    define r{j}: {expression}\n"));
            }
        }
        dsl
    }

    proptest! {
        #[test]
        fn test_metadata_keys_match_relation_keys(types in model_strategy()) {
            let model = parse(&render(&types)).unwrap();
            prop_assert_eq!(model.type_definitions.len(), types.len());

            for (td, relations) in model.type_definitions.iter().zip(&types) {
                prop_assert_eq!(td.relations.len(), relations.len());
                match &td.metadata {
                    None => prop_assert!(relations.is_empty()),
                    Some(metadata) => {
                        prop_assert!(!relations.is_empty());
                        let relation_keys: Vec<_> = td.relations.keys().collect();
                        let metadata_keys: Vec<_> = metadata.relations.keys().collect();
                        prop_assert_eq!(relation_keys, metadata_keys);
                    }
                }
            }
        }

        #[test]
        fn test_compilation_is_deterministic(types in model_strategy()) {
            let dsl = render(&types);
            let first = parse(&dsl).unwrap();
            let second = parse(&dsl).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }

        #[test]
        fn test_restriction_order_is_preserved(
            entries in prop::collection::vec(restriction_strategy(), 1..8)
        ) {
            let list: Vec<_> = entries.iter().map(|(text, _)| text.as_str()).collect();
            let dsl = format!("type doc\n  relations\n    define viewer: [{}]\n", list.join(", "));
            let model = parse(&dsl).unwrap();

            let expected: Vec<_> = entries.into_iter().map(|(_, reference)| reference).collect();
            let actual = model.type_definitions[0].directly_related_user_types("viewer").unwrap();
            prop_assert_eq!(actual, expected.as_slice());
        }

        #[test]
        fn test_union_children_follow_textual_order(
            names in prop::collection::vec(name_strategy(), 2..6)
        ) {
            let dsl = format!("type doc\n  relations\n    define viewer: {}\n", names.join(" or "));
            let model = parse(&dsl).unwrap();

            let expected = Userset::Union {
                children: names.iter().map(Userset::computed).collect(),
            };
            prop_assert_eq!(model.type_definitions[0].relation("viewer"), Some(&expected));
        }
    }
}
