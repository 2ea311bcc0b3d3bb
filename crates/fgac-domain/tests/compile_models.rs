//! End-to-end compilation tests.
//!
//! Compiles complete models and checks the serialized document against the
//! OpenFGA JSON layout consumers depend on.

use pretty_assertions::assert_eq;
use serde_json::json;

use fgac_domain::model::{parse, RelationReference, Userset};

const GITHUB_MODEL: &str = r#"
model
  schema 1.1

type organization
  relations
    define member: [user] or owner
    define owner: [user]
    define repo_admin: [user, organization#member]
    define repo_reader: [user, organization#member]
    define repo_writer: [user, organization#member]

type repo
  relations
    define admin: [user, team#member] or repo_admin from owner
    define maintainer: [user, team#member] or admin
    define owner: [organization]
    define reader: [user, team#member] or triager or repo_reader from owner
    define triager: [user] but not repo_reader from owner
    define writer: [user, user:*, team#member] or maintainer or repo_writer from owner

type team
  relations
    define member: [user, team#member]

type user
"#;

const DRIVE_MODEL: &str = r#"
model
  schema 1.1

type doc
  relations
    define can_change_owner: owner
    define can_read: viewer or owner or viewer from parent
    define can_share: owner or owner from parent
    define can_write: owner or owner from parent
    define owner: [user]
    define parent: [folder]
    define viewer: [user, user:*, group#member]

type folder
  relations
    define can_create_file: owner
    define owner: [user]
    define parent: [folder]
    define viewer: [user, user:*, group#member] or owner or viewer from parent

type group
  relations
    define member: [user]

type user
"#;

#[test]
fn test_github_model_type_order_and_metadata() {
    let model = parse(GITHUB_MODEL).unwrap();
    assert_eq!(model.schema_version.as_deref(), Some("1.1"));

    let names: Vec<_> = model
        .type_definitions
        .iter()
        .map(|td| td.type_name.as_str())
        .collect();
    assert_eq!(names, ["organization", "repo", "team", "user"]);

    let user = model.type_definition("user").unwrap();
    assert!(user.relations.is_empty());
    assert!(user.metadata.is_none());

    for td in model.type_definitions.iter().filter(|td| !td.relations.is_empty()) {
        let metadata = td.metadata.as_ref().unwrap();
        let relation_keys: Vec<_> = td.relations.keys().collect();
        let metadata_keys: Vec<_> = metadata.relations.keys().collect();
        assert_eq!(relation_keys, metadata_keys, "type {}", td.type_name);
    }
}

#[test]
fn test_github_model_rewrites() {
    let model = parse(GITHUB_MODEL).unwrap();
    let organization = model.type_definition("organization").unwrap();
    let repo = model.type_definition("repo").unwrap();

    assert_eq!(
        organization.relation("member"),
        Some(&Userset::Union {
            children: vec![Userset::This, Userset::computed("owner")]
        })
    );
    assert_eq!(organization.relation("owner"), Some(&Userset::This));

    assert_eq!(
        repo.relation("writer"),
        Some(&Userset::Union {
            children: vec![
                Userset::This,
                Userset::computed("maintainer"),
                Userset::tuple_to_userset("owner", "repo_writer"),
            ]
        })
    );
    assert_eq!(
        repo.relation("triager"),
        Some(&Userset::difference(
            Userset::This,
            Userset::tuple_to_userset("owner", "repo_reader")
        ))
    );
}

#[test]
fn test_github_model_restrictions() {
    let model = parse(GITHUB_MODEL).unwrap();
    let organization = model.type_definition("organization").unwrap();
    let repo = model.type_definition("repo").unwrap();

    assert_eq!(
        organization.directly_related_user_types("member").unwrap(),
        [RelationReference::direct("user")]
    );
    assert_eq!(
        organization.directly_related_user_types("repo_admin").unwrap(),
        [
            RelationReference::direct("user"),
            RelationReference::userset("organization", "member"),
        ]
    );
    assert_eq!(
        repo.directly_related_user_types("writer").unwrap(),
        [
            RelationReference::direct("user"),
            RelationReference::wildcard("user"),
            RelationReference::userset("team", "member"),
        ]
    );
}

#[test]
fn test_github_model_serializes_to_openfga_json() {
    let model = parse(GITHUB_MODEL).unwrap();
    let value = serde_json::to_value(&model).unwrap();

    assert_eq!(value["schema_version"], "1.1");
    assert_eq!(value["type_definitions"][3], json!({
        "type": "user",
        "relations": {},
        "metadata": null
    }));
    assert_eq!(value["type_definitions"][2], json!({
        "type": "team",
        "relations": {
            "member": {"this": {}}
        },
        "metadata": {
            "relations": {
                "member": {
                    "directly_related_user_types": [
                        {"type": "user"},
                        {"type": "team", "relation": "member"}
                    ]
                }
            }
        }
    }));
    assert_eq!(value["type_definitions"][1]["relations"]["writer"], json!({
        "union": {
            "child": [
                {"this": {}},
                {"computedUserset": {"object": "", "relation": "maintainer"}},
                {"tupleToUserset": {
                    "tupleset": {"object": "", "relation": "owner"},
                    "computedUserset": {"object": "", "relation": "repo_writer"}
                }}
            ]
        }
    }));
    assert_eq!(value["type_definitions"][1]["relations"]["triager"], json!({
        "difference": {
            "base": {"this": {}},
            "subtract": {"tupleToUserset": {
                "tupleset": {"object": "", "relation": "owner"},
                "computedUserset": {"object": "", "relation": "repo_reader"}
            }}
        }
    }));
    assert_eq!(
        value["type_definitions"][1]["metadata"]["relations"]["writer"],
        json!({
            "directly_related_user_types": [
                {"type": "user"},
                {"type": "user", "wildcard": {}},
                {"type": "team", "relation": "member"}
            ]
        })
    );
}

#[test]
fn test_drive_model_serializes_to_openfga_json() {
    let model = parse(DRIVE_MODEL).unwrap();
    let value = serde_json::to_value(&model).unwrap();

    assert_eq!(value["type_definitions"][2], json!({
        "type": "group",
        "relations": {"member": {"this": {}}},
        "metadata": {"relations": {"member": {
            "directly_related_user_types": [{"type": "user"}]
        }}}
    }));

    let doc = &value["type_definitions"][0];
    assert_eq!(doc["relations"]["can_change_owner"], json!({
        "computedUserset": {"object": "", "relation": "owner"}
    }));
    assert_eq!(doc["relations"]["can_read"], json!({
        "union": {"child": [
            {"computedUserset": {"object": "", "relation": "viewer"}},
            {"computedUserset": {"object": "", "relation": "owner"}},
            {"tupleToUserset": {
                "tupleset": {"object": "", "relation": "parent"},
                "computedUserset": {"object": "", "relation": "viewer"}
            }}
        ]}
    }));
    assert_eq!(
        doc["metadata"]["relations"]["can_read"],
        json!({"directly_related_user_types": []})
    );
}

#[test]
fn test_serialized_relation_order_follows_declaration() {
    let model = parse(DRIVE_MODEL).unwrap();
    let json = serde_json::to_string(&model).unwrap();

    let positions: Vec<_> = ["can_change_owner", "can_read", "can_share", "can_write"]
        .iter()
        .map(|name| json.find(&format!("\"{name}\"")).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_compiling_twice_is_identical() {
    let first = serde_json::to_string_pretty(&parse(GITHUB_MODEL).unwrap()).unwrap();
    let second = serde_json::to_string_pretty(&parse(GITHUB_MODEL).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_schema_only_model_is_empty() {
    let model = parse("model\n  schema 1.1\n").unwrap();
    assert_eq!(
        serde_json::to_value(&model).unwrap(),
        json!({"schema_version": "1.1", "type_definitions": []})
    );

    let model = parse("").unwrap();
    assert_eq!(
        serde_json::to_value(&model).unwrap(),
        json!({"schema_version": null, "type_definitions": []})
    );
}
