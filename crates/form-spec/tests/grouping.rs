use serde_json::json;

use form_spec::{Category, ResolvedField, group_by_category};

fn field(name: &str, category: Option<&str>) -> ResolvedField {
    let mut definition = json!({ "type": "text" });
    if let Some(category) = category {
        definition["category"] = json!(category);
    }
    ResolvedField::from_definition(
        name.to_string(),
        serde_json::from_value(definition).expect("definition"),
    )
}

fn categories() -> Vec<Category> {
    vec![
        Category {
            id: "a".into(),
            name: "Alpha".into(),
        },
        Category {
            id: "b".into(),
            name: "Beta".into(),
        },
    ]
}

#[test]
fn groups_are_adjacent_runs() {
    let fields = vec![
        field("f1", Some("a")),
        field("f2", Some("a")),
        field("f3", Some("b")),
        field("f4", Some("b")),
        field("f5", Some("a")),
    ];
    let groups = group_by_category(&fields, &categories());

    let sizes: Vec<usize> = groups.iter().map(|group| group.fields.len()).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    let names: Vec<&str> = groups
        .iter()
        .map(|group| group.category_name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Alpha"]);
    assert_eq!(groups[2].fields[0].name, "f5");
}

#[test]
fn missing_and_unknown_categories_are_other() {
    let fields = vec![
        field("f1", None),
        field("f2", None),
        field("f3", Some("zzz")),
        field("f4", Some("b")),
    ];
    let groups = group_by_category(&fields, &categories());

    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].category, "");
    assert_eq!(groups[0].category_name, "Other");
    assert_eq!(groups[0].fields.len(), 2);
    assert_eq!(groups[1].category, "zzz");
    assert_eq!(groups[1].category_name, "Other");
    assert_eq!(groups[2].category_name, "Beta");
}

#[test]
fn empty_category_list_names_everything_other() {
    let fields = vec![field("f1", Some("a")), field("f2", Some("b"))];
    let groups = group_by_category(&fields, &[]);
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|group| group.category_name == "Other"));
}

#[test]
fn empty_input_yields_no_groups() {
    assert!(group_by_category(&[], &categories()).is_empty());
}
