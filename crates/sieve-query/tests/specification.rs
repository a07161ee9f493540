use bson::{Bson, doc};
use serde_json::json;
use sieve_query::*;

fn request(value: serde_json::Value) -> QueryRequest {
    QueryRequest::from_json_value(value).unwrap()
}

// ── Request initialization ──────────────────────────────────────

#[test]
fn string_pagination_is_coerced() {
    let spec = QuerySpecification::from_request(request(json!({ "offset": "5", "limit": "10" })));
    assert!(spec.is_paginated());
    assert_eq!(spec.offset(), Some(5));
    assert_eq!(spec.limit(), Some(10));
}

#[test]
fn request_spec_is_sortable() {
    let spec = QuerySpecification::from_request(QueryRequest::default());
    assert!(spec.is_sortable());
    assert!(!spec.is_paginated());
    assert!(spec.filters().is_empty());
    assert!(!spec.has_function());
}

#[test]
fn distinct_clears_request_pagination() {
    let spec = QuerySpecification::from_request(request(json!({
        "distinct": "email",
        "offset": 5,
        "limit": 10
    })));
    assert!(spec.has_function());
    assert_eq!(spec.function_name(), Some(FunctionName::Distinct));
    assert_eq!(spec.distinct(), "email");
    assert!(!spec.is_paginated());
    assert_eq!(spec.offset(), None);
    assert_eq!(spec.limit(), None);
}

#[test]
fn empty_distinct_is_ignored() {
    let spec = QuerySpecification::from_request(request(json!({ "distinct": "", "limit": 3 })));
    assert!(!spec.has_function());
    assert!(spec.is_paginated());
}

#[test]
fn zero_offset_is_stored_but_not_paginated() {
    let spec = QuerySpecification::from_request(request(json!({ "offset": 0 })));
    assert!(!spec.is_paginated());
    assert_eq!(spec.offset(), Some(0));
}

#[test]
fn string_zero_is_truthy() {
    let spec = QuerySpecification::from_request(request(json!({ "offset": "0" })));
    assert!(spec.is_paginated());
    assert_eq!(spec.offset(), Some(0));
}

#[test]
fn null_offset_is_ignored() {
    let spec = QuerySpecification::from_request(request(json!({ "offset": null, "limit": 4 })));
    assert!(spec.is_paginated());
    assert_eq!(spec.offset(), None);
    assert_eq!(spec.limit(), Some(4));
}

#[test]
fn non_numeric_limit_is_dropped() {
    let spec = QuerySpecification::from_request(request(json!({ "limit": "all" })));
    assert!(spec.is_paginated());
    assert_eq!(spec.limit(), None);
}

#[test]
fn strict_request_rejects_non_numeric_limit() {
    let err = QuerySpecification::from_request_with(
        request(json!({ "limit": "all" })),
        Strictness::Strict,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SpecError::InvalidPaginationValue { field: "limit", .. }
    ));
}

#[test]
fn strict_request_accepts_numeric_strings() {
    let spec = QuerySpecification::from_request_with(
        request(json!({ "offset": "20", "limit": 5 })),
        Strictness::Strict,
    )
    .unwrap();
    assert_eq!(spec.offset(), Some(20));
    assert_eq!(spec.limit(), Some(5));
}

#[test]
fn request_function_is_copied() {
    let spec = QuerySpecification::from_request(request(json!({
        "fn": { "name": "COUNT" },
        "offset": 2
    })));
    assert_eq!(spec.function_name(), Some(FunctionName::Count));
    // A function from the request alone does not clear pagination.
    assert!(spec.is_paginated());
    assert_eq!(spec.offset(), Some(2));
}

#[test]
fn request_collections_are_copied_in_order() {
    let spec = QuerySpecification::from_request(request(json!({
        "filters": [
            { "filterType": "GT", "fieldName": "age", "value": 30 },
            { "filterType": "OR", "conditions": [
                { "filterType": "EQUALS", "fieldName": "a", "value": "x" }
            ]}
        ],
        "sorts": [{ "fieldName": "age", "asc": false }],
        "populates": [{ "fieldName": "owner" }],
        "listFilters": [{ "filterType": "EQUALS", "fieldName": "Status", "value": "open" }]
    })));

    assert_eq!(spec.filters().len(), 2);
    assert!(!spec.filters()[0].is_conditional());
    assert!(spec.filters()[1].is_conditional());
    assert_eq!(spec.sorts(), &[Sort::new("age", false)]);
    assert_eq!(spec.populates(), &[Populate::new("owner", None)]);
    assert_eq!(spec.list_filters()[0].field_name, "Status");
}

#[test]
fn request_filter_with_non_array_conditions_is_a_leaf() {
    let record = json!({
        "filterType": "EQUALS",
        "fieldName": "status",
        "value": "open",
        "conditions": {}
    });
    assert!(!is_conditional_query_filter(&record));

    let spec = QuerySpecification::from_request(request(json!({ "filters": [record] })));
    assert_eq!(spec.filters().len(), 1);
    assert!(!spec.filters()[0].is_conditional());
}

#[test]
fn request_selected_is_not_applied() {
    let spec = QuerySpecification::from_request(request(json!({ "selected": "name" })));
    assert_eq!(spec.selects(), "");
}

// ── Builder methods ─────────────────────────────────────────────

#[test]
fn selects_accumulate_with_leading_space() {
    let mut spec = QuerySpecification::new();
    spec.add_selects("a").add_selects("b");
    assert_eq!(spec.selects(), " a b");

    spec.add_selects("a");
    assert_eq!(spec.selects(), " a b a");
}

#[test]
fn count_clears_pagination() {
    let mut spec = QuerySpecification::new();
    spec.set_paginated(true).set_offset(10).set_limit(20);
    spec.set_as_count_function();

    assert!(spec.has_function());
    assert_eq!(spec.function_name(), Some(FunctionName::Count));
    assert!(!spec.is_paginated());
    assert_eq!(spec.offset(), None);
    assert_eq!(spec.limit(), None);
}

#[test]
fn distinct_clears_pagination() {
    let mut spec = QuerySpecification::new();
    spec.set_offset(10).set_limit(20).set_paginated(true);
    spec.set_distinct("status");

    assert_eq!(spec.function_name(), Some(FunctionName::Distinct));
    assert_eq!(spec.distinct(), "status");
    assert!(!spec.is_paginated());
    assert_eq!(spec.offset(), None);
    assert_eq!(spec.limit(), None);
}

#[test]
fn switching_functions_keeps_pagination_cleared() {
    let mut spec = QuerySpecification::new();
    spec.set_distinct("status");
    spec.set_offset(3).set_paginated(true);
    spec.set_as_count_function();
    assert!(!spec.is_paginated());
    assert_eq!(spec.offset(), None);
}

#[test]
fn filters_append_in_order() {
    let mut spec = QuerySpecification::new();
    spec.add_equals_filter("status", "active")
        .add_in_filter("tag", "x")
        .add_not_filter("tag", vec!["a", "b"])
        .add_gt_filter("age", 18)
        .add_lt_filter("age", 65)
        .add_match_filter("items", doc! { "sku": "A1" })
        .add_size_filter("items", 2)
        .add_regexp_filter("name", "^jo", Some("i"))
        .add_exists_filter("email", true)
        .add_or_filter(vec![QueryFilter::equals("a", 1)])
        .add_and_filter(vec![]);

    let kinds: Vec<String> = spec
        .filters()
        .iter()
        .map(|filter| match filter {
            Filter::Leaf(leaf) => leaf.kind.to_string(),
            Filter::Conditional(group) => group.op.to_string(),
        })
        .collect();
    assert_eq!(
        kinds,
        [
            "EQUALS", "IN", "NOT", "GT", "LT", "MATCH", "SIZE", "REGEXP", "EXISTS", "OR", "AND"
        ]
    );
}

#[test]
fn populates_and_sorts_append_in_order() {
    let mut spec = QuerySpecification::new();
    spec.add_populates("owner", None)
        .add_populates("team", Some(vec!["name".into()]))
        .add_sort("name", true)
        .add_sort("age", false);

    assert_eq!(spec.populates()[1].projection().as_deref(), Some("name"));
    assert_eq!(spec.sorts()[0].direction(), SortDirection::Asc);
    assert_eq!(spec.sorts()[1].direction(), SortDirection::Desc);
}

// ── Modes ───────────────────────────────────────────────────────

#[test]
fn function_mode_hides_selection() {
    let mut spec = QuerySpecification::new();
    spec.set_sortable(true)
        .add_sort("name", true)
        .add_populates("owner", None)
        .add_selects("name")
        .set_lean(true)
        .set_as_count_function();

    assert!(matches!(spec.mode(), Mode::Aggregate { .. }));
    // Stored values survive.
    assert_eq!(spec.sorts().len(), 1);
    assert_eq!(spec.selects(), " name");
    assert!(spec.lean());
}

#[test]
fn distinct_mode_carries_key() {
    let mut spec = QuerySpecification::new();
    spec.set_distinct("email");
    match spec.mode() {
        Mode::Aggregate { function, distinct } => {
            assert_eq!(function.name, FunctionName::Distinct);
            assert_eq!(distinct, "email");
        }
        Mode::Selection(_) => panic!("expected aggregate mode"),
    }
}

// ── Export / re-derive ──────────────────────────────────────────

#[test]
fn export_excludes_selection_state() {
    let mut spec = QuerySpecification::new();
    spec.add_equals_filter("a", 1)
        .add_selects("name")
        .set_lean(true)
        .set_offset(5)
        .set_paginated(true);

    let exported = spec.to_request();
    assert_eq!(exported.offset, Some(Bson::Int64(5)));
    assert_eq!(exported.limit, None);
    assert_eq!(exported.selected, None);
    assert_eq!(exported.distinct.as_deref(), Some(""));

    let value = serde_json::to_value(&exported).unwrap();
    assert!(value.get("selected").is_none());
    assert!(value.get("lean").is_none());
    assert!(value.get("paginated").is_none());
    assert!(value.get("sortable").is_none());
}

#[test]
fn init_from_carries_lean() {
    let mut source = QuerySpecification::new();
    source
        .add_equals_filter("a", 1)
        .add_selects("name")
        .set_lean(true)
        .set_sortable(true)
        .set_limit(25)
        .set_paginated(false);

    let mut copy = QuerySpecification::new();
    copy.init_from(&source);

    assert_eq!(copy.filters(), source.filters());
    assert!(copy.lean());
    assert_eq!(copy.selects(), "");
    assert!(!copy.is_sortable());
    // Re-derived from the exported limit rather than copied.
    assert!(copy.is_paginated());
    assert_eq!(copy.limit(), Some(25));
}

#[test]
fn reinit_without_lean_carry() {
    let mut source = QuerySpecification::new();
    source.add_equals_filter("a", 1).set_lean(true).add_selects("name");

    let mut copy = QuerySpecification::new();
    copy.init_from_request(source.to_request());

    assert_eq!(copy.filters(), source.filters());
    assert!(!copy.lean());
    assert_eq!(copy.selects(), "");
    assert!(!copy.is_paginated());
}

#[test]
fn init_from_keeps_distinct_mode() {
    let mut source = QuerySpecification::new();
    source.set_distinct("email");

    let copy = QuerySpecification::from_request(source.to_request());
    assert_eq!(copy.function_name(), Some(FunctionName::Distinct));
    assert_eq!(copy.distinct(), "email");
}

#[test]
fn export_round_trips_through_json() {
    let mut spec = QuerySpecification::new();
    spec.add_regexp_filter("name", "^jo", Some("i"))
        .add_or_filter(vec![QueryFilter::equals("b", "x")])
        .add_sort("name", true)
        .set_offset(4);

    let json = serde_json::to_string(&spec.to_request()).unwrap();
    let parsed = QueryRequest::from_json(&json).unwrap();
    let copy = QuerySpecification::from_request(parsed);

    assert_eq!(copy.filters(), spec.filters());
    assert_eq!(copy.sorts(), spec.sorts());
    assert_eq!(copy.offset(), Some(4));
}
