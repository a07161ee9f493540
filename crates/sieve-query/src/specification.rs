use bson::Bson;
use tracing::{debug, warn};

use crate::error::{SpecError, Strictness};
use crate::filter::{ConditionalFilter, Filter, QueryFilter};
use crate::function::{AggregateFunction, FunctionName};
use crate::populate::Populate;
use crate::request::QueryRequest;
use crate::sort::Sort;
use crate::value::{Coerced, coerce_int, is_present_and_truthy};

/// Backend-agnostic description of a query.
///
/// Built either programmatically (starting from [`QuerySpecification::new`])
/// or from a [`QueryRequest`]. Setting an aggregate function always clears
/// pagination; while a function is set, sorts/populates/selects/lean are kept
/// but not applied (see [`QuerySpecification::mode`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpecification {
    filters: Vec<Filter>,
    list_filters: Vec<QueryFilter>,
    sorts: Vec<Sort>,
    populates: Vec<Populate>,
    selected: String,
    paginated: bool,
    offset: Option<i64>,
    limit: Option<i64>,
    sortable: bool,
    lean: bool,
    distinct: String,
    function: Option<AggregateFunction>,
}

/// What a translation pass applies after filters and paging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode<'a> {
    Selection(Selection<'a>),
    Aggregate {
        function: &'a AggregateFunction,
        distinct: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    /// Empty when the specification is not sortable.
    pub sorts: &'a [Sort],
    pub populates: &'a [Populate],
    pub selects: &'a str,
    pub lean: bool,
}

impl QuerySpecification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from request-shaped input. The result is sortable.
    ///
    /// A `distinct` key switches to DISTINCT mode after pagination has been
    /// derived, so it clears any offset/limit from the same request.
    pub fn from_request(request: QueryRequest) -> Self {
        let mut spec = Self {
            sortable: true,
            ..Self::default()
        };
        spec.init_from_request(request);
        spec
    }

    /// Like [`QuerySpecification::from_request`], but in strict mode an
    /// offset/limit that cannot be read as an integer is an error instead of
    /// being ignored.
    pub fn from_request_with(
        request: QueryRequest,
        strictness: Strictness,
    ) -> Result<Self, SpecError> {
        if strictness.is_strict() {
            if let Some(offset) = &request.offset {
                check_pagination_value("offset", offset)?;
            }
            if let Some(limit) = &request.limit {
                check_pagination_value("limit", limit)?;
            }
        }
        Ok(Self::from_request(request))
    }

    /// Re-initialize from request-shaped input. `sortable`, `lean` and the
    /// selected fields are left as they are.
    pub fn init_from_request(&mut self, request: QueryRequest) -> &mut Self {
        self.filters = request.filters.unwrap_or_default();
        self.sorts = request.sorts.unwrap_or_default();
        self.populates = request.populates.unwrap_or_default();
        self.list_filters = request.list_filters.unwrap_or_default();
        self.function = request.function;

        self.init_pagination(request.offset.as_ref(), request.limit.as_ref());

        if let Some(distinct) = request.distinct.filter(|key| !key.is_empty()) {
            self.set_distinct(distinct);
        }

        debug!(
            filters = self.filters.len(),
            list_filters = self.list_filters.len(),
            sorts = self.sorts.len(),
            populates = self.populates.len(),
            paginated = self.paginated,
            function = ?self.function.map(|f| f.name),
            "initialized query specification"
        );
        self
    }

    /// Re-derive from another specification through its exported state,
    /// carrying the source's lean flag over explicitly.
    pub fn init_from(&mut self, source: &QuerySpecification) -> &mut Self {
        self.init_from_request(source.to_request());
        self.set_lean(source.lean);
        self
    }

    // A zero offset/limit does not make the request paginated, but is still
    // stored.
    fn init_pagination(&mut self, offset: Option<&Bson>, limit: Option<&Bson>) {
        self.set_paginated(is_present_and_truthy(offset) || is_present_and_truthy(limit));
        if let Some(offset) = offset {
            self.set_offset(offset.clone());
        }
        if let Some(limit) = limit {
            self.set_limit(limit.clone());
        }
    }

    /// Export the request-shaped state. Selected fields, lean, paginated and
    /// sortable are not part of it.
    pub fn to_request(&self) -> QueryRequest {
        QueryRequest {
            offset: self.offset.map(Bson::Int64),
            limit: self.limit.map(Bson::Int64),
            filters: Some(self.filters.clone()),
            sorts: Some(self.sorts.clone()),
            populates: Some(self.populates.clone()),
            list_filters: Some(self.list_filters.clone()),
            function: self.function,
            distinct: Some(self.distinct.clone()),
            selected: None,
        }
    }

    // ── Modes ───────────────────────────────────────────────────

    pub fn has_function(&self) -> bool {
        self.function.is_some()
    }

    pub fn mode(&self) -> Mode<'_> {
        match &self.function {
            Some(function) => Mode::Aggregate {
                function,
                distinct: &self.distinct,
            },
            None => Mode::Selection(Selection {
                sorts: if self.sortable {
                    self.sorts.as_slice()
                } else {
                    &[]
                },
                populates: &self.populates,
                selects: &self.selected,
                lean: self.lean,
            }),
        }
    }

    pub fn set_as_count_function(&mut self) -> &mut Self {
        self.function = Some(AggregateFunction::COUNT);
        self.clear_pagination()
    }

    /// Switch to DISTINCT over `key`. Clears pagination.
    pub fn set_distinct(&mut self, key: impl Into<String>) -> &mut Self {
        self.distinct = key.into();
        self.function = Some(AggregateFunction::DISTINCT);
        self.clear_pagination()
    }

    // ── Pagination ──────────────────────────────────────────────

    pub fn set_paginated(&mut self, paginated: bool) -> &mut Self {
        self.paginated = paginated;
        self
    }

    pub fn is_paginated(&self) -> bool {
        self.paginated
    }

    pub fn clear_pagination(&mut self) -> &mut Self {
        self.paginated = false;
        self.offset = None;
        self.limit = None;
        self
    }

    /// Set the offset from an integer or a decimal-digit string. Input of any
    /// other type is ignored.
    pub fn set_offset(&mut self, offset: impl Into<Bson>) -> &mut Self {
        store_coerced(&mut self.offset, "offset", &offset.into());
        self
    }

    pub fn set_limit(&mut self, limit: impl Into<Bson>) -> &mut Self {
        store_coerced(&mut self.limit, "limit", &limit.into());
        self
    }

    pub fn try_set_offset(&mut self, offset: impl Into<Bson>) -> Result<&mut Self, SpecError> {
        let offset = offset.into();
        self.offset = Some(check_pagination_value("offset", &offset)?);
        Ok(self)
    }

    pub fn try_set_limit(&mut self, limit: impl Into<Bson>) -> Result<&mut Self, SpecError> {
        let limit = limit.into();
        self.limit = Some(check_pagination_value("limit", &limit)?);
        Ok(self)
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    // ── Selection ───────────────────────────────────────────────

    pub fn set_sortable(&mut self, sortable: bool) -> &mut Self {
        self.sortable = sortable;
        self
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn set_lean(&mut self, lean: bool) -> &mut Self {
        self.lean = lean;
        self
    }

    pub fn lean(&self) -> bool {
        self.lean
    }

    pub fn add_populates(
        &mut self,
        field_name: impl Into<String>,
        children_field_names: Option<Vec<String>>,
    ) -> &mut Self {
        self.populates
            .push(Populate::new(field_name, children_field_names));
        self
    }

    pub fn add_sort(&mut self, field_name: impl Into<String>, asc: bool) -> &mut Self {
        self.sorts.push(Sort::new(field_name, asc));
        self
    }

    /// Append `fields` to the selection with a leading space. Repeated calls
    /// accumulate, duplicates included: `"a"` then `"b"` gives `" a b"`.
    pub fn add_selects(&mut self, fields: &str) -> &mut Self {
        self.selected.push(' ');
        self.selected.push_str(fields);
        self
    }

    // ── Filters ─────────────────────────────────────────────────

    pub fn add_filter(&mut self, filter: impl Into<Filter>) -> &mut Self {
        self.filters.push(filter.into());
        self
    }

    pub fn add_equals_filter(
        &mut self,
        field_name: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::equals(field_name, value))
    }

    pub fn add_in_filter(
        &mut self,
        field_name: impl Into<String>,
        values: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::in_values(field_name, values))
    }

    pub fn add_not_filter(
        &mut self,
        field_name: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::not(field_name, value))
    }

    pub fn add_gt_filter(
        &mut self,
        field_name: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::gt(field_name, value))
    }

    pub fn add_lt_filter(
        &mut self,
        field_name: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::lt(field_name, value))
    }

    pub fn add_match_filter(
        &mut self,
        field_name: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::element_match(field_name, value))
    }

    pub fn add_regexp_filter(
        &mut self,
        field_name: impl Into<String>,
        pattern: impl Into<String>,
        options: Option<&str>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::regexp(field_name, pattern, options))
    }

    pub fn add_size_filter(
        &mut self,
        field_name: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::size(field_name, value))
    }

    pub fn add_exists_filter(
        &mut self,
        field_name: impl Into<String>,
        value: impl Into<Bson>,
    ) -> &mut Self {
        self.add_filter(QueryFilter::exists(field_name, value))
    }

    pub fn add_or_filter(&mut self, conditions: Vec<QueryFilter>) -> &mut Self {
        self.add_filter(ConditionalFilter::or(conditions))
    }

    pub fn add_and_filter(&mut self, conditions: Vec<QueryFilter>) -> &mut Self {
        self.add_filter(ConditionalFilter::and(conditions))
    }

    /// Append a legacy list filter; its field name goes through a resolver
    /// at translation time.
    pub fn add_list_filter(&mut self, filter: QueryFilter) -> &mut Self {
        self.list_filters.push(filter);
        self
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn list_filters(&self) -> &[QueryFilter] {
        &self.list_filters
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn populates(&self) -> &[Populate] {
        &self.populates
    }

    pub fn selects(&self) -> &str {
        &self.selected
    }

    pub fn function(&self) -> Option<&AggregateFunction> {
        self.function.as_ref()
    }

    pub fn function_name(&self) -> Option<FunctionName> {
        self.function.map(|f| f.name)
    }

    pub fn distinct(&self) -> &str {
        &self.distinct
    }
}

fn store_coerced(slot: &mut Option<i64>, field: &'static str, value: &Bson) {
    match coerce_int(value) {
        Coerced::Int(n) => *slot = Some(n),
        Coerced::Unusable => {
            warn!(field, %value, "pagination value is not a number; clearing it");
            *slot = None;
        }
        Coerced::Ignored => {
            warn!(field, %value, "ignoring pagination value of unsupported type");
        }
    }
}

fn check_pagination_value(field: &'static str, value: &Bson) -> Result<i64, SpecError> {
    match coerce_int(value) {
        Coerced::Int(n) => Ok(n),
        Coerced::Unusable | Coerced::Ignored => Err(SpecError::InvalidPaginationValue {
            field,
            value: value.clone(),
        }),
    }
}
