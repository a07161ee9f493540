use bson::Bson;
use sieve_query::{
    AggregateFunction, ConditionalFilter, ConditionalOp, Filter, FilterKind, FunctionName, Mode,
    Populate, QueryFilter, QuerySpecification, Sort, Strictness,
};
use tracing::{debug, warn};

use crate::builder::{FieldMatcher, PopulatePath, QueryBuilder, SortOrder};
use crate::condition::{Condition, ConditionPredicate};
use crate::error::{FilterOrigin, TranslateError};
use crate::options::{PagingRule, TranslateOptions};
use crate::pattern::{RegexError, RegexPattern};
use crate::resolver::FieldResolver;

/// Applies a [`QuerySpecification`] to a [`QueryBuilder`].
///
/// Calls are issued in a fixed order: filters, list filters, paging, then
/// either the aggregate function or the selection steps (sort, populate,
/// select, lean). The first error stops translation; calls already issued
/// are not rolled back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    options: TranslateOptions,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub fn build_query<Q: QueryBuilder>(
        &self,
        query: &mut Q,
        spec: &QuerySpecification,
        resolver: Option<&dyn FieldResolver>,
    ) -> Result<(), TranslateError> {
        let strictness = self.options.strictness;

        add_filters(query, spec.filters(), strictness)?;

        if !spec.list_filters().is_empty() {
            add_list_filters(query, spec.list_filters(), resolver, strictness)?;
        }

        if spec.is_paginated() {
            add_paging(query, spec.offset(), spec.limit(), self.options.paging);
        }

        match spec.mode() {
            Mode::Aggregate { function, distinct } => {
                add_function(query, function, distinct, resolver);
            }
            Mode::Selection(selection) => {
                add_sort_order(query, selection.sorts);
                add_populates(query, selection.populates);
                add_selects(query, selection.selects);
                add_lean(query, selection.lean);
            }
        }
        Ok(())
    }
}

/// [`Translator::build_query`] with default options.
pub fn build_query<Q: QueryBuilder>(
    query: &mut Q,
    spec: &QuerySpecification,
    resolver: Option<&dyn FieldResolver>,
) -> Result<(), TranslateError> {
    Translator::default().build_query(query, spec, resolver)
}

// ── Filters ─────────────────────────────────────────────────────

pub fn add_filters<Q: QueryBuilder>(
    query: &mut Q,
    filters: &[Filter],
    strictness: Strictness,
) -> Result<(), TranslateError> {
    debug!(count = filters.len(), "applying filters");
    for filter in filters {
        match filter {
            Filter::Leaf(leaf) => {
                check_field_name(&leaf.field_name, strictness)?;
                apply_leaf(query, &leaf.field_name, leaf, FilterOrigin::Filters)?;
            }
            Filter::Conditional(group) => apply_conditional(query, group, strictness)?,
        }
    }
    Ok(())
}

/// Legacy list filters: field names go through
/// [`FieldResolver::resolve_query_field`] and only EQUALS, LT and GT apply.
pub fn add_list_filters<Q: QueryBuilder>(
    query: &mut Q,
    list_filters: &[QueryFilter],
    resolver: Option<&dyn FieldResolver>,
    strictness: Strictness,
) -> Result<(), TranslateError> {
    let resolver = resolver.ok_or(TranslateError::MissingResolver)?;
    debug!(count = list_filters.len(), "applying list filters");

    for filter in list_filters {
        check_field_name(&filter.field_name, strictness)?;
        match filter.kind {
            FilterKind::Equals | FilterKind::Lt | FilterKind::Gt => {
                let field = resolver.resolve_query_field(&filter.field_name);
                apply_leaf(query, &field, filter, FilterOrigin::ListFilters)?;
            }
            _ => {
                return Err(TranslateError::UnrecognizedFilterKind {
                    kind: filter.kind.to_string(),
                    origin: FilterOrigin::ListFilters,
                });
            }
        }
    }
    Ok(())
}

fn apply_leaf<Q: QueryBuilder>(
    query: &mut Q,
    field: &str,
    filter: &QueryFilter,
    origin: FilterOrigin,
) -> Result<(), TranslateError> {
    let value = filter.value.clone();
    match &filter.kind {
        FilterKind::Equals => query.where_field(field).equals(value),
        FilterKind::Not => match value {
            Bson::Array(values) => query.where_field(field).not_in(values),
            scalar => query.where_field(field).not_equals(scalar),
        },
        FilterKind::In => query.where_field(field).in_values(into_sequence(value)),
        FilterKind::Gt => query.where_field(field).greater_than(value),
        FilterKind::Lt => query.where_field(field).less_than(value),
        FilterKind::Match => query.where_field(field).element_match(value),
        FilterKind::Size => query.where_field(field).size_equals(value),
        FilterKind::Regexp => {
            let pattern = compile_regex(filter)?;
            query.where_field(field).regex_matches(pattern);
        }
        FilterKind::Exists => query.where_field(field).exists(value),
        FilterKind::Unrecognized(kind) => {
            return Err(TranslateError::UnrecognizedFilterKind {
                kind: kind.clone(),
                origin,
            });
        }
    }
    Ok(())
}

fn into_sequence(value: Bson) -> Vec<Bson> {
    match value {
        Bson::Array(values) => values,
        scalar => vec![scalar],
    }
}

fn compile_regex(filter: &QueryFilter) -> Result<RegexPattern, TranslateError> {
    let invalid = |source| TranslateError::InvalidRegex {
        field: filter.field_name.clone(),
        source,
    };
    let source = match &filter.value {
        Bson::String(source) => source.as_str(),
        Bson::Null => "",
        other => return Err(invalid(RegexError::NonStringSource(other.clone()))),
    };
    RegexPattern::new(source, filter.options.as_deref().unwrap_or_default()).map_err(invalid)
}

fn check_field_name(field: &str, strictness: Strictness) -> Result<(), TranslateError> {
    if strictness.is_strict() && field.is_empty() {
        return Err(TranslateError::EmptyFieldName);
    }
    Ok(())
}

// ── Conditional groups ──────────────────────────────────────────

fn apply_conditional<Q: QueryBuilder>(
    query: &mut Q,
    group: &ConditionalFilter,
    strictness: Strictness,
) -> Result<(), TranslateError> {
    let conditions = parse_conditional_filter(&group.conditions, strictness)?;
    debug!(op = %group.op, conditions = conditions.len(), "applying conditional filter");
    match group.op {
        ConditionalOp::Or => query.or(conditions),
        ConditionalOp::And => query.and(conditions),
    }
    Ok(())
}

/// Convert the leaves of an AND/OR group into conditions.
///
/// GT, LT, EXISTS and unrecognized kinds have no condition form. They are
/// skipped in permissive mode and rejected in strict mode.
pub fn parse_conditional_filter(
    filters: &[QueryFilter],
    strictness: Strictness,
) -> Result<Vec<Condition>, TranslateError> {
    let mut conditions = Vec::with_capacity(filters.len());
    for filter in filters {
        check_field_name(&filter.field_name, strictness)?;
        let value = filter.value.clone();
        let predicate = match filter.kind {
            FilterKind::Equals => ConditionPredicate::Equals(value),
            FilterKind::Not => ConditionPredicate::NotEquals(value),
            FilterKind::In => ConditionPredicate::In(value),
            FilterKind::Match => ConditionPredicate::ElementMatch(value),
            FilterKind::Size => ConditionPredicate::SizeEquals(value),
            FilterKind::Regexp => ConditionPredicate::Regex(compile_regex(filter)?),
            _ if strictness.is_strict() => {
                return Err(TranslateError::UnsupportedConditionalLeaf {
                    kind: filter.kind.to_string(),
                    field: filter.field_name.clone(),
                });
            }
            _ => {
                warn!(
                    kind = %filter.kind,
                    field = %filter.field_name,
                    "dropping unsupported conditional leaf"
                );
                continue;
            }
        };
        conditions.push(Condition::new(filter.field_name.clone(), predicate));
    }
    Ok(conditions)
}

// ── Paging and aggregates ───────────────────────────────────────

pub fn add_paging<Q: QueryBuilder>(
    query: &mut Q,
    offset: Option<i64>,
    limit: Option<i64>,
    rule: PagingRule,
) {
    match rule {
        PagingRule::Independent => {
            if let Some(offset) = offset {
                query.skip(offset);
            }
            if let Some(limit) = limit {
                query.limit(limit);
            }
        }
        PagingRule::RequireBoth => match (offset, limit) {
            (Some(offset), Some(limit)) if offset != 0 && limit != 0 => {
                query.skip(offset);
                query.limit(limit);
            }
            _ => {
                debug!(?offset, ?limit, "paging skipped, both offset and limit required");
                return;
            }
        },
    }
    debug!(?offset, ?limit, ?rule, "applied paging");
}

/// COUNT takes no argument. DISTINCT resolves its key through
/// [`FieldResolver::resolve_filter_field`] when a resolver is given.
pub fn add_function<Q: QueryBuilder>(
    query: &mut Q,
    function: &AggregateFunction,
    distinct: &str,
    resolver: Option<&dyn FieldResolver>,
) {
    match function.name {
        FunctionName::Count => query.count(),
        FunctionName::Distinct => {
            let field = match resolver {
                Some(resolver) => resolver.resolve_filter_field(distinct),
                None => distinct.to_string(),
            };
            debug!(key = distinct, field = %field, "applying distinct");
            query.distinct(&field);
        }
    }
}

// ── Selection ───────────────────────────────────────────────────

pub fn add_sort_order<Q: QueryBuilder>(query: &mut Q, sorts: &[Sort]) {
    if sorts.is_empty() {
        return;
    }
    let mut order = SortOrder::with_capacity(sorts.len());
    for sort in sorts {
        order.insert(sort.field_name.clone(), sort.direction());
    }
    query.sort(order);
}

pub fn add_populates<Q: QueryBuilder>(query: &mut Q, populates: &[Populate]) {
    for populate in populates {
        let path = match populate.projection() {
            Some(select) => PopulatePath::Projected {
                path: populate.field_name.clone(),
                select,
            },
            None => PopulatePath::Full(populate.field_name.clone()),
        };
        query.populate(path);
    }
}

pub fn add_selects<Q: QueryBuilder>(query: &mut Q, selects: &str) {
    if !selects.is_empty() {
        query.select(selects);
    }
}

pub fn add_lean<Q: QueryBuilder>(query: &mut Q, lean: bool) {
    if lean {
        query.lean(true);
    }
}
