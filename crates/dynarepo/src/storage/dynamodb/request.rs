//! Scan and query request builders.
//!
//! Requests are created un-executed by [`DynamoClient`]. Refine them with the
//! builder methods, then run them with `exec` (every page) or `exec_page`
//! (one page, resumable through `Page::last_evaluated_key`).

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::operation::scan::builders::ScanFluentBuilder;
use aws_sdk_dynamodb::types::AttributeValue;

use dynarepo_core::entity::{Entity, IndexRef};
use dynarepo_core::expression::{validate_filter, Condition, ExpressionContext};
use dynarepo_core::storage::{RepositoryError, Result};

use super::client::DynamoClient;
use super::conversions::{items_to_entities, json_to_attribute, Item};
use super::error::{map_query_error, map_scan_error};

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    /// Start key for the next page; `None` once the table or index is exhausted.
    pub last_evaluated_key: Option<Item>,
}

impl<E> Page<E> {
    pub fn has_more(&self) -> bool {
        self.last_evaluated_key.is_some()
    }
}

/// Rendered expressions of one request, sharing a single placeholder space.
#[derive(Debug, Default)]
struct Expressions {
    key_condition: Option<String>,
    filter: Option<String>,
    projection: Option<String>,
    names: Option<HashMap<String, String>>,
    values: Option<HashMap<String, AttributeValue>>,
}

impl Expressions {
    fn build(
        key_condition: Option<&Condition>,
        filter: Option<&Condition>,
        projection: Option<&[String]>,
    ) -> Result<Self> {
        if let Some(filter) = filter {
            validate_filter(filter)?;
        }

        let mut context = ExpressionContext::new();
        let key_condition = key_condition.map(|c| context.render(c));
        let filter = filter.map(|c| context.render(c));
        let projection = projection
            .filter(|attributes| !attributes.is_empty())
            .map(|attributes| context.render_projection(attributes));

        let (names, values) = context.into_parts();
        let values = values
            .into_iter()
            .map(|(placeholder, value)| Ok((placeholder, json_to_attribute(value)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            key_condition,
            filter,
            projection,
            names: (!names.is_empty()).then(|| names.into_iter().collect()),
            values: (!values.is_empty()).then_some(values),
        })
    }
}

fn request_limit(limit: usize) -> i32 {
    i32::try_from(limit).unwrap_or(i32::MAX)
}

fn non_empty(key: Option<Item>) -> Option<Item> {
    key.filter(|key| !key.is_empty())
}

// ============================================================================
// Scan
// ============================================================================

/// An un-executed scan over an entity's table.
pub struct ScanRequest<E> {
    client: DynamoClient,
    table_name: String,
    filter: Option<Condition>,
    limit: Option<usize>,
    page_size: Option<i32>,
    projection: Option<Vec<String>>,
    consistent_read: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ScanRequest<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            table_name: self.table_name.clone(),
            filter: self.filter.clone(),
            limit: self.limit,
            page_size: self.page_size,
            projection: self.projection.clone(),
            consistent_read: self.consistent_read,
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for ScanRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanRequest")
            .field("table_name", &self.table_name)
            .field("filter", &self.filter)
            .field("limit", &self.limit)
            .field("page_size", &self.page_size)
            .field("projection", &self.projection)
            .field("consistent_read", &self.consistent_read)
            .finish()
    }
}

impl<E: Entity> ScanRequest<E> {
    pub(crate) fn new(client: DynamoClient, filter: Option<Condition>) -> Self {
        let table_name = client.table_name::<E>();
        Self {
            client,
            table_name,
            filter,
            limit: None,
            page_size: None,
            projection: None,
            consistent_read: false,
            _entity: PhantomData,
        }
    }

    /// Adds a filter, ANDed with any filter already present.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Caps the number of entities `exec` returns.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of items the store evaluates per page (the request's `Limit`).
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(request_limit(page_size));
        self
    }

    /// Restricts the attributes returned. The entity must still deserialize
    /// from the projected attributes.
    pub fn select<S: Into<String>>(mut self, attributes: impl IntoIterator<Item = S>) -> Self {
        self.projection = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = consistent;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn filter_condition(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }

    /// Builds the SDK request for one page.
    pub fn build(&self, start_key: Option<Item>) -> Result<ScanFluentBuilder> {
        let expressions = Expressions::build(None, self.filter.as_ref(), self.projection.as_deref())?;

        Ok(self
            .client
            .sdk()
            .scan()
            .table_name(&self.table_name)
            .set_filter_expression(expressions.filter)
            .set_projection_expression(expressions.projection)
            .set_expression_attribute_names(expressions.names)
            .set_expression_attribute_values(expressions.values)
            .set_limit(self.page_size)
            .set_exclusive_start_key(start_key)
            .consistent_read(self.consistent_read))
    }

    /// Fetches one page.
    pub async fn exec_page(&self, start_key: Option<Item>) -> Result<Page<E>> {
        let request = self.build(start_key)?;

        tracing::debug!(table = %self.table_name, filtered = self.filter.is_some(), "Scan");

        let output = request
            .send()
            .await
            .map_err(|e| map_scan_error(e, &self.table_name))?;

        let page = Page {
            items: items_to_entities(output.items.unwrap_or_default())?,
            last_evaluated_key: non_empty(output.last_evaluated_key),
        };
        tracing::trace!(
            table = %self.table_name,
            count = page.items.len(),
            has_more = page.has_more(),
            "Scan page"
        );

        Ok(page)
    }

    /// Fetches pages until the table is exhausted or `limit` entities are collected.
    pub async fn exec(&self) -> Result<Vec<E>> {
        collect_pages(self.limit, |start_key| self.exec_page(start_key)).await
    }
}

// ============================================================================
// Query
// ============================================================================

/// An un-executed query against a table's primary key or one of its indexes.
pub struct QueryRequest<E> {
    client: DynamoClient,
    table_name: String,
    index: Option<IndexRef>,
    key_condition: Condition,
    filter: Option<Condition>,
    limit: Option<usize>,
    page_size: Option<i32>,
    projection: Option<Vec<String>>,
    consistent_read: bool,
    scan_forward: bool,
    invalid: Option<RepositoryError>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for QueryRequest<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            table_name: self.table_name.clone(),
            index: self.index,
            key_condition: self.key_condition.clone(),
            filter: self.filter.clone(),
            limit: self.limit,
            page_size: self.page_size,
            projection: self.projection.clone(),
            consistent_read: self.consistent_read,
            scan_forward: self.scan_forward,
            invalid: self.invalid.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for QueryRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRequest")
            .field("table_name", &self.table_name)
            .field("index", &self.index.map(|index| index.name))
            .field("key_condition", &self.key_condition)
            .field("filter", &self.filter)
            .field("limit", &self.limit)
            .field("scan_forward", &self.scan_forward)
            .field("invalid", &self.invalid)
            .finish()
    }
}

impl<E: Entity> QueryRequest<E> {
    /// Creates a query. A key condition that failed validation is kept and
    /// reported by `build`/`exec`, so the builder chain stays infallible.
    pub(crate) fn new(
        client: DynamoClient,
        index: Option<IndexRef>,
        key_condition: Condition,
        validation: Result<()>,
    ) -> Self {
        let table_name = client.table_name::<E>();
        Self {
            client,
            table_name,
            index,
            key_condition,
            filter: None,
            limit: None,
            page_size: None,
            projection: None,
            consistent_read: false,
            scan_forward: true,
            invalid: validation.err(),
            _entity: PhantomData,
        }
    }

    /// Adds a filter on non-key attributes, ANDed with any filter already present.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Caps the number of entities `exec` returns.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of items the store evaluates per page (the request's `Limit`).
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(request_limit(page_size));
        self
    }

    /// Restricts the attributes returned. The entity must still deserialize
    /// from the projected attributes.
    pub fn select<S: Into<String>>(mut self, attributes: impl IntoIterator<Item = S>) -> Self {
        self.projection = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Returns items in descending range key order.
    pub fn descending(mut self) -> Self {
        self.scan_forward = false;
        self
    }

    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = consistent;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn index_name(&self) -> Option<&'static str> {
        self.index.map(|index| index.name)
    }

    pub fn key_condition(&self) -> &Condition {
        &self.key_condition
    }

    pub fn filter_condition(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }

    /// Builds the SDK request for one page.
    pub fn build(&self, start_key: Option<Item>) -> Result<QueryFluentBuilder> {
        if let Some(err) = &self.invalid {
            return Err(err.clone());
        }

        let expressions = Expressions::build(
            Some(&self.key_condition),
            self.filter.as_ref(),
            self.projection.as_deref(),
        )?;

        Ok(self
            .client
            .sdk()
            .query()
            .table_name(&self.table_name)
            .set_index_name(self.index.map(|index| index.name.to_string()))
            .set_key_condition_expression(expressions.key_condition)
            .set_filter_expression(expressions.filter)
            .set_projection_expression(expressions.projection)
            .set_expression_attribute_names(expressions.names)
            .set_expression_attribute_values(expressions.values)
            .set_limit(self.page_size)
            .set_exclusive_start_key(start_key)
            .scan_index_forward(self.scan_forward)
            .consistent_read(self.consistent_read))
    }

    /// Fetches one page.
    pub async fn exec_page(&self, start_key: Option<Item>) -> Result<Page<E>> {
        let request = self.build(start_key)?;

        tracing::debug!(
            table = %self.table_name,
            index = self.index_name().unwrap_or("<primary>"),
            "Query"
        );

        let output = request
            .send()
            .await
            .map_err(|e| map_query_error(e, &self.table_name))?;

        let page = Page {
            items: items_to_entities(output.items.unwrap_or_default())?,
            last_evaluated_key: non_empty(output.last_evaluated_key),
        };
        tracing::trace!(
            table = %self.table_name,
            count = page.items.len(),
            has_more = page.has_more(),
            "Query page"
        );

        Ok(page)
    }

    /// Fetches pages until the results are exhausted or `limit` entities are collected.
    pub async fn exec(&self) -> Result<Vec<E>> {
        collect_pages(self.limit, |start_key| self.exec_page(start_key)).await
    }
}

async fn collect_pages<E, F, Fut>(limit: Option<usize>, mut fetch: F) -> Result<Vec<E>>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: std::future::Future<Output = Result<Page<E>>>,
{
    let mut entities = Vec::new();
    let mut start_key = None;

    loop {
        if limit.is_some_and(|limit| entities.len() >= limit) {
            break;
        }

        let page = fetch(start_key).await?;
        entities.extend(page.items);

        match page.last_evaluated_key {
            Some(key) => start_key = Some(key),
            None => break,
        }
    }

    if let Some(limit) = limit {
        entities.truncate(limit);
    }
    Ok(entities)
}
