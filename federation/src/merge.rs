//! Merge rules for answers from several sources.
//!
//! Every rule walks the sources in precedence order. NotFound and
//! Unsupported never abort a walk; any other error aborts it immediately.

use crate::service::FederatedCourseManagement;
use crate::telemetry::FederationTelemetry;
use cm_core::{CmError, CmResult, CourseManagementQuery, EntityKind, Identified};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Boxed call into one source, as produced by the `async_trait` methods.
pub(crate) type SourceCall<'a, T> = Pin<Box<dyn Future<Output = CmResult<T>> + Send + 'a>>;

impl FederatedCourseManagement {
    fn observe<T>(
        operation: &'static str,
        source: &dyn CourseManagementQuery,
        result: &CmResult<T>
    ) {
        let outcome = match result {
            Ok(_) => "found",
            Err(e) => e.outcome()
        };
        match result {
            Err(e) if !e.is_benign() => {
                warn!(source = %source.source_name(), operation, error = %e, "Source failed");
            }
            _ => {
                debug!(source = %source.source_name(), operation, outcome, "Source answered");
            }
        }
        FederationTelemetry::record_outcome(operation, source.source_name(), outcome);
    }

    /// Single-object lookup: the first source that finds the object wins.
    pub(crate) async fn first_found<'a, T, F>(
        &'a self,
        operation: &'static str,
        kind: EntityKind,
        id: &str,
        call: F
    ) -> CmResult<T>
    where
        T: Send,
        F: Fn(&'a dyn CourseManagementQuery) -> SourceCall<'a, T> + Send + Sync
    {
        for source in &self.sources {
            let result = call(source.as_ref()).await;
            Self::observe(operation, source.as_ref(), &result);
            match result {
                Ok(found) => return Ok(found),
                Err(e) if e.is_benign() => {}
                Err(e) => return Err(e)
            }
        }
        Err(CmError::not_found(kind, id))
    }

    /// Collection keyed by the id of a parent entity.
    ///
    /// NotFound only when no source succeeded and at least one source
    /// reported the id unknown. Unsupported does not vote.
    pub(crate) async fn union_keyed<'a, T, F>(
        &'a self,
        operation: &'static str,
        kind: EntityKind,
        id: &str,
        call: F
    ) -> CmResult<Vec<T>>
    where
        T: Identified + Send,
        F: Fn(&'a dyn CourseManagementQuery) -> SourceCall<'a, Vec<T>> + Send + Sync
    {
        let mut merged = Merged::default();
        let mut succeeded = false;
        let mut reported_unknown = false;

        for source in &self.sources {
            let result = call(source.as_ref()).await;
            Self::observe(operation, source.as_ref(), &result);
            match result {
                Ok(items) => {
                    succeeded = true;
                    merged.extend(items);
                }
                Err(e) if e.is_not_found() => reported_unknown = true,
                Err(e) if e.is_unsupported() => {}
                Err(e) => return Err(e)
            }
        }

        if !succeeded && reported_unknown {
            return Err(CmError::not_found(kind, id));
        }
        Ok(merged.items)
    }

    /// Unkeyed collection: union of every answer, never NotFound.
    pub(crate) async fn union_all<'a, T, F>(
        &'a self,
        operation: &'static str,
        call: F
    ) -> CmResult<Vec<T>>
    where
        T: Identified + Send,
        F: Fn(&'a dyn CourseManagementQuery) -> SourceCall<'a, Vec<T>> + Send + Sync
    {
        let mut merged = Merged::default();
        for source in &self.sources {
            let result = call(source.as_ref()).await;
            Self::observe(operation, source.as_ref(), &result);
            match result {
                Ok(items) => merged.extend(items),
                Err(e) if e.is_benign() => {}
                Err(e) => return Err(e)
            }
        }
        Ok(merged.items)
    }

    /// Boolean vote. Answers `target` as soon as one source does, otherwise
    /// the opposite, including when no source voted.
    pub(crate) async fn any_answers<'a, F>(
        &'a self,
        operation: &'static str,
        target: bool,
        call: F
    ) -> CmResult<bool>
    where
        F: Fn(&'a dyn CourseManagementQuery) -> SourceCall<'a, bool> + Send + Sync
    {
        for source in &self.sources {
            let result = call(source.as_ref()).await;
            Self::observe(operation, source.as_ref(), &result);
            match result {
                Ok(answer) if answer == target => return Ok(target),
                Ok(_) => {}
                Err(e) if e.is_benign() => {}
                Err(e) => return Err(e)
            }
        }
        Ok(!target)
    }

    /// Optional lookup: the first `Some` wins.
    pub(crate) async fn first_some<'a, T, F>(
        &'a self,
        operation: &'static str,
        call: F
    ) -> CmResult<Option<T>>
    where
        T: Send,
        F: Fn(&'a dyn CourseManagementQuery) -> SourceCall<'a, Option<T>> + Send + Sync
    {
        for source in &self.sources {
            let result = call(source.as_ref()).await;
            Self::observe(operation, source.as_ref(), &result);
            match result {
                Ok(Some(found)) => return Ok(Some(found)),
                Ok(None) => {}
                Err(e) if e.is_benign() => {}
                Err(e) => return Err(e)
            }
        }
        Ok(None)
    }

    /// Role maps: an earlier source keeps its entry for a key.
    pub(crate) async fn merge_roles<'a, F>(
        &'a self,
        operation: &'static str,
        call: F
    ) -> CmResult<HashMap<String, String>>
    where
        F: Fn(&'a dyn CourseManagementQuery) -> SourceCall<'a, HashMap<String, String>>
            + Send
            + Sync
    {
        let mut roles = HashMap::new();
        for source in &self.sources {
            let result = call(source.as_ref()).await;
            Self::observe(operation, source.as_ref(), &result);
            match result {
                Ok(found) => {
                    for (key, role) in found {
                        roles.entry(key).or_insert(role);
                    }
                }
                Err(e) if e.is_benign() => {}
                Err(e) => return Err(e)
            }
        }
        Ok(roles)
    }
}

/// Union that keeps the first item seen for each identity.
struct Merged<T> {
    items: Vec<T>,
    seen: HashSet<String>
}

impl<T> Default for Merged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new()
        }
    }
}

impl<T: Identified> Merged<T> {
    fn extend(&mut self, items: Vec<T>) {
        for item in items {
            if self.seen.insert(item.identity().to_string()) {
                self.items.push(item);
            }
        }
    }
}
