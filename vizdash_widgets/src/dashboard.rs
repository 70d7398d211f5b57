// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget state and load bookkeeping.
//!
//! Each widget load is an independent fetch-then-aggregate. Loads are not aborted when a widget
//! changes or goes away; instead every load carries a [`LoadTicket`], and a result is applied only
//! if the ticket still matches the widget's current version. Any change to a widget (new spec, new
//! load, removal) bumps the version and so makes outstanding tickets stale.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::aggregate::aggregate;
use crate::source::{RecordSource, SourceError};
use crate::{WidgetResult, WidgetSpec};

/// Identifies a widget on a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

/// Errors returned by [`Dashboard`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// No widget with this id.
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),
}

/// Fetches rows for `spec` and aggregates them.
pub fn load_widget<S: RecordSource + ?Sized>(
    source: &S,
    spec: &WidgetSpec,
) -> Result<WidgetResult, SourceError> {
    let query = spec.query_string();
    log::debug!("loading {query:?}");
    let rows = source.fetch(&query)?;
    Ok(aggregate(rows, spec))
}

/// One widget's spec and its latest applied load.
#[derive(Debug, Clone)]
pub struct Widget {
    /// Current spec.
    pub spec: WidgetSpec,
    /// Bumped on every change; loads started at an older version are stale.
    pub version: u64,
    /// `true` between [`Dashboard::begin_load`] and the matching [`Dashboard::finish_load`].
    pub loading: bool,
    /// Result of the latest applied load.
    pub result: Option<WidgetResult>,
    /// Error of the latest applied load.
    pub error: Option<SourceError>,
}

impl Widget {
    fn new(spec: WidgetSpec) -> Self {
        Self {
            spec,
            version: 1,
            loading: false,
            result: None,
            error: None,
        }
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// A load in flight for one widget.
///
/// The ticket carries its own copy of the spec, so the fetch does not borrow the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    widget: WidgetId,
    version: u64,
    spec: WidgetSpec,
}

impl LoadTicket {
    /// The widget this load is for.
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// The spec to load with.
    pub fn spec(&self) -> &WidgetSpec {
        &self.spec
    }
}

/// A set of widgets keyed by [`WidgetId`].
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    widgets: HashMap<WidgetId, Widget>,
}

impl Dashboard {
    /// Creates an empty dashboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a widget, or replaces the spec of an existing one.
    ///
    /// Replacing keeps the last result on display until a new load lands, and makes loads
    /// already in flight stale.
    pub fn upsert(&mut self, id: WidgetId, spec: WidgetSpec) {
        match self.widgets.entry(id) {
            Entry::Occupied(mut e) => {
                let w = e.get_mut();
                w.spec = spec;
                w.loading = false;
                w.bump();
            }
            Entry::Vacant(e) => {
                e.insert(Widget::new(spec));
            }
        }
    }

    /// Removes a widget. Loads in flight for it will be discarded.
    pub fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        self.widgets.remove(&id)
    }

    /// Returns a widget.
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    /// Returns widget ids in ascending order.
    pub fn ids(&self) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self.widgets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the number of widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if there are no widgets.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Starts a load, superseding any load already in flight for this widget.
    pub fn begin_load(&mut self, id: WidgetId) -> Result<LoadTicket, DashboardError> {
        let w = self
            .widgets
            .get_mut(&id)
            .ok_or(DashboardError::UnknownWidget(id))?;
        w.bump();
        w.loading = true;
        Ok(LoadTicket {
            widget: id,
            version: w.version,
            spec: w.spec.clone(),
        })
    }

    /// Returns `true` if applying `ticket` now would take effect.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.widgets
            .get(&ticket.widget)
            .is_some_and(|w| w.version == ticket.version)
    }

    /// Applies the outcome of a load.
    ///
    /// Returns `false`, leaving the dashboard untouched, if the ticket is stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<WidgetResult, SourceError>,
    ) -> bool {
        let Some(w) = self
            .widgets
            .get_mut(&ticket.widget)
            .filter(|w| w.version == ticket.version)
        else {
            log::debug!("discarding stale load for {:?}", ticket.widget);
            return false;
        };
        w.loading = false;
        match outcome {
            Ok(result) => {
                w.result = Some(result);
                w.error = None;
            }
            Err(err) => {
                log::debug!("load for {:?} failed: {err}", ticket.widget);
                w.result = None;
                w.error = Some(err);
            }
        }
        true
    }

    /// Loads one widget synchronously.
    pub fn refresh<S: RecordSource + ?Sized>(
        &mut self,
        id: WidgetId,
        source: &S,
    ) -> Result<(), DashboardError> {
        let ticket = self.begin_load(id)?;
        let outcome = load_widget(source, ticket.spec());
        self.finish_load(ticket, outcome);
        Ok(())
    }

    /// Loads every widget synchronously, in id order.
    pub fn refresh_all<S: RecordSource + ?Sized>(&mut self, source: &S) {
        for id in self.ids() {
            // Ids come from the map, so the widget exists.
            let _ = self.refresh(id, source);
        }
    }
}
