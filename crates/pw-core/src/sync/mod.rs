//! Selection coordinator - the single authority over the brushed subset
//!
//! Views report candidate selections through [`Command`]s. The coordinator
//! normalizes them, fans the effective selection out to every other view,
//! re-narrows drill focus and refreshes the readout pushed to the
//! presentation sinks.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::analytics::{fit, summarize, Aggregate};
use crate::command::{Command, GestureEvent};
use crate::drill::FocusError;
use crate::error::{CoordinatorError, Result};
use crate::events::events::{DisplayModeChanged, DrillFocusChanged, SelectionChanged, ViewRegistered};
use crate::events::EventBus;
use crate::presentation::{BestPerformer, Degradation, FieldSummary, PresentationSink, Readout};
use crate::record::{FieldId, RecordSet, RecordStore};
use crate::selection::Selection;
use crate::state::DashboardSettings;
use crate::view::{ViewAdapter, ViewId};

pub struct SelectionCoordinator {
    store: Arc<RecordStore>,
    settings: DashboardSettings,

    /// Current brush, `Everything` when none is active
    selection: Selection,

    /// Registered views in registration order
    views: IndexMap<ViewId, Box<dyn ViewAdapter>>,

    sinks: Vec<Box<dyn PresentationSink>>,
    event_bus: Arc<EventBus>,

    /// Last readout pushed to the sinks
    readout: Readout,

    /// Completed selection cascades
    cascades: usize,
}

impl SelectionCoordinator {
    pub fn new(store: Arc<RecordStore>, settings: DashboardSettings) -> Self {
        let mut coordinator = Self {
            store,
            settings,
            selection: Selection::Everything,
            views: IndexMap::new(),
            sinks: Vec::new(),
            event_bus: Arc::new(EventBus::new()),
            readout: Readout::default(),
            cascades: 0,
        };
        let effective = coordinator.effective_selection();
        coordinator.readout = coordinator.compute_readout(&effective);
        coordinator
    }

    /// Use a shared event bus instead of a private one
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn effective_selection(&self) -> RecordSet {
        self.selection.effective(&self.store)
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    pub fn cascade_count(&self) -> usize {
        self.cascades
    }

    /// Attach a sink; it receives the current readout right away
    pub fn add_sink(&mut self, mut sink: Box<dyn PresentationSink>) {
        sink.present(&self.readout);
        self.sinks.push(sink);
    }

    /// Register a view, drawing it against the whole store
    pub fn register(&mut self, mut view: Box<dyn ViewAdapter>) -> ViewId {
        let id = view.id();
        let effective = self.effective_selection();

        view.render(&self.store.all());
        view.set_highlight(&effective);
        if view.supports_drill_focus() {
            view.narrow(&effective);
        }

        info!(view = view.display_name(), view_type = view.view_type(), %id, "Registered view");
        self.event_bus.publish(ViewRegistered {
            view_id: id,
            view_type: view.view_type().to_string(),
        });

        self.views.insert(id, view);
        id
    }

    pub fn view_ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.keys().copied()
    }

    pub fn view_adapter(&self, id: ViewId) -> Option<&dyn ViewAdapter> {
        self.views.get(&id).map(|v| &**v)
    }

    /// Downcast a registered view to its concrete type
    pub fn view<T: 'static>(&self, id: ViewId) -> Option<&T> {
        self.views.get(&id)?.as_any().downcast_ref::<T>()
    }

    pub fn view_mut<T: 'static>(&mut self, id: ViewId) -> Option<&mut T> {
        self.views.get_mut(&id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Route a pointer gesture to a view
    ///
    /// Returns whether a command was dispatched. Commands surfaced by a
    /// non-terminal gesture are dropped so that drags never run the cascade.
    pub fn handle_gesture(&mut self, id: ViewId, gesture: &GestureEvent) -> Result<bool> {
        let view = self
            .views
            .get_mut(&id)
            .ok_or(CoordinatorError::UnknownView(id))?;

        let Some(command) = view.on_gesture(gesture) else {
            return Ok(false);
        };

        if !gesture.is_terminal() {
            warn!(view = %id, kind = command.kind(), "Dropping command raised mid-gesture");
            return Ok(false);
        }

        self.dispatch(command)?;
        Ok(true)
    }

    /// Single intake for every command
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!(kind = command.kind(), "Dispatching command");

        match command {
            Command::CandidateSelection { origin, records } => {
                if !self.views.contains_key(&origin) {
                    return Err(CoordinatorError::UnknownView(origin));
                }
                self.on_candidate_selection(records, Some(origin));
            }
            Command::ClearSelection => {
                self.on_candidate_selection(RecordSet::new(), None);
            }
            Command::ToggleDisplayMode { view } => {
                let adapter = self.adapter_mut(view)?;
                let mode = adapter
                    .toggle_display_mode()
                    .ok_or(CoordinatorError::Unsupported {
                        view,
                        capability: "display modes",
                    })?;
                info!(%view, ?mode, "Display mode toggled");
                self.event_bus.publish(DisplayModeChanged { view_id: view, mode });
            }
            Command::SetDrillFocus { view, value } => {
                let adapter = self.adapter_mut(view)?;
                adapter
                    .focus_on(&value)
                    .map_err(|e| focus_error(view, e))?;
                self.publish_focus(view);
            }
            Command::StepDrillFocus { view, forward } => {
                let adapter = self.adapter_mut(view)?;
                adapter
                    .step_focus(forward)
                    .map_err(|e| focus_error(view, e))?;
                self.publish_focus(view);
            }
        }

        Ok(())
    }

    /// Adopt a candidate selection and run the full cascade
    ///
    /// `origin` is skipped during highlighting; it already shows its own
    /// brush. Drill focus is re-narrowed on every capable view, origin
    /// included.
    pub fn on_candidate_selection(&mut self, candidate: RecordSet, origin: Option<ViewId>) {
        self.selection = Selection::normalize(candidate, &self.store);
        let effective = self.effective_selection();

        for (id, view) in self.views.iter_mut() {
            if Some(*id) != origin {
                view.set_highlight(&effective);
            }
        }

        let mut refocused = Vec::new();
        for (id, view) in self.views.iter_mut() {
            if !view.supports_drill_focus() {
                continue;
            }
            let before = current_focus(&**view);
            view.narrow(&effective);
            let after = current_focus(&**view);
            if before != after {
                refocused.push((*id, after));
            }
        }

        self.readout = self.compute_readout(&effective);
        for sink in self.sinks.iter_mut() {
            sink.present(&self.readout);
        }
        self.cascades += 1;

        info!(
            selected = effective.len(),
            everything = self.selection.is_everything(),
            origin = ?origin,
            "Selection changed"
        );

        for (view_id, focus) in refocused {
            self.event_bus.publish(DrillFocusChanged { view_id, focus });
        }
        self.event_bus.publish(SelectionChanged {
            origin,
            everything: self.selection.is_everything(),
            selected: effective,
        });
    }

    fn adapter_mut(&mut self, id: ViewId) -> Result<&mut Box<dyn ViewAdapter>> {
        self.views
            .get_mut(&id)
            .ok_or(CoordinatorError::UnknownView(id))
    }

    fn publish_focus(&self, view_id: ViewId) {
        let focus = self.views.get(&view_id).and_then(|v| current_focus(&**v));
        debug!(view = %view_id, ?focus, "Drill focus changed");
        self.event_bus.publish(DrillFocusChanged { view_id, focus });
    }

    fn compute_readout(&self, effective: &RecordSet) -> Readout {
        let analytics = &self.settings.analytics;

        let summaries: Vec<FieldSummary> = analytics
            .summary_fields
            .iter()
            .map(|&field| FieldSummary {
                field,
                aggregate: summarize(&self.store, effective, field),
            })
            .collect();

        let performance = summaries
            .iter()
            .find(|s| s.field == analytics.performer_field)
            .map(|s| s.aggregate)
            .unwrap_or_else(|| summarize(&self.store, effective, analytics.performer_field));

        let best = match performance {
            Aggregate::NoData => None,
            Aggregate::Snapshot(snapshot) => {
                self.store.get(snapshot.argmin).map(|record| BestPerformer {
                    record: snapshot.argmin,
                    name: record.tag(analytics.performer_tag).to_string(),
                    value: snapshot.min,
                    lap: record.value(FieldId::LapNumber),
                })
            }
        };

        Readout {
            selected: effective.len(),
            everything: self.selection.is_everything(),
            summaries,
            best,
            degradation: self.degradation(effective),
        }
    }

    /// Regression over the brushed subset, suppressed for the whole store
    fn degradation(&self, effective: &RecordSet) -> Option<Degradation> {
        let regression = &self.settings.analytics.regression;
        if !regression.enabled || self.selection.is_everything() || effective.len() < 2 {
            return None;
        }

        match fit(&self.store, effective, regression.x, regression.y) {
            Ok(model) => Some(Degradation {
                model,
                scaled_slope: model.slope * regression.slope_scale,
                unit: regression.slope_unit.clone(),
            }),
            Err(no_fit) => {
                debug!(%no_fit, "Regression display suppressed");
                None
            }
        }
    }
}

fn current_focus(view: &dyn ViewAdapter) -> Option<String> {
    view.drill_focus()
        .and_then(|d| d.focus())
        .map(str::to_string)
}

fn focus_error(view: ViewId, error: FocusError) -> CoordinatorError {
    match error {
        FocusError::Unsupported => CoordinatorError::Unsupported {
            view,
            capability: "drill focus",
        },
        other => other.into(),
    }
}
