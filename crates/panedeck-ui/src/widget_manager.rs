//! Widget lifecycle and focus management
//!
//! The [`WidgetManager`] owns one widget instance per layout slot, drives
//! their initialization, and moves focus between them using the neighbor
//! links computed by the grid resolver.
//!
//! # Example
//!
//! ```ignore
//! use panedeck_ui::WidgetManager;
//!
//! let mut manager = WidgetManager::build(&config, 120, 40, bus, |spec| build_widget(spec))?;
//! manager.init_all(runtime.handle());
//! manager.switch_tab(0);
//! manager.next_widget(Direction::Right);
//! ```

use crossterm::event::KeyEvent;
use panedeck_core::{
    CoreError, CoreResult, DashboardConfig, Direction, GridResolver, InitContext, InitOutcome,
    LifecycleState, Message, MessageBus, ResolvedLayout, ResolvedRect, SlotIndex, TabGeometry,
    TabSpec, Widget, WidgetKind, WidgetSpec, WidgetStatus,
};
use std::collections::HashSet;
use std::ops::Range;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    Never,
    Active,
    Inactive,
}

/// A widget placed in one layout slot.
pub struct WidgetInstance {
    id: String,
    title: String,
    kind: WidgetKind,
    rect: ResolvedRect,
    widget: Box<dyn Widget>,
    status: WidgetStatus,
    focus: Focus,
    started: bool,
}

impl WidgetInstance {
    fn new(spec: &WidgetSpec, kind: WidgetKind, rect: ResolvedRect, widget: Box<dyn Widget>) -> Self {
        Self {
            id: spec.id.clone(),
            title: spec.title.clone(),
            kind,
            rect,
            widget,
            status: WidgetStatus::new(),
            focus: Focus::Never,
            started: false,
        }
    }

    /// Global slot index.
    #[must_use]
    pub fn index(&self) -> SlotIndex {
        self.rect.index
    }

    /// Widget id from the configuration.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Placement of this instance on the grid.
    #[must_use]
    pub fn rect(&self) -> &ResolvedRect {
        &self.rect
    }

    #[must_use]
    pub fn tab_index(&self) -> usize {
        self.rect.tab_index
    }

    #[must_use]
    pub fn neighbor(&self, direction: Direction) -> Option<SlotIndex> {
        self.rect.neighbor(direction)
    }

    /// Shared readiness flag.
    #[must_use]
    pub fn status(&self) -> &WidgetStatus {
        &self.status
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.status.is_disabled()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        if self.status.is_disabled() {
            LifecycleState::Disabled
        } else if !self.status.is_ready() {
            LifecycleState::Uninitialized
        } else {
            match self.focus {
                Focus::Never => LifecycleState::Ready,
                Focus::Active => LifecycleState::Active,
                Focus::Inactive => LifecycleState::Inactive,
            }
        }
    }

    /// The widget implementation, for rendering.
    #[must_use]
    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    /// Disables the widget permanently.
    pub fn disable(&mut self) {
        self.deactivate();
        self.status.disable();
    }

    fn activate(&mut self) {
        self.widget.activate();
        self.focus = Focus::Active;
    }

    fn deactivate(&mut self) {
        if self.focus == Focus::Active {
            self.widget.deactivate();
            self.focus = Focus::Inactive;
        }
    }
}

/// Where the last successful focus move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounce {
    /// Widget that lost focus.
    pub widget: SlotIndex,
    /// Direction of the move.
    pub direction: Direction,
}

/// Focus state of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    /// Visible tab, `None` until the first switch.
    pub active_tab: Option<usize>,
    /// Focused widget, `None` when nothing on the tab is ready.
    pub active_widget: Option<SlotIndex>,
    /// Memory used to retrace the last move.
    pub bounce: Option<Bounce>,
}

/// Owns every widget instance and the navigation state.
///
/// Focus only ever lands on widgets that are ready and not disabled.
/// Moving onto a disabled widget is refused, while widgets that are still
/// loading are stepped over.
pub struct WidgetManager {
    tabs: Vec<TabSpec>,
    layout: ResolvedLayout,
    instances: Vec<WidgetInstance>,
    nav: NavigationState,
    bus: MessageBus,
}

impl WidgetManager {
    /// Resolves the layout for a `width x height` grid and builds one
    /// widget per slot with `factory`.
    ///
    /// Widgets are not initialized yet; call [`init_all`](Self::init_all).
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownWidget`] when a slot names an undeclared widget,
    /// or any error returned by `factory`.
    pub fn build<F>(
        config: &DashboardConfig,
        width: u16,
        height: u16,
        bus: MessageBus,
        mut factory: F,
    ) -> CoreResult<Self>
    where
        F: FnMut(&WidgetSpec) -> CoreResult<Box<dyn Widget>>,
    {
        let layout = GridResolver::new(width, height).resolve(&config.layout);
        let mut instances = Vec::with_capacity(layout.len());
        for rect in &layout.rects {
            let spec = config
                .widget(&rect.widget_id)
                .ok_or_else(|| CoreError::UnknownWidget(rect.widget_id.clone()))?;
            let kind = spec.kind()?;
            let widget = factory(spec)?;
            instances.push(WidgetInstance::new(spec, kind, rect.clone(), widget));
        }
        info!(
            tabs = layout.tabs.len(),
            widgets = instances.len(),
            width,
            height,
            "built dashboard"
        );
        Ok(Self {
            tabs: config.layout.clone(),
            layout,
            instances,
            nav: NavigationState::default(),
            bus,
        })
    }

    /// Starts initialization of every widget.
    ///
    /// Synchronous widgets become ready (or disabled) before this returns.
    /// Deferred initializations are spawned on `runtime`; their handles are
    /// returned so callers may await them, but nothing needs to.
    pub fn init_all(&mut self, runtime: &Handle) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        for instance in &mut self.instances {
            if instance.started {
                continue;
            }
            instance.started = true;
            let ctx = InitContext::new(instance.index(), instance.status.clone(), self.bus.clone());
            match instance.widget.init(ctx.clone()) {
                InitOutcome::Ready => ctx.signal_ready(),
                InitOutcome::Failed(err) => ctx.signal_disabled(&err),
                InitOutcome::Deferred(task) => {
                    handles.push(runtime.spawn(async move {
                        match task.await {
                            Ok(()) => ctx.signal_ready(),
                            Err(err) => ctx.signal_disabled(&err),
                        }
                    }));
                }
            }
        }
        debug!(deferred = handles.len(), "widget initialization started");
        handles
    }

    /// Shows tab `tab` and focuses its first ready widget.
    ///
    /// Returns `false` without changing anything when `tab` is out of
    /// range or already visible.
    pub fn switch_tab(&mut self, tab: usize) -> bool {
        if tab >= self.layout.tabs.len() || self.nav.active_tab == Some(tab) {
            return false;
        }
        if let Some(previous) = self.nav.active_tab {
            let range = self.tab_range(previous);
            for instance in &mut self.instances[range] {
                instance.deactivate();
            }
        }
        self.nav = NavigationState {
            active_tab: Some(tab),
            active_widget: None,
            bounce: None,
        };
        self.activate_first_ready(tab);
        info!(
            tab,
            name = %self.layout.tabs[tab].name,
            active = ?self.nav.active_widget,
            "switched tab"
        );
        true
    }

    /// Moves focus to the neighbor in `direction`.
    ///
    /// Reversing the previous move returns to the widget it came from,
    /// even when the geometric neighbor is a different widget. Widgets that
    /// are still loading are skipped; a disabled widget blocks the move.
    /// Returns whether focus moved.
    pub fn next_widget(&mut self, direction: Direction) -> bool {
        let Some(from) = self.nav.active_widget else {
            return false;
        };
        let target = match self.nav.bounce {
            Some(bounce) if bounce.direction == direction.opposite() => {
                if self.is_focusable(bounce.widget) {
                    Some(bounce.widget)
                } else {
                    debug!(widget = bounce.widget, "bounce target not focusable");
                    None
                }
            }
            _ => self.walk(from, direction),
        };
        let Some(to) = target else {
            return false;
        };
        self.instances[from].deactivate();
        self.instances[to].activate();
        self.nav.active_widget = Some(to);
        self.nav.bounce = Some(Bounce {
            widget: from,
            direction,
        });
        debug!(from, to, %direction, "moved focus");
        true
    }

    /// Follows neighbor links from `from`, stepping over widgets that are
    /// not ready yet.
    fn walk(&self, from: SlotIndex, direction: Direction) -> Option<SlotIndex> {
        let mut visited = HashSet::from([from]);
        let mut cursor = self.instances.get(from)?.neighbor(direction)?;
        loop {
            if !visited.insert(cursor) {
                warn!(from, cursor, %direction, "neighbor links form a cycle");
                return None;
            }
            let candidate = self.instances.get(cursor)?;
            if Some(candidate.tab_index()) != self.nav.active_tab || candidate.is_disabled() {
                return None;
            }
            if candidate.is_ready() {
                return Some(cursor);
            }
            cursor = candidate.neighbor(direction)?;
        }
    }

    fn is_focusable(&self, index: SlotIndex) -> bool {
        self.instances
            .get(index)
            .is_some_and(|i| Some(i.tab_index()) == self.nav.active_tab && i.is_ready())
    }

    fn activate_first_ready(&mut self, tab: usize) -> bool {
        let range = self.tab_range(tab);
        let Some(index) = self.instances[range]
            .iter()
            .find(|i| i.is_ready())
            .map(WidgetInstance::index)
        else {
            return false;
        };
        self.instances[index].activate();
        self.nav.active_widget = Some(index);
        true
    }

    /// Applies readiness changes published by widget tasks.
    ///
    /// A disabled active widget loses focus, and a tab without a focused
    /// widget focuses its first ready one. Returns whether focus changed.
    pub fn reconcile(&mut self) -> bool {
        let Some(tab) = self.nav.active_tab else {
            return false;
        };
        let mut changed = false;
        if let Some(active) = self.nav.active_widget {
            if !self.instances[active].is_disabled() {
                return false;
            }
            warn!(widget = active, "active widget was disabled");
            self.instances[active].deactivate();
            self.nav.active_widget = None;
            self.nav.bounce = None;
            changed = true;
        }
        self.activate_first_ready(tab) || changed
    }

    /// Re-resolves the layout for a new grid size.
    ///
    /// Slot indices, lifecycle states and focus are kept.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == (self.layout.width, self.layout.height) {
            return;
        }
        let layout = GridResolver::new(width, height).resolve(&self.tabs);
        for (instance, rect) in self.instances.iter_mut().zip(&layout.rects) {
            instance.rect = rect.clone();
        }
        self.layout = layout;
        debug!(width, height, "resized layout");
    }

    /// Forwards a key to the focused widget.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        let active = self.nav.active_widget?;
        self.instances.get_mut(active)?.widget.handle_key(key)
    }

    /// Ticks every started widget that is not disabled.
    pub fn tick(&mut self) {
        for instance in &mut self.instances {
            if instance.started && !instance.is_disabled() {
                instance.widget.tick();
            }
        }
    }

    fn tab_range(&self, tab: usize) -> Range<SlotIndex> {
        self.layout
            .tabs
            .get(tab)
            .map_or(0..0, |t| t.slots.clone())
    }

    /// Current navigation state.
    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    #[must_use]
    pub fn active_tab(&self) -> Option<usize> {
        self.nav.active_tab
    }

    /// The focused widget, if any.
    #[must_use]
    pub fn active_widget(&self) -> Option<&WidgetInstance> {
        self.nav.active_widget.and_then(|i| self.instances.get(i))
    }

    #[must_use]
    pub fn instance(&self, index: SlotIndex) -> Option<&WidgetInstance> {
        self.instances.get(index)
    }

    #[must_use]
    pub fn instances(&self) -> &[WidgetInstance] {
        &self.instances
    }

    /// Instances on the visible tab, in declaration order.
    #[must_use]
    pub fn visible(&self) -> &[WidgetInstance] {
        match self.nav.active_tab {
            Some(tab) => &self.instances[self.tab_range(tab)],
            None => &[],
        }
    }

    /// Rows and columns of the visible tab.
    #[must_use]
    pub fn visible_geometry(&self) -> Option<&TabGeometry> {
        self.nav.active_tab.and_then(|t| self.layout.tabs.get(t))
    }

    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.layout.tabs.len()
    }

    #[must_use]
    pub fn tab_names(&self) -> Vec<&str> {
        self.layout.tabs.iter().map(|t| t.name.as_str()).collect()
    }

    /// Size of the grid the layout was resolved for.
    #[must_use]
    pub fn grid_size(&self) -> (u16, u16) {
        (self.layout.width, self.layout.height)
    }

    /// Bus widget tasks report on.
    #[must_use]
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }
}
