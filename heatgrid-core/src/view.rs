//! View state, events, and the mount/unmount lifecycle
//!
//! `ViewState` only changes through the transition methods below. A mounted
//! heatmap holds a resize subscription on its viewport for as long as it
//! lives; dropping or unmounting it releases the listener. Each resize queues
//! a `Resize` for every subscriber, and a mounted heatmap applies its queued
//! resizes before any read or event.
//!
//! Global invariants enforced:
//! - Dimensions are recomputed on mount and on every resize
//! - Pointer events outside the grid leave the state unchanged
//! - Listener count after unmount equals listener count before mount

use crate::dimensions::{Dimensions, LayoutSurface};
use crate::error::GridError;
use crate::heatmap::Heatmap;
use crate::hover::{HoverState, Tooltip};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Discrete UI events a heatmap reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Resize,
    PointerEnter { row: usize, col: usize },
    PointerLeave,
}

/// Derived, per-instance state: dimensions plus the hovered cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub dimensions: Dimensions,
    pub hover: HoverState,
}

impl ViewState {
    /// Initial state for a heatmap laid out on `surface`
    pub fn compute<S: LayoutSurface + ?Sized>(
        heatmap: &Heatmap,
        surface: &S,
    ) -> Result<Self, GridError> {
        Ok(ViewState {
            dimensions: heatmap.dimensions(surface)?,
            hover: HoverState::Idle,
        })
    }

    /// Recompute dimensions, keeping the hovered cell
    pub fn recompute<S: LayoutSurface + ?Sized>(
        &mut self,
        heatmap: &Heatmap,
        surface: &S,
    ) -> Result<(), GridError> {
        self.dimensions = heatmap.dimensions(surface)?;
        Ok(())
    }

    /// Hover a cell, rejecting coordinates outside the grid
    pub fn enter(&mut self, heatmap: &Heatmap, row: usize, col: usize) -> Result<(), GridError> {
        heatmap.matrix().cell(row, col)?;
        self.hover = self.hover.enter(row, col);
        Ok(())
    }

    pub fn leave(&mut self) {
        self.hover = self.hover.leave();
    }

    /// Apply one event
    pub fn apply<S: LayoutSurface + ?Sized>(
        &mut self,
        heatmap: &Heatmap,
        surface: &S,
        event: ViewEvent,
    ) -> Result<(), GridError> {
        match event {
            ViewEvent::Resize => self.recompute(heatmap, surface),
            ViewEvent::PointerEnter { row, col } => self.enter(heatmap, row, col),
            ViewEvent::PointerLeave => {
                self.leave();
                Ok(())
            }
        }
    }

    /// Tooltip for the hovered cell, if tooltips are enabled and a cell is hovered
    pub fn tooltip(&self, heatmap: &Heatmap) -> Result<Option<Tooltip>, GridError> {
        if !heatmap.show_tooltip {
            return Ok(None);
        }
        self.hover
            .cell()
            .map(|(row, col)| heatmap.tooltip(row, col))
            .transpose()
    }
}

/// Identifier of a registered resize listener
pub type ListenerId = u64;

#[derive(Debug, Default)]
struct ViewportInner {
    width: f64,
    /// Undelivered resize count per listener
    listeners: BTreeMap<ListenerId, usize>,
    next_id: ListenerId,
}

/// In-memory layout surface and resize-event source
#[derive(Debug, Default)]
pub struct Viewport {
    inner: RefCell<ViewportInner>,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Viewport {
            inner: RefCell::new(ViewportInner {
                width,
                ..ViewportInner::default()
            }),
        }
    }

    pub fn width(&self) -> f64 {
        self.inner.borrow().width
    }

    /// Change the width and queue a `Resize` for every listener
    ///
    /// Returns the listeners that were notified.
    pub fn resize(&self, width: f64) -> Vec<ListenerId> {
        let mut inner = self.inner.borrow_mut();
        inner.width = width;
        tracing::debug!(width, listeners = inner.listeners.len(), "viewport resized");
        for pending in inner.listeners.values_mut() {
            *pending += 1;
        }
        inner.listeners.keys().copied().collect()
    }

    /// Register a resize listener, released when the guard drops
    pub fn subscribe(&self) -> ResizeSubscription<'_> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, 0);
        ResizeSubscription { viewport: self, id }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Resizes queued for `id` since it last drained them
    pub fn pending_resizes(&self, id: ListenerId) -> usize {
        self.inner.borrow().listeners.get(&id).copied().unwrap_or(0)
    }

    fn take_pending(&self, id: ListenerId) -> usize {
        self.inner
            .borrow_mut()
            .listeners
            .get_mut(&id)
            .map(std::mem::take)
            .unwrap_or(0)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.inner.borrow_mut().listeners.remove(&id);
    }
}

impl LayoutSurface for Viewport {
    fn container_width(&self) -> Option<f64> {
        Some(self.width())
    }
}

/// Scoped resize registration on a [`Viewport`]
#[derive(Debug)]
pub struct ResizeSubscription<'v> {
    viewport: &'v Viewport,
    id: ListenerId,
}

impl ResizeSubscription<'_> {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Drain queued resizes, returning whether any arrived
    fn take_resize(&self) -> bool {
        self.viewport.take_pending(self.id) > 0
    }
}

impl Drop for ResizeSubscription<'_> {
    fn drop(&mut self) {
        self.viewport.unsubscribe(self.id);
    }
}

/// A heatmap attached to a viewport
#[derive(Debug)]
pub struct MountedHeatmap<'v> {
    heatmap: Heatmap,
    view: Cell<ViewState>,
    subscription: ResizeSubscription<'v>,
}

impl Heatmap {
    /// Attach to a viewport: register for resizes and compute dimensions
    pub fn mount(self, viewport: &Viewport) -> Result<MountedHeatmap<'_>, GridError> {
        let subscription = viewport.subscribe();
        let view = ViewState::compute(&self, viewport)?;
        tracing::debug!(listener = subscription.id(), "heatmap mounted");
        Ok(MountedHeatmap {
            heatmap: self,
            view: Cell::new(view),
            subscription,
        })
    }
}

impl MountedHeatmap<'_> {
    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    /// Current view, with any queued resizes applied
    pub fn view(&self) -> ViewState {
        if let Err(err) = self.sync() {
            tracing::warn!(%err, "failed to apply viewport resize");
        }
        self.view.get()
    }

    pub fn listener_id(&self) -> ListenerId {
        self.subscription.id()
    }

    /// Handle one event against the current viewport width
    pub fn handle(&mut self, event: ViewEvent) -> Result<(), GridError> {
        self.sync()?;
        let mut view = self.view.get();
        view.apply(&self.heatmap, self.subscription.viewport, event)?;
        self.view.set(view);
        Ok(())
    }

    pub fn tooltip(&self) -> Result<Option<Tooltip>, GridError> {
        self.view().tooltip(&self.heatmap)
    }

    /// Apply resizes delivered since the last read or event
    fn sync(&self) -> Result<(), GridError> {
        if self.subscription.take_resize() {
            let mut view = self.view.get();
            view.recompute(&self.heatmap, self.subscription.viewport)?;
            tracing::debug!(
                listener = self.subscription.id(),
                cell_width = view.dimensions.cell_width,
                "applied viewport resize"
            );
            self.view.set(view);
        }
        Ok(())
    }

    /// Release the resize listener and hand the heatmap back
    pub fn unmount(self) -> Heatmap {
        tracing::debug!(listener = self.subscription.id(), "heatmap unmounted");
        self.heatmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::HeatmapOptions;

    fn heatmap(fixed_width: bool) -> Heatmap {
        Heatmap::new(HeatmapOptions {
            data: vec![
                vec![Some(1.0), Some(2.0), Some(3.0)],
                vec![Some(4.0), None, Some(6.0)],
            ],
            row_labels: vec!["alpha".to_string(), "beta".to_string()],
            column_labels: vec!["x".to_string(), "y".to_string(), "z".to_string()],
            fixed_width,
            ..HeatmapOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn test_mount_registers_and_unmount_releases() {
        let viewport = Viewport::new(600.0);
        assert_eq!(viewport.listener_count(), 0);
        let mounted = heatmap(false).mount(&viewport).unwrap();
        assert_eq!(viewport.listener_count(), 1);
        mounted.unmount();
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_drop_releases_listener() {
        let viewport = Viewport::new(600.0);
        {
            let _a = heatmap(true).mount(&viewport).unwrap();
            let _b = heatmap(true).mount(&viewport).unwrap();
            assert_eq!(viewport.listener_count(), 2);
        }
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_discarded_mount_does_not_leak() {
        let viewport = Viewport::new(600.0);
        let _ = heatmap(false).mount(&viewport).unwrap();
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_responsive_state_needs_a_measurable_surface() {
        let result = ViewState::compute(&heatmap(false), &None::<f64>);
        assert_eq!(result, Err(GridError::MissingContainerWidth));
    }

    #[test]
    fn test_resize_recomputes_responsive_width() {
        let viewport = Viewport::new(345.0);
        let mut mounted = heatmap(false).mount(&viewport).unwrap();
        // gutter is "alpha" = 45px
        assert_eq!(mounted.view().dimensions.cell_width, 100.0);

        let notified = viewport.resize(645.0);
        assert_eq!(notified, vec![mounted.listener_id()]);
        mounted.handle(ViewEvent::Resize).unwrap();
        assert_eq!(mounted.view().dimensions.cell_width, 200.0);
    }

    #[test]
    fn test_resize_reaches_mounted_heatmap_without_handle() {
        let viewport = Viewport::new(345.0);
        let mounted = heatmap(false).mount(&viewport).unwrap();
        assert_eq!(mounted.view().dimensions.cell_width, 100.0);

        viewport.resize(645.0);
        viewport.resize(945.0);
        assert_eq!(viewport.pending_resizes(mounted.listener_id()), 2);
        assert_eq!(mounted.view().dimensions.cell_width, 300.0);
        assert_eq!(viewport.pending_resizes(mounted.listener_id()), 0);
    }

    #[test]
    fn test_resize_reaches_every_mount() {
        let viewport = Viewport::new(345.0);
        let first = heatmap(false).mount(&viewport).unwrap();
        let second = heatmap(false).mount(&viewport).unwrap();
        viewport.resize(645.0);
        assert_eq!(first.view().dimensions.cell_width, 200.0);
        assert_eq!(second.view().dimensions.cell_width, 200.0);
    }

    #[test]
    fn test_queued_resize_applies_before_pointer_event() {
        let viewport = Viewport::new(345.0);
        let mut mounted = heatmap(false).mount(&viewport).unwrap();
        viewport.resize(645.0);
        mounted
            .handle(ViewEvent::PointerEnter { row: 0, col: 2 })
            .unwrap();
        let view = mounted.view();
        assert_eq!(view.dimensions.cell_width, 200.0);
        assert!(view.hover.is_hovering(0, 2));
    }

    #[test]
    fn test_resize_leaves_fixed_width_alone() {
        let viewport = Viewport::new(345.0);
        let mut mounted = heatmap(true).mount(&viewport).unwrap();
        viewport.resize(1000.0);
        mounted.handle(ViewEvent::Resize).unwrap();
        assert_eq!(mounted.view().dimensions.cell_width, 40.0);
    }

    #[test]
    fn test_hover_events_and_tooltip() {
        let viewport = Viewport::new(345.0);
        let mut mounted = heatmap(true).mount(&viewport).unwrap();
        assert_eq!(mounted.tooltip().unwrap(), None);

        mounted
            .handle(ViewEvent::PointerEnter { row: 0, col: 0 })
            .unwrap();
        mounted
            .handle(ViewEvent::PointerEnter { row: 1, col: 1 })
            .unwrap();
        assert_eq!(mounted.view().hover, HoverState::Hovering { row: 1, col: 1 });
        assert_eq!(
            mounted.tooltip().unwrap().unwrap().to_string(),
            "beta, y: no data"
        );

        mounted.handle(ViewEvent::PointerLeave).unwrap();
        assert_eq!(mounted.view().hover, HoverState::Idle);
    }

    #[test]
    fn test_hover_survives_resize() {
        let viewport = Viewport::new(345.0);
        let mut mounted = heatmap(false).mount(&viewport).unwrap();
        mounted
            .handle(ViewEvent::PointerEnter { row: 1, col: 2 })
            .unwrap();
        viewport.resize(500.0);
        mounted.handle(ViewEvent::Resize).unwrap();
        assert!(mounted.view().hover.is_hovering(1, 2));
    }

    #[test]
    fn test_enter_outside_grid_is_rejected() {
        let viewport = Viewport::new(345.0);
        let mut mounted = heatmap(true).mount(&viewport).unwrap();
        mounted
            .handle(ViewEvent::PointerEnter { row: 0, col: 1 })
            .unwrap();
        let err = mounted
            .handle(ViewEvent::PointerEnter { row: 0, col: 3 })
            .unwrap_err();
        assert!(matches!(err, GridError::CellOutOfRange { .. }));
        assert!(mounted.view().hover.is_hovering(0, 1));
    }

    #[test]
    fn test_tooltip_disabled() {
        let mut heatmap = heatmap(true);
        heatmap.show_tooltip = false;
        let mut view = ViewState::compute(&heatmap, &None::<f64>).unwrap();
        view.enter(&heatmap, 0, 0).unwrap();
        assert_eq!(view.tooltip(&heatmap).unwrap(), None);
    }
}
