//! The zoomable image widget.
//!
//! `ZoomableImage` owns the engine pieces and exposes a single
//! [`ZoomableImage::handle`] entry point. Events are processed strictly in
//! arrival order: the modality detector sees a pointer event first, then
//! the activation machine, so every event observes the settled result of
//! the previous one.

use magnify_core::{
    ActivationEvent, ActivationMachine, Dimension, Hint, HintState, ImageSize, InputModality,
    MagnifyConfig, ModalityDetector, NormalizedPosition, PanGeometry, Placement, Point,
    PointerCapability, PointerEvent, Scheduler, TimerId, ValidatedConfig, compute_pan_geometry,
    lens_cursor_offset, resolve_placement, should_show_lens,
};
use serde::Serialize;

use crate::error::Result;
use crate::layout_observer::LayoutObserver;

/// Inputs the host feeds to the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    /// Raw pointer input over the small image
    Pointer(PointerEvent),
    /// A timer scheduled by the widget elapsed
    TimerFired(TimerId),
    /// The small image finished loading
    SmallImageLoaded,
    /// The host's layout changed (window resize, reflow)
    LayoutChanged,
}

/// Changes caused by one event, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    ActivationChanged { is_active: bool },
    ModalityChanged { modality: InputModality },
    SmallImageResized { width: f32, height: f32 },
}

/// Activation as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivationSnapshot {
    pub is_active: bool,
    pub position: Option<NormalizedPosition>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub activation: ActivationSnapshot,
    pub modality: InputModality,
    pub placement: Placement,
    pub small_image: Dimension,
    /// Size of the enlarged viewport
    pub viewport: Dimension,
    /// Lens and pan offset; `None` while inactive
    pub geometry: Option<PanGeometry>,
    pub show_lens: bool,
    pub lens_cursor_offset: Point,
    pub hint: Hint,
    pub fade_duration_ms: u64,
}

/// A mounted zoomable image.
pub struct ZoomableImage<S: Scheduler, O: LayoutObserver> {
    config: ValidatedConfig,
    detector: ModalityDetector,
    activation: ActivationMachine,
    hint: HintState,
    small_image: Dimension,
    scheduler: S,
    observer: O,
    subscribed: bool,
    disposed: bool,
}

impl<S: Scheduler, O: LayoutObserver> ZoomableImage<S, O> {
    /// Validate the configuration and mount the widget.
    ///
    /// The pointer capability is queried once here. A fluid small image is
    /// measured immediately and the layout observer is subscribed.
    pub fn mount(
        config: &MagnifyConfig,
        capability: PointerCapability,
        scheduler: S,
        observer: O,
    ) -> Result<Self> {
        let config = config.validate()?;
        let detector = ModalityDetector::new(capability);
        let activation = ActivationMachine::new(config.timings, detector.current());

        let mut widget = Self {
            small_image: match config.small_image {
                ImageSize::Fixed(dimension) => dimension,
                ImageSize::Fluid => Dimension::ZERO,
            },
            config,
            detector,
            activation,
            hint: HintState::new(),
            scheduler,
            observer,
            subscribed: false,
            disposed: false,
        };

        if widget.config.is_fluid() {
            widget.small_image = widget.observer.measure();
            widget.observer.subscribe();
            widget.subscribed = true;
        }

        log::debug!(
            "Mounted zoomable image: small {}x{}, large {}x{}, modality {}",
            widget.small_image.width,
            widget.small_image.height,
            widget.config.large_image.width,
            widget.config.large_image.height,
            widget.detector.current().name()
        );

        Ok(widget)
    }

    /// Process one event and report what changed.
    pub fn handle(&mut self, event: WidgetEvent) -> Vec<Notification> {
        let mut notifications = Vec::new();
        if self.disposed {
            log::trace!("Ignoring {:?} after dispose", event);
            return notifications;
        }

        match event {
            WidgetEvent::Pointer(pointer) => {
                let placement = self.placement();
                if let Some(modality) = self.detector.observe(&pointer) {
                    notifications.push(Notification::ModalityChanged { modality });
                    let event = ActivationEvent::ModalityChanged(modality);
                    self.send(event, &mut notifications);

                    let next = self.placement();
                    if next != placement {
                        log::debug!("Placement: {} -> {}", placement.name(), next.name());
                    }
                }
                self.send(ActivationEvent::Pointer(pointer), &mut notifications);
            }
            WidgetEvent::TimerFired(id) => {
                self.send(ActivationEvent::TimerFired(id), &mut notifications);
            }
            WidgetEvent::SmallImageLoaded | WidgetEvent::LayoutChanged => {
                self.remeasure(&mut notifications);
            }
        }

        notifications
    }

    fn send(&mut self, event: ActivationEvent, notifications: &mut Vec<Notification>) {
        let size = self.small_image;
        if self.activation.handle(event, size, &mut self.scheduler) {
            let is_active = self.activation.state().is_active();
            self.hint.observe(is_active);
            notifications.push(Notification::ActivationChanged { is_active });
        }
    }

    fn remeasure(&mut self, notifications: &mut Vec<Notification>) {
        if !self.config.is_fluid() {
            return;
        }
        let measured = self.observer.measure();
        if measured != self.small_image {
            log::debug!(
                "Small image resized to {}x{}",
                measured.width,
                measured.height
            );
            self.small_image = measured;
            notifications.push(Notification::SmallImageResized {
                width: measured.width,
                height: measured.height,
            });
        }
    }

    /// Tear down: cancel every pending timer and stop observing layout.
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let mut ignored = Vec::new();
        self.send(ActivationEvent::Dispose, &mut ignored);
        self.scheduler.cancel_all();
        if self.subscribed {
            self.observer.unsubscribe();
            self.subscribed = false;
        }
        self.disposed = true;
        log::debug!("Disposed zoomable image");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn modality(&self) -> InputModality {
        self.detector.current()
    }

    pub fn is_active(&self) -> bool {
        self.activation.state().is_active()
    }

    /// Latest settled small-image size.
    pub fn small_image(&self) -> Dimension {
        self.small_image
    }

    pub fn placement(&self) -> Placement {
        resolve_placement(self.config.placement_override, self.detector.current())
    }

    /// Enlarged viewport for the current placement and small-image size.
    pub fn viewport(&self) -> Dimension {
        let placement = self.placement();
        self.config.container.resolve(self.small_image, placement)
    }

    pub fn show_lens(&self) -> bool {
        should_show_lens(self.placement(), self.detector.current())
    }

    /// Lens and pan offset for the current cursor position, if active.
    pub fn geometry(&self) -> Option<PanGeometry> {
        let position = self.activation.state().position()?;
        Some(compute_pan_geometry(
            position,
            self.small_image,
            self.config.large_image,
            self.viewport(),
            self.placement(),
        ))
    }

    /// Snapshot everything the renderer needs.
    pub fn render_state(&self) -> RenderState {
        let state = self.activation.state();
        let modality = self.detector.current();
        RenderState {
            activation: ActivationSnapshot {
                is_active: state.is_active(),
                position: state.position(),
            },
            modality,
            placement: self.placement(),
            small_image: self.small_image,
            viewport: self.viewport(),
            geometry: self.geometry(),
            show_lens: self.show_lens(),
            lens_cursor_offset: lens_cursor_offset(
                self.small_image,
                self.config.large_image,
                self.viewport(),
            ),
            hint: self.hint.hint(&self.config.hint, state.is_active(), modality),
            fade_duration_ms: self.config.fade_duration.as_millis() as u64,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Access the scheduler, e.g. to advance a virtual clock.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: Scheduler, O: LayoutObserver> Drop for ZoomableImage<S, O> {
    fn drop(&mut self) {
        self.dispose();
    }
}
