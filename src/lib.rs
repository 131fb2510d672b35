//! magnify - a hover/long-press zoomable image
//!
//! Wires the `magnify_core` engine into a widget the host drives with raw
//! pointer events, timer callbacks and layout notifications, and reads back
//! a [`RenderState`] to draw.

mod config;
mod error;
mod layout_observer;
mod replay;
mod widget;

pub use config::{AppConfig, CONFIG_VERSION, LogLevel};
pub use error::{MagnifyError, Result};
pub use layout_observer::{LayoutObserver, SharedLayout};
pub use replay::{ReplayFrame, TraceInput, TraceStep, load_trace, parse_trace, replay};
pub use widget::{ActivationSnapshot, Notification, RenderState, WidgetEvent, ZoomableImage};

// Re-export the engine types hosts need
pub use magnify_core::{
    ContainerDimension, ContainerDimensions, Dimension, ImageDescriptor, InputModality,
    InstantScheduler, MagnifyConfig, ManualScheduler, NormalizedPosition, PanGeometry, Placement,
    Point, PointerCapability, PointerEvent, Rectangle, Scheduler, TimerId,
};
