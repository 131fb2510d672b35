//! magnify_core - geometry and interaction engine for a zoomable image
//!
//! This crate computes everything a hover/long-press magnifier needs except
//! the drawing: which input modality is in use, whether magnification is
//! active, where the lens sits on the small image and how far the large
//! image is panned inside the enlarged viewport.

mod activation;
mod config;
mod constants;
mod dimension;
mod error;
mod event;
mod geometry;
mod hint;
mod image;
mod modality;
mod pan;
mod placement;
mod scheduler;

pub use activation::{
    reduce, ActivationContext, ActivationEvent, ActivationMachine, ActivationState,
    ActivationTimings, Phase, Transition,
};
pub use config::{MagnifyConfig, ValidatedConfig};
pub use constants::*;
pub use dimension::{
    resolve_container_dimension, ContainerDimension, ContainerDimensions, DimensionRequest,
};
pub use error::{ConfigError, Result};
pub use event::PointerEvent;
pub use geometry::{Dimension, NormalizedPosition, Point, Rectangle};
pub use hint::{Hint, HintConfig, HintState};
pub use image::{ImageDescriptor, ImageSize};
pub use modality::{InputModality, ModalityDetector, PointerCapability};
pub use pan::{compute_pan_geometry, lens_cursor_offset, PanGeometry};
pub use placement::{resolve_placement, should_show_lens, Placement};
pub use scheduler::{InstantScheduler, ManualScheduler, Scheduler, TimerCommand, TimerId, TimerKind};
