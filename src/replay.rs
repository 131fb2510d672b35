//! Replay of recorded pointer traces.
//!
//! A trace is a JSON array of timestamped steps. Replaying drives a
//! [`ManualScheduler`] to each step's timestamp, delivers any timers that
//! fell due on the way (each at its own deadline), applies the step and
//! captures the render state.

use std::path::Path;
use std::time::Duration;

use magnify_core::{
    Dimension, MagnifyConfig, ManualScheduler, Point, PointerCapability, PointerEvent,
};
use serde::{Deserialize, Serialize};

use crate::error::{MagnifyError, Result};
use crate::layout_observer::SharedLayout;
use crate::widget::{Notification, RenderState, WidgetEvent, ZoomableImage};

/// One host input in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceInput {
    MouseEnter { x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    MouseLeave,
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd,
    TouchCancel,
    /// The small image's rendered box changed size
    Layout { width: f32, height: f32 },
    /// The small image finished loading
    ImageLoaded,
    /// The widget is unmounted
    Dispose,
}

impl TraceInput {
    fn pointer(&self) -> Option<PointerEvent> {
        let event = match *self {
            TraceInput::MouseEnter { x, y } => PointerEvent::MouseEnter {
                position: Point::new(x, y),
            },
            TraceInput::MouseMove { x, y } => PointerEvent::MouseMove {
                position: Point::new(x, y),
            },
            TraceInput::MouseLeave => PointerEvent::MouseLeave,
            TraceInput::TouchStart { x, y } => PointerEvent::TouchStart {
                position: Point::new(x, y),
            },
            TraceInput::TouchMove { x, y } => PointerEvent::TouchMove {
                position: Point::new(x, y),
            },
            TraceInput::TouchEnd => PointerEvent::TouchEnd,
            TraceInput::TouchCancel => PointerEvent::TouchCancel,
            _ => return None,
        };
        Some(event)
    }
}

type ReplayWidget = ZoomableImage<ManualScheduler, SharedLayout>;

/// A timestamped trace step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Milliseconds since the widget was mounted
    pub at_ms: u64,
    #[serde(flatten)]
    pub input: TraceInput,
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayFrame {
    pub at_ms: u64,
    pub input: TraceInput,
    /// Changes caused by timers that fired before the step and by the step
    pub notifications: Vec<Notification>,
    pub state: RenderState,
}

/// Parse a trace from JSON.
pub fn parse_trace(json: &str) -> Result<Vec<TraceStep>> {
    let steps: Vec<TraceStep> = serde_json::from_str(json)?;
    for (index, pair) in steps.windows(2).enumerate() {
        if pair[1].at_ms < pair[0].at_ms {
            return Err(MagnifyError::TraceOutOfOrder {
                index: index + 1,
                at_ms: pair[1].at_ms,
            });
        }
    }
    Ok(steps)
}

/// Read and parse a trace file.
pub fn load_trace(path: &Path) -> Result<Vec<TraceStep>> {
    let json = std::fs::read_to_string(path).map_err(|e| MagnifyError::read(path, e))?;
    parse_trace(&json)
}

/// Replay a trace against a configuration.
///
/// `initial_layout` is what the layout observer reports at mount; it only
/// matters for fluid small images.
pub fn replay(
    config: &MagnifyConfig,
    capability: PointerCapability,
    initial_layout: Dimension,
    steps: &[TraceStep],
) -> Result<Vec<ReplayFrame>> {
    let layout = SharedLayout::new(initial_layout);
    let scheduler = ManualScheduler::new();
    let mut widget = ZoomableImage::mount(config, capability, scheduler, layout.clone())?;
    let mut frames = Vec::with_capacity(steps.len());

    for step in steps {
        let at = Duration::from_millis(step.at_ms);
        let mut notifications = fire_due_timers(&mut widget, at);

        if let Some(pointer) = step.input.pointer() {
            notifications.extend(widget.handle(WidgetEvent::Pointer(pointer)));
        } else {
            match step.input {
                TraceInput::Layout { width, height } => {
                    layout.set(Dimension::new(width, height));
                    notifications.extend(widget.handle(WidgetEvent::LayoutChanged));
                }
                TraceInput::ImageLoaded => {
                    notifications.extend(widget.handle(WidgetEvent::SmallImageLoaded));
                }
                TraceInput::Dispose => widget.dispose(),
                _ => {}
            }
        }

        log::trace!(
            "Replay: {}ms {:?} -> {:?}",
            step.at_ms,
            step.input,
            notifications
        );
        frames.push(ReplayFrame {
            at_ms: step.at_ms,
            input: step.input,
            notifications,
            state: widget.render_state(),
        });
    }

    Ok(frames)
}

fn fire_due_timers(widget: &mut ReplayWidget, until: Duration) -> Vec<Notification> {
    let mut notifications = Vec::new();
    while let Some(deadline) = widget.scheduler().next_deadline() {
        if deadline > until {
            break;
        }
        for id in widget.scheduler_mut().advance_to(deadline) {
            notifications.extend(widget.handle(WidgetEvent::TimerFired(id)));
        }
    }
    widget.scheduler_mut().advance_to(until);
    notifications
}

#[cfg(test)]
mod tests {
    use magnify_core::{ImageDescriptor, Placement};

    use super::*;

    use crate::config::AppConfig;

    fn watch_config() -> MagnifyConfig {
        MagnifyConfig::new(
            ImageDescriptor::fixed("watch_300.jpg", 300.0, 450.0),
            ImageDescriptor::fixed("watch_1200.jpg", 1200.0, 1800.0),
        )
    }

    fn step(at_ms: u64, input: TraceInput) -> TraceStep {
        TraceStep { at_ms, input }
    }

    fn run(config: &MagnifyConfig, steps: &[TraceStep]) -> Vec<ReplayFrame> {
        let mouse = PointerCapability::mouse();
        replay(config, mouse, Dimension::ZERO, steps).unwrap()
    }

    fn activation(is_active: bool) -> Notification {
        Notification::ActivationChanged { is_active }
    }

    #[test]
    fn test_parse_trace() {
        let json = r#"[
            {"at_ms": 0, "type": "mouse_enter", "x": 10, "y": 20},
            {"at_ms": 100, "type": "mouse_leave"},
            {"at_ms": 150, "type": "layout", "width": 200, "height": 300}
        ]"#;
        let steps = parse_trace(json).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].input, TraceInput::MouseEnter { x: 10.0, y: 20.0 });

        let layout = TraceInput::Layout {
            width: 200.0,
            height: 300.0,
        };
        assert_eq!(steps[2].input, layout);
    }

    #[test]
    fn test_out_of_order_trace_rejected() {
        let json = r#"[
            {"at_ms": 100, "type": "mouse_leave"},
            {"at_ms": 50, "type": "mouse_leave"}
        ]"#;
        let error = parse_trace(json).unwrap_err();
        match error {
            MagnifyError::TraceOutOfOrder { index, at_ms } => {
                assert_eq!(index, 1);
                assert_eq!(at_ms, 50);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_replay_hover_session() {
        let steps = [
            step(0, TraceInput::MouseEnter { x: 150.0, y: 225.0 }),
            step(300, TraceInput::MouseMove { x: 300.0, y: 450.0 }),
            step(400, TraceInput::MouseLeave),
            step(600, TraceInput::MouseMove { x: 0.0, y: 0.0 }),
        ];
        let frames = run(&watch_config(), &steps);

        assert!(!frames[0].state.activation.is_active);
        // Hover delay elapsed at 250ms, reported with the next step
        assert_eq!(frames[1].notifications, vec![activation(true)]);
        let geometry = frames[1].state.geometry.unwrap();
        assert_eq!(geometry.large_image_offset, Point::new(900.0, 1350.0));

        // Still active during the grace period
        assert!(frames[2].state.activation.is_active);
        assert_eq!(frames[3].notifications, vec![activation(false)]);
        assert_eq!(frames[3].state.placement, Placement::Beside);
    }

    #[test]
    fn test_demo_trace_replays() {
        let json = include_str!("../demos/watch.json");
        let config = AppConfig::from_json(json).unwrap();
        let steps = parse_trace(include_str!("../demos/hover_trace.json"));
        let steps = steps.unwrap();
        let frames = run(&config.magnifier, &steps);

        let activations: Vec<bool> = frames
            .iter()
            .flat_map(|frame| frame.notifications.iter())
            .filter_map(|note| match note {
                Notification::ActivationChanged { is_active } => Some(*is_active),
                _ => None,
            })
            .collect();
        assert_eq!(activations, vec![true, false, true, false]);

        // Viewport is 120% x 100% of the small image while beside
        assert_eq!(frames[2].state.viewport, Dimension::new(360.0, 450.0));
        // Touch switched the layout to an overlay
        assert_eq!(frames[9].state.placement, Placement::Over);
        assert!(!frames[9].state.show_lens);
    }

    #[test]
    fn test_replay_dispose_stops_everything() {
        let steps = [
            step(0, TraceInput::MouseEnter { x: 10.0, y: 10.0 }),
            step(100, TraceInput::Dispose),
            step(1000, TraceInput::MouseEnter { x: 10.0, y: 10.0 }),
        ];
        let frames = run(&watch_config(), &steps);
        assert!(frames[2].notifications.is_empty());
        assert!(!frames[2].state.activation.is_active);
    }
}
