//! Activation state machine.
//!
//! Magnification turns on after a qualifying gesture and off again when the
//! gesture ends. The mouse grammar is hover-with-delay, the touch grammar is
//! a stationary long press. Transitions are computed by the pure [`reduce`]
//! function; [`ActivationMachine`] wraps it and forwards timer commands to a
//! [`Scheduler`].

use std::time::Duration;

use crate::constants::{
    DEFAULT_HOVER_DELAY_MS, DEFAULT_HOVER_OFF_DELAY_MS, DEFAULT_PRESS_DURATION_MS,
    DEFAULT_PRESS_MOVE_THRESHOLD,
};
use crate::event::PointerEvent;
use crate::geometry::{Dimension, NormalizedPosition, Point};
use crate::modality::InputModality;
use crate::scheduler::{Scheduler, TimerCommand, TimerId, TimerKind};

/// Timing and threshold parameters of both gesture grammars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationTimings {
    /// How long the mouse must hover before activating
    pub hover_delay: Duration,
    /// Grace period after the mouse leaves before deactivating
    pub hover_off_delay: Duration,
    /// How long a touch must be held before activating
    pub press_duration: Duration,
    /// Movement in pixels that turns a press into a scroll
    pub press_move_threshold: f32,
    /// Activate immediately on touch start, skipping the press gesture
    pub activate_on_touch: bool,
}

impl Default for ActivationTimings {
    fn default() -> Self {
        Self {
            hover_delay: Duration::from_millis(DEFAULT_HOVER_DELAY_MS),
            hover_off_delay: Duration::from_millis(DEFAULT_HOVER_OFF_DELAY_MS),
            press_duration: Duration::from_millis(DEFAULT_PRESS_DURATION_MS),
            press_move_threshold: DEFAULT_PRESS_MOVE_THRESHOLD,
            activate_on_touch: false,
        }
    }
}

/// Where the machine is in a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Nothing in progress
    Idle,
    /// Mouse is inside the box, waiting out the hover delay
    Hovering { timer: TimerId },
    /// Finger is down, waiting out the press duration
    Armed { origin: Point, timer: TimerId },
    /// Magnifying. `leaving` is the pending deactivation after the mouse
    /// left the box.
    Active { leaving: Option<TimerId> },
    /// Torn down; every further event is ignored
    Disposed,
}

impl Phase {
    fn pending_timer(&self) -> Option<TimerId> {
        match self {
            Phase::Hovering { timer } | Phase::Armed { timer, .. } => Some(*timer),
            Phase::Active { leaving } => *leaving,
            Phase::Idle | Phase::Disposed => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Hovering { .. } => "hovering",
            Phase::Armed { .. } => "armed",
            Phase::Active { leaving: None } => "active",
            Phase::Active { leaving: Some(_) } => "active (leaving)",
            Phase::Disposed => "disposed",
        }
    }
}

/// Full activation state. Owned by the machine, read-only elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationState {
    phase: Phase,
    modality: InputModality,
    last_position: NormalizedPosition,
    next_timer: u64,
}

impl ActivationState {
    /// A fresh, inactive state for the given modality.
    pub fn new(modality: InputModality) -> Self {
        Self {
            phase: Phase::Idle,
            modality,
            last_position: NormalizedPosition::ORIGIN,
            next_timer: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Which gesture grammar is in effect.
    pub fn modality(&self) -> InputModality {
        self.modality
    }

    /// Whether magnification is currently shown.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    pub fn is_disposed(&self) -> bool {
        self.phase == Phase::Disposed
    }

    /// Cursor position, only while active.
    pub fn position(&self) -> Option<NormalizedPosition> {
        self.is_active().then_some(self.last_position)
    }

    fn allocate_timer(&mut self) -> TimerId {
        let id = TimerId::new(self.next_timer);
        self.next_timer += 1;
        id
    }
}

/// Inputs to the reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationEvent {
    /// A raw pointer event from the tracker
    Pointer(PointerEvent),
    /// A previously scheduled timer elapsed
    TimerFired(TimerId),
    /// The modality detector switched grammars
    ModalityChanged(InputModality),
    /// The widget is being torn down
    Dispose,
}

/// Read-only context a transition is evaluated in.
#[derive(Debug, Clone, Copy)]
pub struct ActivationContext<'a> {
    pub timings: &'a ActivationTimings,
    /// Latest settled small-image size, used to normalize positions
    pub small_image: Dimension,
}

/// Result of one reducer step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ActivationState,
    pub commands: Vec<TimerCommand>,
}

impl Transition {
    fn unchanged(state: ActivationState) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }
}

/// Compute the next state for one event.
///
/// Events that make no sense in the current phase (a move before any enter,
/// a touch event under the mouse grammar, a stale timer) leave the state
/// untouched.
pub fn reduce(
    state: ActivationState,
    event: ActivationEvent,
    ctx: &ActivationContext<'_>,
) -> Transition {
    if state.is_disposed() {
        return Transition::unchanged(state);
    }

    match event {
        ActivationEvent::Dispose => {
            let mut state = state;
            let commands = cancel_pending(&state.phase);
            state.phase = Phase::Disposed;
            Transition { state, commands }
        }
        ActivationEvent::ModalityChanged(modality) => {
            if modality == state.modality {
                return Transition::unchanged(state);
            }
            let mut state = state;
            let commands = cancel_pending(&state.phase);
            state.phase = Phase::Idle;
            state.modality = modality;
            Transition { state, commands }
        }
        ActivationEvent::TimerFired(id) => on_timer(state, id),
        ActivationEvent::Pointer(pointer) => {
            if pointer.is_touch() != (state.modality == InputModality::Touch) {
                log::trace!(
                    "Activation: ignoring {:?} under {} grammar",
                    pointer,
                    state.modality.name()
                );
                return Transition::unchanged(state);
            }
            match state.modality {
                InputModality::Mouse => on_mouse(state, pointer, ctx),
                InputModality::Touch => on_touch(state, pointer, ctx),
            }
        }
    }
}

fn cancel_pending(phase: &Phase) -> Vec<TimerCommand> {
    phase
        .pending_timer()
        .map(|id| TimerCommand::Cancel { id })
        .into_iter()
        .collect()
}

fn on_timer(mut state: ActivationState, fired: TimerId) -> Transition {
    let next = match state.phase {
        Phase::Hovering { timer } | Phase::Armed { timer, .. } if timer == fired => {
            Phase::Active { leaving: None }
        }
        Phase::Active { leaving: Some(id) } if id == fired => Phase::Idle,
        _ => {
            log::trace!("Activation: stale timer {:?}", fired);
            return Transition::unchanged(state);
        }
    };
    state.phase = next;
    Transition::unchanged(state)
}

fn on_mouse(
    mut state: ActivationState,
    event: PointerEvent,
    ctx: &ActivationContext<'_>,
) -> Transition {
    let timings = ctx.timings;
    let mut commands = Vec::new();

    match (state.phase, event) {
        (Phase::Idle, PointerEvent::MouseEnter { position }) => {
            state.last_position = NormalizedPosition::from_point(position, ctx.small_image);
            if timings.hover_delay.is_zero() {
                state.phase = Phase::Active { leaving: None };
            } else {
                let timer = state.allocate_timer();
                commands.push(TimerCommand::Schedule {
                    id: timer,
                    kind: TimerKind::HoverDelay,
                    delay: timings.hover_delay,
                });
                state.phase = Phase::Hovering { timer };
            }
        }
        (
            Phase::Hovering { .. },
            PointerEvent::MouseEnter { position } | PointerEvent::MouseMove { position },
        ) => {
            state.last_position = NormalizedPosition::from_point(position, ctx.small_image);
        }
        (Phase::Hovering { timer }, PointerEvent::MouseLeave) => {
            commands.push(TimerCommand::Cancel { id: timer });
            state.phase = Phase::Idle;
        }
        (
            Phase::Active { leaving: None },
            PointerEvent::MouseEnter { position } | PointerEvent::MouseMove { position },
        ) => {
            state.last_position = NormalizedPosition::from_point(position, ctx.small_image);
        }
        (Phase::Active { leaving: None }, PointerEvent::MouseLeave) => {
            if timings.hover_off_delay.is_zero() {
                state.phase = Phase::Idle;
            } else {
                let id = state.allocate_timer();
                commands.push(TimerCommand::Schedule {
                    id,
                    kind: TimerKind::HoverOffDelay,
                    delay: timings.hover_off_delay,
                });
                state.phase = Phase::Active { leaving: Some(id) };
            }
        }
        (Phase::Active { leaving: Some(id) }, PointerEvent::MouseEnter { position }) => {
            commands.push(TimerCommand::Cancel { id });
            state.last_position = NormalizedPosition::from_point(position, ctx.small_image);
            state.phase = Phase::Active { leaving: None };
        }
        (phase, event) => log_ignored(phase, event),
    }

    Transition { state, commands }
}

fn on_touch(
    mut state: ActivationState,
    event: PointerEvent,
    ctx: &ActivationContext<'_>,
) -> Transition {
    let timings = ctx.timings;
    let mut commands = Vec::new();

    match (state.phase, event) {
        (Phase::Idle, PointerEvent::TouchStart { position }) => {
            state.last_position = NormalizedPosition::from_point(position, ctx.small_image);
            if timings.activate_on_touch || timings.press_duration.is_zero() {
                state.phase = Phase::Active { leaving: None };
            } else {
                let timer = state.allocate_timer();
                commands.push(TimerCommand::Schedule {
                    id: timer,
                    kind: TimerKind::PressDuration,
                    delay: timings.press_duration,
                });
                state.phase = Phase::Armed {
                    origin: position,
                    timer,
                };
            }
        }
        (Phase::Armed { origin, timer }, PointerEvent::TouchMove { position }) => {
            if origin.distance(position) >= timings.press_move_threshold {
                log::debug!("Activation: press moved past threshold, treating as scroll");
                commands.push(TimerCommand::Cancel { id: timer });
                state.phase = Phase::Idle;
            } else {
                state.last_position = NormalizedPosition::from_point(position, ctx.small_image);
            }
        }
        (Phase::Armed { timer, .. }, PointerEvent::TouchEnd | PointerEvent::TouchCancel) => {
            commands.push(TimerCommand::Cancel { id: timer });
            state.phase = Phase::Idle;
        }
        (Phase::Active { .. }, PointerEvent::TouchMove { position }) => {
            state.last_position = NormalizedPosition::from_point(position, ctx.small_image);
        }
        (Phase::Active { .. }, PointerEvent::TouchEnd | PointerEvent::TouchCancel) => {
            state.phase = Phase::Idle;
        }
        (phase, event) => log_ignored(phase, event),
    }

    Transition { state, commands }
}

fn log_ignored(phase: Phase, event: PointerEvent) {
    match (phase, event) {
        // Tail of a press that turned into a scroll, or a pointer passing by
        (Phase::Idle, PointerEvent::MouseMove { .. } | PointerEvent::TouchMove { .. }) => {
            log::trace!("Activation: ignoring {:?} while idle", event);
        }
        (Phase::Idle, PointerEvent::TouchEnd | PointerEvent::TouchCancel) => {
            log::trace!("Activation: ignoring {:?} while idle", event);
        }
        _ => {
            log::warn!("Activation: unexpected {:?} while {}", event, phase.name());
        }
    }
}

/// Stateful wrapper around [`reduce`] that applies timer commands.
#[derive(Debug, Clone)]
pub struct ActivationMachine {
    state: ActivationState,
    timings: ActivationTimings,
}

impl ActivationMachine {
    pub fn new(timings: ActivationTimings, modality: InputModality) -> Self {
        Self {
            state: ActivationState::new(modality),
            timings,
        }
    }

    pub fn state(&self) -> &ActivationState {
        &self.state
    }

    pub fn timings(&self) -> &ActivationTimings {
        &self.timings
    }

    /// Feed one event. Returns true if `is_active` flipped.
    pub fn handle<S: Scheduler>(
        &mut self,
        event: ActivationEvent,
        small_image: Dimension,
        scheduler: &mut S,
    ) -> bool {
        let was_active = self.state.is_active();
        let before = self.state.phase;

        let ctx = ActivationContext {
            timings: &self.timings,
            small_image,
        };
        let Transition { state, commands } = reduce(self.state.clone(), event, &ctx);
        self.state = state;

        for command in commands {
            scheduler.apply(command);
        }

        if before != self.state.phase {
            log::debug!(
                "Activation: {} -> {}",
                before.name(),
                self.state.phase.name()
            );
        }
        if let Some(position) = self.state.position() {
            log::trace!(
                "Activation: position ({:.3}, {:.3})",
                position.x(),
                position.y()
            );
        }

        was_active != self.state.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::scheduler::ManualScheduler;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn box_size() -> Dimension {
        Dimension::new(200.0, 100.0)
    }

    struct Harness {
        machine: ActivationMachine,
        scheduler: ManualScheduler,
        activations: usize,
        deactivations: usize,
    }

    impl Harness {
        fn new(modality: InputModality) -> Self {
            Self::with_timings(ActivationTimings::default(), modality)
        }

        fn with_timings(timings: ActivationTimings, modality: InputModality) -> Self {
            Self {
                machine: ActivationMachine::new(timings, modality),
                scheduler: ManualScheduler::new(),
                activations: 0,
                deactivations: 0,
            }
        }

        fn send(&mut self, event: ActivationEvent) {
            if self.machine.handle(event, box_size(), &mut self.scheduler) {
                if self.machine.state().is_active() {
                    self.activations += 1;
                } else {
                    self.deactivations += 1;
                }
            }
        }

        fn pointer(&mut self, event: PointerEvent) {
            self.send(ActivationEvent::Pointer(event));
        }

        fn wait(&mut self, millis: u64) {
            for id in self.scheduler.advance(ms(millis)) {
                self.send(ActivationEvent::TimerFired(id));
            }
        }

        fn is_active(&self) -> bool {
            self.machine.state().is_active()
        }
    }

    fn enter(x: f32, y: f32) -> PointerEvent {
        PointerEvent::MouseEnter {
            position: Point::new(x, y),
        }
    }

    fn mouse_move(x: f32, y: f32) -> PointerEvent {
        PointerEvent::MouseMove {
            position: Point::new(x, y),
        }
    }

    fn touch_start(x: f32, y: f32) -> PointerEvent {
        PointerEvent::TouchStart {
            position: Point::new(x, y),
        }
    }

    fn touch_move(x: f32, y: f32) -> PointerEvent {
        PointerEvent::TouchMove {
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = ActivationState::new(InputModality::Mouse);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.is_active());
        assert_eq!(state.position(), None);
    }

    #[test]
    fn test_hover_activates_after_delay_exactly_once() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(100.0, 50.0));
        h.wait(249);
        assert!(!h.is_active());
        h.wait(1);
        assert!(h.is_active());

        // Sustained hover does not re-activate
        for i in 0..20 {
            h.pointer(mouse_move(100.0 + i as f32, 50.0));
            h.wait(100);
        }
        assert_eq!(h.activations, 1);
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_leave_before_hover_delay_cancels() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(10.0, 10.0));
        h.wait(100);
        h.pointer(PointerEvent::MouseLeave);
        assert_eq!(h.scheduler.pending(), 0);
        h.wait(1000);
        assert!(!h.is_active());
        assert_eq!(h.activations, 0);
    }

    #[test]
    fn test_reentry_within_grace_period_keeps_active() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(10.0, 10.0));
        h.wait(250);
        assert!(h.is_active());

        h.pointer(PointerEvent::MouseLeave);
        h.wait(100);
        assert!(h.is_active());
        h.pointer(enter(20.0, 20.0));
        h.wait(1000);

        assert!(h.is_active());
        assert_eq!(h.deactivations, 0);
        assert_eq!(h.activations, 1);
    }

    #[test]
    fn test_rapid_enter_leave_cycling_within_grace() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(10.0, 10.0));
        h.wait(250);

        for _ in 0..5 {
            h.pointer(PointerEvent::MouseLeave);
            h.wait(50);
            h.pointer(enter(10.0, 10.0));
            h.wait(50);
        }
        assert!(h.is_active());
        assert_eq!(h.scheduler.pending(), 0);
        assert_eq!(h.deactivations, 0);
    }

    #[test]
    fn test_leave_past_grace_deactivates() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(10.0, 10.0));
        h.wait(250);
        h.pointer(PointerEvent::MouseLeave);
        h.wait(150);
        assert!(!h.is_active());
        assert_eq!(h.deactivations, 1);
        assert_eq!(h.machine.state().position(), None);
    }

    #[test]
    fn test_position_is_normalized_and_clamped() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(50.0, 25.0));
        h.wait(250);
        let position = h.machine.state().position();
        assert_eq!(position, Some(NormalizedPosition::new(0.25, 0.25)));

        h.pointer(mouse_move(260.0, -5.0));
        let position = h.machine.state().position();
        assert_eq!(position, Some(NormalizedPosition::new(1.0, 0.0)));
    }

    #[test]
    fn test_move_without_enter_is_ignored() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(mouse_move(10.0, 10.0));
        h.pointer(PointerEvent::MouseLeave);
        assert_eq!(h.machine.state().phase(), Phase::Idle);
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_zero_hover_delay_activates_synchronously() {
        let timings = ActivationTimings {
            hover_delay: Duration::ZERO,
            hover_off_delay: Duration::ZERO,
            ..ActivationTimings::default()
        };
        let mut h = Harness::with_timings(timings, InputModality::Mouse);
        h.pointer(enter(10.0, 10.0));
        assert!(h.is_active());
        h.pointer(PointerEvent::MouseLeave);
        assert!(!h.is_active());
    }

    #[test]
    fn test_stationary_press_activates() {
        let mut h = Harness::new(InputModality::Touch);
        h.pointer(touch_start(100.0, 50.0));
        assert!(h.machine.state().phase().pending_timer().is_some());
        h.pointer(touch_move(102.0, 51.0));
        h.wait(500);
        assert!(h.is_active());
        let position = h.machine.state().position();
        assert_eq!(position, Some(NormalizedPosition::new(0.51, 0.51)));
    }

    #[test]
    fn test_press_moving_past_threshold_never_activates() {
        let mut h = Harness::new(InputModality::Touch);
        h.pointer(touch_start(100.0, 50.0));
        h.wait(200);
        h.pointer(touch_move(105.0, 50.0));
        assert_eq!(h.machine.state().phase(), Phase::Idle);
        h.wait(1000);
        assert!(!h.is_active());
        assert_eq!(h.activations, 0);
    }

    #[test]
    fn test_scroll_tail_is_ignored() {
        let mut h = Harness::new(InputModality::Touch);
        h.pointer(touch_start(100.0, 50.0));
        h.pointer(touch_move(100.0, 80.0));
        h.pointer(touch_move(100.0, 95.0));
        h.pointer(PointerEvent::TouchEnd);
        assert_eq!(h.machine.state().phase(), Phase::Idle);
        assert_eq!(h.scheduler.pending(), 0);

        // A fresh press still works afterwards
        h.pointer(touch_start(10.0, 10.0));
        h.wait(500);
        assert!(h.is_active());
        assert_eq!(h.activations, 1);
    }

    #[test]
    fn test_release_before_press_duration_cancels() {
        let mut h = Harness::new(InputModality::Touch);
        h.pointer(touch_start(10.0, 10.0));
        h.wait(300);
        h.pointer(PointerEvent::TouchEnd);
        h.wait(1000);
        assert!(!h.is_active());
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_touch_end_and_cancel_deactivate() {
        for end in [PointerEvent::TouchEnd, PointerEvent::TouchCancel] {
            let mut h = Harness::new(InputModality::Touch);
            h.pointer(touch_start(10.0, 10.0));
            h.wait(500);
            assert!(h.is_active());
            // Moving freely once active
            h.pointer(touch_move(150.0, 90.0));
            assert!(h.is_active());
            h.pointer(end);
            assert!(!h.is_active());
        }
    }

    #[test]
    fn test_activate_on_touch_skips_press() {
        let timings = ActivationTimings {
            activate_on_touch: true,
            ..ActivationTimings::default()
        };
        let mut h = Harness::with_timings(timings, InputModality::Touch);
        h.pointer(touch_start(10.0, 10.0));
        assert!(h.is_active());
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_other_grammar_is_ignored() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(touch_start(10.0, 10.0));
        assert_eq!(h.machine.state().phase(), Phase::Idle);

        let mut h = Harness::new(InputModality::Touch);
        h.pointer(enter(10.0, 10.0));
        assert_eq!(h.machine.state().phase(), Phase::Idle);
    }

    #[test]
    fn test_modality_change_resets_and_cancels() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(10.0, 10.0));
        h.send(ActivationEvent::ModalityChanged(InputModality::Touch));
        assert_eq!(h.machine.state().phase(), Phase::Idle);
        assert_eq!(h.machine.state().modality(), InputModality::Touch);
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let state = ActivationState::new(InputModality::Mouse);
        let timings = ActivationTimings::default();
        let ctx = ActivationContext {
            timings: &timings,
            small_image: box_size(),
        };
        let fired = ActivationEvent::TimerFired(TimerId::new(99));
        let t = reduce(state.clone(), fired, &ctx);
        assert_eq!(t.state, state);
        assert!(t.commands.is_empty());
    }

    #[test]
    fn test_reduce_is_pure() {
        let timings = ActivationTimings::default();
        let ctx = ActivationContext {
            timings: &timings,
            small_image: box_size(),
        };
        let state = ActivationState::new(InputModality::Mouse);
        let event = ActivationEvent::Pointer(enter(1.0, 1.0));
        let a = reduce(state.clone(), event, &ctx);
        let b = reduce(state, event, &ctx);
        assert_eq!(a, b);
        assert_eq!(a.commands.len(), 1);
    }

    #[test]
    fn test_dispose_cancels_and_freezes() {
        let mut h = Harness::new(InputModality::Mouse);
        h.pointer(enter(10.0, 10.0));
        h.send(ActivationEvent::Dispose);
        assert_eq!(h.scheduler.pending(), 0);

        h.wait(1000);
        h.pointer(enter(10.0, 10.0));
        h.send(ActivationEvent::TimerFired(TimerId::new(1)));
        assert!(h.machine.state().is_disposed());
        assert_eq!(h.activations, 0);
    }

    #[test]
    fn test_dispose_while_active_deactivates() {
        let mut h = Harness::new(InputModality::Touch);
        h.pointer(touch_start(10.0, 10.0));
        h.wait(500);
        assert!(h.is_active());
        h.send(ActivationEvent::Dispose);
        assert!(!h.is_active());
    }
}
