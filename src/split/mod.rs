//! Divider dragging for the side-by-side layout.
//!
//! The controller is idle until a pointer goes down on the divider. While
//! dragging, every pointer move yields a new split ratio clamped to
//! [`MIN_SPLIT_RATIO`]..=[`MAX_SPLIT_RATIO`]; pointer-up returns to idle.

/// Smallest editor share of the width, in percent.
pub const MIN_SPLIT_RATIO: f64 = 30.0;
/// Largest editor share of the width, in percent.
pub const MAX_SPLIT_RATIO: f64 = 70.0;
/// Editor share used when nothing else is known.
pub const DEFAULT_SPLIT_RATIO: f64 = 50.0;

/// Clamp a split ratio into the allowed range. Non-finite input falls back
/// to the default.
pub fn clamp_split_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        return DEFAULT_SPLIT_RATIO;
    }
    ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
}

/// Pointer input driving a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pointer<'a> {
    Mouse(f64),
    /// Horizontal positions of the active touch points.
    Touch(&'a [f64]),
}

impl Pointer<'_> {
    /// The x coordinate to track: the mouse position or the first touch.
    pub fn x(&self) -> Option<f64> {
        match self {
            Self::Mouse(x) => Some(*x),
            Self::Touch(points) => points.first().copied(),
        }
    }
}

/// Geometry captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_x: f64,
    pub container_width: f64,
    /// Divider offset from the container's left edge at drag start.
    pub start_offset: f64,
}

impl DragSession {
    /// Split ratio for a pointer at `x`.
    pub fn ratio_at(&self, x: f64) -> f64 {
        let delta = x - self.start_x;
        clamp_split_ratio((self.start_offset + delta) / self.container_width * 100.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SplitResizeController {
    state: DragState,
}

impl SplitResizeController {
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub const fn session(&self) -> Option<DragSession> {
        match self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Pointer went down on the divider. Returns false if a drag is already
    /// active or the input is unusable.
    pub fn begin(&mut self, pointer: Pointer<'_>, container_width: f64, current_ratio: f64) -> bool {
        if self.is_dragging() || container_width <= 0.0 {
            return false;
        }
        let Some(start_x) = pointer.x() else {
            return false;
        };
        self.state = DragState::Dragging(DragSession {
            start_x,
            container_width,
            start_offset: clamp_split_ratio(current_ratio) / 100.0 * container_width,
        });
        tracing::debug!(start_x, container_width, "split drag started");
        true
    }

    /// Pointer moved. Returns the new ratio while dragging.
    pub fn update(&self, pointer: Pointer<'_>) -> Option<f64> {
        let session = self.session()?;
        pointer.x().map(|x| session.ratio_at(x))
    }

    /// Pointer released. Returns true if a drag ended.
    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}
