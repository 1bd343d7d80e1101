/// Minimum inter-event gap that fires a replay timer (milliseconds).
/// Gaps below this are rendered immediately to avoid timer churn.
pub const MIN_TIMER_GAP_MS: u64 = 48;

/// Default sketchpad stroke width in pixels.
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// Opaque black, the fallback pen color.
pub const FALLBACK_PEN_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
