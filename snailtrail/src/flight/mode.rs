//! Map display mode and transition tracking.
//!
//! The trail renders differently while the glider is thermalling:
//!
//! ```text
//! Circling: shorter trail, cruise legs hidden unless recent, wind drift applied
//! Cruise:   full trail, no drift, contest overlay allowed
//! ```

/// Display mode of the map, derived from the circling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Straight flight between thermals.
    #[default]
    Cruise,

    /// Thermalling.
    Circling,
}

impl DisplayMode {
    /// Map display mode for a circling flag.
    pub fn from_circling(circling: bool) -> Self {
        if circling {
            DisplayMode::Circling
        } else {
            DisplayMode::Cruise
        }
    }

    pub fn is_circling(&self) -> bool {
        matches!(self, DisplayMode::Circling)
    }

    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            DisplayMode::Cruise => "cruise flight",
            DisplayMode::Circling => "circling in lift",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Cruise => write!(f, "cruise"),
            DisplayMode::Circling => write!(f, "circling"),
        }
    }
}

/// Remembers the display mode seen on the previous frame.
///
/// Each map view owns one, so two views never share transition state.
#[derive(Debug, Default)]
pub struct DisplayModeTracker {
    last: Option<DisplayMode>,
}

impl DisplayModeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode seen on the previous call, if any.
    pub fn last(&self) -> Option<DisplayMode> {
        self.last
    }

    /// Record this frame's mode.
    ///
    /// Returns `true` if it differs from the previous frame. The first call
    /// always reports a change.
    pub fn update(&mut self, mode: DisplayMode) -> bool {
        let changed = self.last != Some(mode);
        if changed {
            if let Some(old) = self.last {
                tracing::info!(from = %old, to = %mode, "Display mode transition");
            }
            self.last = Some(mode);
        }
        changed
    }
}
