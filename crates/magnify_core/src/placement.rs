//! Layout policy: where the enlarged view goes and whether a lens is drawn.

use serde::{Deserialize, Serialize};

use crate::modality::InputModality;

/// Where the enlarged viewport is rendered relative to the small image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// In a separate panel next to the small image
    Beside,
    /// On top of the small image, covering it
    Over,
}

impl Placement {
    /// Get the display name for this placement.
    pub fn name(&self) -> &'static str {
        match self {
            Placement::Beside => "beside",
            Placement::Over => "over",
        }
    }
}

/// Pick the placement: an explicit override always wins, otherwise touch
/// goes over the image and mouse goes beside it.
pub fn resolve_placement(explicit: Option<Placement>, modality: InputModality) -> Placement {
    explicit.unwrap_or(match modality {
        InputModality::Touch => Placement::Over,
        InputModality::Mouse => Placement::Beside,
    })
}

/// The lens is only meaningful when the enlarged view sits beside the
/// image and the pointer can hover.
pub fn should_show_lens(placement: Placement, modality: InputModality) -> bool {
    placement == Placement::Beside && modality != InputModality::Touch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_modality() {
        let over = resolve_placement(Some(Placement::Over), InputModality::Mouse);
        assert_eq!(over, Placement::Over);
        let beside = resolve_placement(Some(Placement::Beside), InputModality::Touch);
        assert_eq!(beside, Placement::Beside);
    }

    #[test]
    fn test_touch_defaults_to_over_without_lens() {
        let placement = resolve_placement(None, InputModality::Touch);
        assert_eq!(placement, Placement::Over);
        assert!(!should_show_lens(placement, InputModality::Touch));
    }

    #[test]
    fn test_mouse_defaults_to_beside_with_lens() {
        let placement = resolve_placement(None, InputModality::Mouse);
        assert_eq!(placement, Placement::Beside);
        assert!(should_show_lens(placement, InputModality::Mouse));
    }

    #[test]
    fn test_forced_beside_on_touch_hides_lens() {
        assert!(!should_show_lens(Placement::Beside, InputModality::Touch));
    }
}
