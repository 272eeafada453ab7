//! Scroll triggers: map a document scroll offset onto 0..=1 progress across
//! an element's span, and decide where a pinned element sits for a given
//! offset.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    fn offset(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Bottom => extent,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub element: Edge,
    pub viewport: Edge,
}

impl Anchor {
    pub const TOP_TOP: Self = Self {
        element: Edge::Top,
        viewport: Edge::Top,
    };
    pub const BOTTOM_TOP: Self = Self {
        element: Edge::Bottom,
        viewport: Edge::Top,
    };

    fn scroll_offset(self, element_top: f64, element_height: f64, viewport_height: f64) -> f64 {
        element_top + self.element.offset(element_height) - self.viewport.offset(viewport_height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pin {
    Off,
    Pinned { spacing: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSpec {
    pub start: Anchor,
    pub end: Anchor,
    pub pin: Pin,
    pub scrub: bool,
}

impl TriggerSpec {
    pub const fn full_height_pin() -> Self {
        Self {
            start: Anchor::TOP_TOP,
            end: Anchor::BOTTOM_TOP,
            pin: Pin::Pinned { spacing: false },
            scrub: true,
        }
    }

    pub fn resolve(&self, element_top: f64, element_height: f64, viewport_height: f64) -> ScrollRange {
        let start = self
            .start
            .scroll_offset(element_top, element_height, viewport_height);
        let end = self
            .end
            .scroll_offset(element_top, element_height, viewport_height);

        ScrollRange {
            start,
            end: end.max(start),
            pin: self.pin,
            scrub: self.scrub,
        }
    }
}

/// In document scroll pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRange {
    pub start: f64,
    pub end: f64,
    pin: Pin,
    scrub: bool,
}

impl ScrollRange {
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    pub fn contains(&self, scroll_y: f64) -> bool {
        scroll_y >= self.start && scroll_y <= self.end
    }

    pub fn progress(&self, scroll_y: f64) -> f64 {
        if self.is_empty() {
            return if scroll_y < self.start { 0.0 } else { 1.0 };
        }

        ((scroll_y - self.start) / self.len()).clamp(0.0, 1.0)
    }

    /// Progress that drives bound tweens: continuous when scrubbing, otherwise
    /// a step at the start offset.
    pub fn driven_progress(&self, scroll_y: f64) -> f64 {
        if self.scrub {
            self.progress(scroll_y)
        } else if scroll_y >= self.start {
            1.0
        } else {
            0.0
        }
    }

    /// Where a pinned element belongs at `scroll_y`. The result only
    /// changes when the offset crosses the range edges.
    pub fn pin_placement(&self, scroll_y: f64) -> PinPlacement {
        match self.pin {
            Pin::Off => PinPlacement::InFlow,
            Pin::Pinned { .. } if scroll_y < self.start => PinPlacement::InFlow,
            Pin::Pinned { .. } if self.contains(scroll_y) => PinPlacement::Fixed,
            Pin::Pinned { .. } => PinPlacement::Released { offset: self.len() },
        }
    }

    pub fn pin_spacer(&self) -> f64 {
        match self.pin {
            Pin::Pinned { spacing: true } => self.len(),
            _ => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinPlacement {
    InFlow,
    Fixed,
    /// `offset` pixels below its document position.
    Released { offset: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeBinding {
    pub from: f64,
    pub to: f64,
}

impl FadeBinding {
    pub const FADE_OUT: Self = Self { from: 1.0, to: 0.0 };

    pub fn value(&self, progress: f64) -> f64 {
        self.from + (self.to - self.from) * progress.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f64 = 900.0;

    fn hero_range() -> ScrollRange {
        TriggerSpec::full_height_pin().resolve(0.0, 900.0, VIEWPORT)
    }

    fn top_in_viewport(placement: PinPlacement, element_top: f64, scroll_y: f64) -> f64 {
        match placement {
            PinPlacement::InFlow => element_top - scroll_y,
            PinPlacement::Fixed => 0.0,
            PinPlacement::Released { offset } => element_top + offset - scroll_y,
        }
    }

    #[test]
    fn full_height_pin_spans_element_height() {
        let range = TriggerSpec::full_height_pin().resolve(120.0, 750.0, VIEWPORT);
        assert_eq!(range.start, 120.0);
        assert_eq!(range.end, 870.0);
        assert_eq!(range.len(), 750.0);
    }

    #[test]
    fn fade_is_opaque_at_top_and_clear_at_end() {
        let range = hero_range();
        let fade = FadeBinding::FADE_OUT;

        assert_eq!(fade.value(range.driven_progress(0.0)), 1.0);
        assert_eq!(fade.value(range.driven_progress(900.0)), 0.0);
        assert_eq!(fade.value(range.driven_progress(450.0)), 0.5);
    }

    #[test]
    fn fade_never_increases_while_scrolling_down() {
        let range = hero_range();
        let fade = FadeBinding::FADE_OUT;
        let mut previous = f64::INFINITY;

        for scroll in (-200..1400).step_by(7) {
            let opacity = fade.value(range.driven_progress(f64::from(scroll)));
            assert!(opacity <= previous, "opacity rose at {scroll}");
            previous = opacity;
        }
    }

    #[test]
    fn scrolling_back_restores_previous_opacity() {
        let range = hero_range();
        let fade = FadeBinding::FADE_OUT;

        let going_down = fade.value(range.driven_progress(300.0));
        let _ = fade.value(range.driven_progress(800.0));
        let coming_back = fade.value(range.driven_progress(300.0));
        assert_eq!(going_down, coming_back);
        assert!(coming_back > fade.value(range.driven_progress(800.0)));
    }

    #[test]
    fn pinned_element_top_stays_at_viewport_top_across_range() {
        let element_top = 0.0;
        let range = hero_range();

        for scroll in 0..=900 {
            let scroll = f64::from(scroll);
            let placement = range.pin_placement(scroll);
            assert_eq!(placement, PinPlacement::Fixed, "not pinned at {scroll}");
            assert_eq!(top_in_viewport(placement, element_top, scroll), 0.0);
        }
    }

    #[test]
    fn pin_releases_after_end_without_a_jump() {
        let range = hero_range();
        assert_eq!(range.pin_placement(-50.0), PinPlacement::InFlow);
        assert_eq!(
            range.pin_placement(1500.0),
            PinPlacement::Released { offset: 900.0 }
        );
        assert_eq!(range.pin_spacer(), 0.0);

        let at_end = top_in_viewport(range.pin_placement(900.0), 0.0, 900.0);
        let just_after = top_in_viewport(range.pin_placement(901.0), 0.0, 901.0);
        assert_eq!(at_end, 0.0);
        assert_eq!(just_after, -1.0);
    }

    #[test]
    fn placement_only_changes_at_range_edges() {
        let range = TriggerSpec::full_height_pin().resolve(300.0, 900.0, VIEWPORT);
        let mut changes = Vec::new();
        let mut previous = range.pin_placement(0.0);

        for scroll in 0..=2000 {
            let placement = range.pin_placement(f64::from(scroll));
            if placement != previous {
                changes.push(scroll);
                previous = placement;
            }
        }

        assert_eq!(changes, vec![300, 1201]);
    }

    #[test]
    fn pin_spacing_reserves_range_length() {
        let spec = TriggerSpec {
            pin: Pin::Pinned { spacing: true },
            ..TriggerSpec::full_height_pin()
        };
        assert_eq!(spec.resolve(0.0, 640.0, VIEWPORT).pin_spacer(), 640.0);
    }

    #[test]
    fn unpinned_trigger_stays_in_flow() {
        let spec = TriggerSpec {
            pin: Pin::Off,
            ..TriggerSpec::full_height_pin()
        };
        let range = spec.resolve(0.0, 640.0, VIEWPORT);
        for scroll in [0.0, 300.0, 5000.0] {
            assert_eq!(range.pin_placement(scroll), PinPlacement::InFlow);
        }
    }

    #[test]
    fn zero_height_element_steps_at_start() {
        let range = TriggerSpec::full_height_pin().resolve(100.0, 0.0, VIEWPORT);
        assert!(range.is_empty());
        assert_eq!(range.progress(99.0), 0.0);
        assert_eq!(range.progress(100.0), 1.0);
    }

    #[test]
    fn non_scrubbed_trigger_steps_at_start() {
        let spec = TriggerSpec {
            scrub: false,
            ..TriggerSpec::full_height_pin()
        };
        let range = spec.resolve(0.0, 900.0, VIEWPORT);
        assert_eq!(range.driven_progress(-1.0), 0.0);
        assert_eq!(range.driven_progress(10.0), 1.0);
    }

    #[test]
    fn viewport_edge_shifts_start_offset() {
        let spec = TriggerSpec {
            start: Anchor {
                element: Edge::Top,
                viewport: Edge::Bottom,
            },
            ..TriggerSpec::full_height_pin()
        };
        let range = spec.resolve(1000.0, 500.0, VIEWPORT);
        assert_eq!(range.start, 100.0);
        assert_eq!(range.end, 1500.0);
    }
}
