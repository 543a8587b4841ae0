/// Scene-view input events that can be intercepted before they reach the page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputEvent {
    Focus,
    KeyDown,
    MouseWheel,
    DoubleClick,
    Drag,
}

impl InputEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            InputEvent::Focus => "focus",
            InputEvent::KeyDown => "key-down",
            InputEvent::MouseWheel => "mouse-wheel",
            InputEvent::DoubleClick => "double-click",
            InputEvent::Drag => "drag",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Shift,
    Control,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Shift => "Shift",
            Modifier::Control => "Control",
        }
    }
}

/// An event plus the exact modifier set it must be combined with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InputBinding {
    pub event: InputEvent,
    pub modifiers: &'static [Modifier],
}

impl InputBinding {
    pub const fn plain(event: InputEvent) -> Self {
        Self {
            event,
            modifiers: &[],
        }
    }

    pub const fn with(event: InputEvent, modifiers: &'static [Modifier]) -> Self {
        Self { event, modifiers }
    }

    pub fn modifier_names(&self) -> Vec<&'static str> {
        self.modifiers.iter().map(|m| m.as_str()).collect()
    }
}

impl std::fmt::Display for InputBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event.as_str())?;
        for m in self.modifiers {
            write!(f, "+{}", m.as_str())?;
        }
        Ok(())
    }
}

/// Camera-control input that must not bubble up to page navigation or scrolling.
pub const INTERCEPTED_INPUT: [InputBinding; 8] = [
    InputBinding::plain(InputEvent::Focus),
    InputBinding::plain(InputEvent::KeyDown),
    InputBinding::plain(InputEvent::MouseWheel),
    InputBinding::plain(InputEvent::DoubleClick),
    InputBinding::with(InputEvent::DoubleClick, &[Modifier::Control]),
    InputBinding::plain(InputEvent::Drag),
    InputBinding::with(InputEvent::Drag, &[Modifier::Shift]),
    InputBinding::with(InputEvent::Drag, &[Modifier::Shift, Modifier::Control]),
];

#[cfg(test)]
mod tests {
    use super::{INTERCEPTED_INPUT, InputEvent};

    #[test]
    fn bindings_are_distinct() {
        for (i, a) in INTERCEPTED_INPUT.iter().enumerate() {
            for b in &INTERCEPTED_INPUT[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn drag_is_covered_with_every_modifier_combination_used_by_camera_controls() {
        let drags: Vec<String> = INTERCEPTED_INPUT
            .iter()
            .filter(|b| b.event == InputEvent::Drag)
            .map(|b| b.to_string())
            .collect();
        assert_eq!(drags, vec!["drag", "drag+Shift", "drag+Shift+Control"]);
    }
}
