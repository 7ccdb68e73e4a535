use tracing::debug;

use super::{transition, InputMode, Language, Layout, LetterCase, ModeTrigger};
use crate::settings::Settings;

pub const MAX_TOGGLE_STATES: usize = 4;

/// Coarse class of the focused text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldClass {
    #[default]
    Text,
    Number,
    Phone,
    Datetime,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVariation {
    #[default]
    Normal,
    EmailAddress,
    Password,
    VisiblePassword,
    Uri,
    ShortMessage,
}

/// Action the host attaches to the enter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnterAction {
    #[default]
    None,
    Go,
    Search,
    Send,
    Next,
    Done,
}

/// Field-type hints supplied once when a text field gains focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldHints {
    pub class: FieldClass,
    pub variation: TextVariation,
    pub enter_action: EnterAction,
    pub multi_line: bool,
}

impl FieldHints {
    pub fn text(variation: TextVariation) -> Self {
        Self {
            variation,
            ..Self::default()
        }
    }

    pub fn of_class(class: FieldClass) -> Self {
        Self {
            class,
            ..Self::default()
        }
    }

    pub fn with_enter_action(mut self, action: EnterAction) -> Self {
        self.enter_action = action;
        self
    }

    fn wants_english(&self) -> bool {
        self.class == FieldClass::Text
            && matches!(
                self.variation,
                TextVariation::EmailAddress
                    | TextVariation::Password
                    | TextVariation::VisiblePassword
                    | TextVariation::Uri
            )
    }

    fn is_short_message(&self) -> bool {
        self.class == FieldClass::Text && self.variation == TextVariation::ShortMessage
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeIcon {
    Hidden,
    Pinyin,
    English,
}

/// Alternate key states a soft keyboard should switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleStateId {
    EnLower,
    EnUpper,
    EnSym1,
    EnSym2,
    Smiley,
    PhoneSym,
    Go,
    Search,
    Send,
    Next,
    Done,
}

/// Optional keyboard row enabled for the current field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleRow {
    #[default]
    Default,
    Chinese,
    English,
    Uri,
    EmailAddress,
}

/// Descriptor consumed by the keyboard renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToggleStates {
    pub qwerty: bool,
    pub qwerty_upper: bool,
    pub row: ToggleRow,
    /// Ordered, at most `MAX_TOGGLE_STATES` entries.
    pub key_states: Vec<ToggleStateId>,
}

impl ToggleStates {
    pub(super) fn push(&mut self, state: ToggleStateId) {
        if self.key_states.len() < MAX_TOGGLE_STATES {
            self.key_states.push(state);
        }
    }

    pub fn contains(&self, state: ToggleStateId) -> bool {
        self.key_states.contains(&state)
    }
}

/// Tracks the active input mode across focus changes and user triggers.
#[derive(Debug, Clone)]
pub struct ModeSwitcher {
    current: InputMode,
    previous: InputMode,
    /// Last mode with a QWERTY or no soft layout; restored for hardware keyboards.
    recent_language: InputMode,
    hints: FieldHints,
    short_message_field: bool,
    enter_key_normal: bool,
    toggle_states: ToggleStates,
    icon: ModeIcon,
    hard_keyboard: bool,
}

impl ModeSwitcher {
    pub fn new(settings: &Settings) -> Self {
        Self {
            current: InputMode::UNSET,
            previous: InputMode::UNSET,
            recent_language: InputMode::SKB_CHINESE,
            hints: FieldHints::default(),
            short_message_field: false,
            enter_key_normal: true,
            toggle_states: ToggleStates::default(),
            icon: ModeIcon::Hidden,
            hard_keyboard: settings.environment.hard_keyboard,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.current
    }

    pub fn previous_mode(&self) -> InputMode {
        self.previous
    }

    pub fn recent_language_mode(&self) -> InputMode {
        self.recent_language
    }

    pub fn icon(&self) -> ModeIcon {
        self.icon
    }

    pub fn toggle_states(&self) -> &ToggleStates {
        &self.toggle_states
    }

    pub fn enter_key_normal(&self) -> bool {
        self.enter_key_normal
    }

    pub fn is_short_message_field(&self) -> bool {
        self.short_message_field
    }

    /// Apply a mode-switch soft key. Returns the icon to show.
    pub fn switch_for_trigger(&mut self, trigger: ModeTrigger) -> ModeIcon {
        let next = transition(self.current, trigger);
        if next == self.current || next == InputMode::UNSET {
            return self.icon;
        }
        debug!(from = ?self.current, to = ?next, ?trigger, "mode transition");
        self.save_mode(next);
        self.prepare_toggle_states(true);
        self.icon
    }

    /// Choose the soft-keyboard mode for a newly focused field.
    pub fn request_for_field(&mut self, hints: FieldHints) -> ModeIcon {
        self.short_message_field = false;
        let next = match hints.class {
            FieldClass::Number | FieldClass::Datetime => InputMode::SKB_SYMBOL1_EN,
            FieldClass::Phone => InputMode::SKB_PHONE_NUM,
            FieldClass::Text if hints.wants_english() => InputMode::SKB_ENGLISH_LOWER,
            FieldClass::Text | FieldClass::Other => {
                self.short_message_field = hints.is_short_message();
                self.keep_previous_with_layout()
            }
        };
        self.hints = hints;
        debug!(?hints, mode = ?next, "soft keyboard mode for field");
        self.save_mode(next);
        self.prepare_toggle_states(true);
        self.icon
    }

    /// Choose the hardware-keyboard mode for a newly focused field.
    pub fn request_for_field_hkb(&mut self, hints: FieldHints) -> ModeIcon {
        self.short_message_field = false;
        let english = match hints.class {
            FieldClass::Number | FieldClass::Phone | FieldClass::Datetime => true,
            FieldClass::Text => {
                self.short_message_field = hints.is_short_message();
                hints.wants_english()
            }
            FieldClass::Other => false,
        };
        let next = if english || self.recent_language.language != Some(Language::Chinese) {
            InputMode::HKB_ENGLISH
        } else {
            InputMode::HKB_CHINESE
        };
        self.hints = hints;
        debug!(?hints, mode = ?next, "hardware keyboard mode for field");
        self.save_mode(next);
        self.prepare_toggle_states(false);
        self.icon
    }

    pub fn switch_language_with_hkb(&mut self) -> ModeIcon {
        let next = if self.current == InputMode::HKB_CHINESE {
            InputMode::HKB_ENGLISH
        } else {
            InputMode::HKB_CHINESE
        };
        self.save_mode(next);
        self.icon = if next == InputMode::HKB_ENGLISH {
            ModeIcon::English
        } else {
            ModeIcon::Pinyin
        };
        self.icon
    }

    /// Return to the remembered mode when both it and the current mode use
    /// a soft layout. `None` when nothing changed.
    pub fn back_to_previous(&mut self) -> Option<ModeIcon> {
        if !(self.current.has_soft_layout() && self.previous.has_soft_layout()) {
            return None;
        }
        let previous = self.previous;
        self.save_mode(previous);
        self.prepare_toggle_states(true);
        Some(self.icon)
    }

    fn keep_previous_with_layout(&self) -> InputMode {
        if self.current.has_soft_layout() {
            return self.current;
        }
        match self.current.language {
            Some(Language::English) => InputMode::SKB_ENGLISH_LOWER,
            Some(Language::Chinese) | None => InputMode::SKB_CHINESE,
        }
    }

    fn save_mode(&mut self, next: InputMode) {
        self.previous = self.current;
        self.current = next;

        if matches!(next.layout, None | Some(Layout::Qwerty)) {
            self.recent_language = next;
        }

        self.icon = if !self.hard_keyboard {
            ModeIcon::Hidden
        } else if self.is_english_with_hkb() {
            ModeIcon::English
        } else {
            ModeIcon::Pinyin
        };
    }

    fn prepare_toggle_states(&mut self, needs_soft_keyboard: bool) {
        self.enter_key_normal = true;
        if !needs_soft_keyboard {
            return;
        }

        let mode = self.current;
        let mut states = ToggleStates::default();

        if mode.layout != Some(Layout::Phone) {
            match (mode.language, mode.layout) {
                (Some(Language::Chinese), Some(Layout::Qwerty)) => {
                    states.qwerty = true;
                    states.qwerty_upper = true;
                    if self.short_message_field {
                        states.push(ToggleStateId::Smiley);
                    }
                }
                (Some(Language::English), Some(Layout::Qwerty)) => {
                    states.qwerty = true;
                    if mode.case == Some(LetterCase::Upper) {
                        states.qwerty_upper = true;
                        states.push(ToggleStateId::EnUpper);
                    } else {
                        states.push(ToggleStateId::EnLower);
                    }
                }
                (Some(Language::English), Some(Layout::Symbol1)) => {
                    states.push(ToggleStateId::EnSym1)
                }
                (Some(Language::English), Some(Layout::Symbol2)) => {
                    states.push(ToggleStateId::EnSym2)
                }
                _ => {}
            }

            states.row = match (self.hints.variation, mode.language) {
                (TextVariation::EmailAddress, _) => ToggleRow::EmailAddress,
                (TextVariation::Uri, _) => ToggleRow::Uri,
                (_, Some(Language::Chinese)) => ToggleRow::Chinese,
                (_, Some(Language::English)) => ToggleRow::English,
                (_, None) => ToggleRow::Default,
            };
        } else if mode.case == Some(LetterCase::Upper) {
            states.push(ToggleStateId::PhoneSym);
        }

        let enter_state = match self.hints.enter_action {
            EnterAction::Go => Some(ToggleStateId::Go),
            EnterAction::Search => Some(ToggleStateId::Search),
            EnterAction::Send => Some(ToggleStateId::Send),
            EnterAction::Next if !self.hints.multi_line => Some(ToggleStateId::Next),
            EnterAction::Done => Some(ToggleStateId::Done),
            EnterAction::Next | EnterAction::None => None,
        };
        if let Some(state) = enter_state {
            states.push(state);
            self.enter_key_normal = false;
        }

        self.toggle_states = states;
    }

    // --- Predicates ---

    /// Chinese text is entered with either the QWERTY soft keyboard or a
    /// hardware keyboard.
    pub fn is_chinese_text(&self) -> bool {
        matches!(self.current.layout, None | Some(Layout::Qwerty))
            && self.current.language == Some(Language::Chinese)
    }

    pub fn is_chinese_text_with_skb(&self) -> bool {
        self.current.layout == Some(Layout::Qwerty)
            && self.current.language == Some(Language::Chinese)
    }

    pub fn is_chinese_text_with_hkb(&self) -> bool {
        self.current.layout.is_none() && self.current.language == Some(Language::Chinese)
    }

    pub fn is_english_with_skb(&self) -> bool {
        matches!(
            self.current,
            InputMode::SKB_ENGLISH_LOWER | InputMode::SKB_ENGLISH_UPPER
        )
    }

    pub fn is_english_upper_with_skb(&self) -> bool {
        self.current == InputMode::SKB_ENGLISH_UPPER
    }

    pub fn is_english_with_hkb(&self) -> bool {
        self.current == InputMode::HKB_ENGLISH
    }

    pub fn is_symbol_with_skb(&self) -> bool {
        matches!(
            self.current.layout,
            Some(Layout::Symbol1) | Some(Layout::Symbol2)
        )
    }
}
