//! Input mode encoder.
//!
//! A mode is the tuple (keyboard layout, language, letter case). All logic
//! works on the decoded tuple; the 32-bit packed word only exists at the
//! boundary (`pack` / `unpack`) for hosts that persist or transmit it.

mod keys;
mod switcher;

pub use keys::{KeyCode, KeyFace, SoftKey, SystemKey};
pub use switcher::{
    EnterAction, FieldClass, FieldHints, ModeIcon, ModeSwitcher, TextVariation, ToggleRow,
    ToggleStateId, ToggleStates, MAX_TOGGLE_STATES,
};

const MASK_LAYOUT: u32 = 0xF000_0000;
const MASK_LANGUAGE: u32 = 0x0F00_0000;
const MASK_CASE: u32 = 0x00F0_0000;

const LAYOUT_SHIFT: u32 = 28;
const LANGUAGE_CN: u32 = 0x0100_0000;
const LANGUAGE_EN: u32 = 0x0200_0000;
const CASE_LOWER: u32 = 0x0010_0000;
const CASE_UPPER: u32 = 0x0020_0000;

/// Soft keyboard layout class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Qwerty,
    Symbol1,
    Symbol2,
    Smiley,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Chinese,
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterCase {
    Lower,
    Upper,
}

/// Decoded input mode. `layout == None` means no soft keyboard is shown
/// (hardware keyboard input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputMode {
    pub layout: Option<Layout>,
    pub language: Option<Language>,
    pub case: Option<LetterCase>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("unknown layout nibble {0:#x}")]
    Layout(u32),
    #[error("unknown language bits {0:#x}")]
    Language(u32),
    #[error("unknown case bits {0:#x}")]
    Case(u32),
    #[error("reserved bits set in {0:#010x}")]
    Reserved(u32),
}

impl InputMode {
    pub const UNSET: InputMode = InputMode::new(None, None, None);
    pub const SKB_CHINESE: InputMode =
        InputMode::new(Some(Layout::Qwerty), Some(Language::Chinese), None);
    pub const SKB_SYMBOL1_CN: InputMode =
        InputMode::new(Some(Layout::Symbol1), Some(Language::Chinese), None);
    pub const SKB_SYMBOL1_EN: InputMode =
        InputMode::new(Some(Layout::Symbol1), Some(Language::English), None);
    pub const SKB_SYMBOL2_CN: InputMode =
        InputMode::new(Some(Layout::Symbol2), Some(Language::Chinese), None);
    pub const SKB_SYMBOL2_EN: InputMode =
        InputMode::new(Some(Layout::Symbol2), Some(Language::English), None);
    pub const SKB_ENGLISH_LOWER: InputMode = InputMode::new(
        Some(Layout::Qwerty),
        Some(Language::English),
        Some(LetterCase::Lower),
    );
    pub const SKB_ENGLISH_UPPER: InputMode = InputMode::new(
        Some(Layout::Qwerty),
        Some(Language::English),
        Some(LetterCase::Upper),
    );
    pub const SKB_SMILEY: InputMode =
        InputMode::new(Some(Layout::Smiley), Some(Language::Chinese), None);
    pub const SKB_PHONE_NUM: InputMode = InputMode::new(Some(Layout::Phone), None, None);
    pub const SKB_PHONE_SYM: InputMode =
        InputMode::new(Some(Layout::Phone), None, Some(LetterCase::Upper));
    pub const HKB_CHINESE: InputMode = InputMode::new(None, Some(Language::Chinese), None);
    pub const HKB_ENGLISH: InputMode = InputMode::new(None, Some(Language::English), None);

    pub const fn new(
        layout: Option<Layout>,
        language: Option<Language>,
        case: Option<LetterCase>,
    ) -> Self {
        Self {
            layout,
            language,
            case,
        }
    }

    pub fn pack(self) -> u32 {
        let layout = match self.layout {
            None => 0u32,
            Some(Layout::Qwerty) => 1,
            Some(Layout::Symbol1) => 2,
            Some(Layout::Symbol2) => 3,
            Some(Layout::Smiley) => 4,
            Some(Layout::Phone) => 5,
        } << LAYOUT_SHIFT;
        let language = match self.language {
            None => 0,
            Some(Language::Chinese) => LANGUAGE_CN,
            Some(Language::English) => LANGUAGE_EN,
        };
        let case = match self.case {
            None => 0,
            Some(LetterCase::Lower) => CASE_LOWER,
            Some(LetterCase::Upper) => CASE_UPPER,
        };
        layout | language | case
    }

    pub fn unpack(word: u32) -> Result<Self, ModeError> {
        if word & !(MASK_LAYOUT | MASK_LANGUAGE | MASK_CASE) != 0 {
            return Err(ModeError::Reserved(word));
        }
        let layout = match (word & MASK_LAYOUT) >> LAYOUT_SHIFT {
            0 => None,
            1 => Some(Layout::Qwerty),
            2 => Some(Layout::Symbol1),
            3 => Some(Layout::Symbol2),
            4 => Some(Layout::Smiley),
            5 => Some(Layout::Phone),
            other => return Err(ModeError::Layout(other)),
        };
        let language = match word & MASK_LANGUAGE {
            0 => None,
            LANGUAGE_CN => Some(Language::Chinese),
            LANGUAGE_EN => Some(Language::English),
            other => return Err(ModeError::Language(other)),
        };
        let case = match word & MASK_CASE {
            0 => None,
            CASE_LOWER => Some(LetterCase::Lower),
            CASE_UPPER => Some(LetterCase::Upper),
            other => return Err(ModeError::Case(other)),
        };
        Ok(Self::new(layout, language, case))
    }

    /// Looks up a mode by its conventional name (`skb-chinese`, `hkb-english`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_MODES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, mode)| *mode)
    }

    pub fn name(self) -> Option<&'static str> {
        NAMED_MODES
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(n, _)| *n)
    }

    pub fn has_soft_layout(self) -> bool {
        self.layout.is_some()
    }
}

const NAMED_MODES: &[(&str, InputMode)] = &[
    ("unset", InputMode::UNSET),
    ("skb-chinese", InputMode::SKB_CHINESE),
    ("skb-symbol1-cn", InputMode::SKB_SYMBOL1_CN),
    ("skb-symbol1-en", InputMode::SKB_SYMBOL1_EN),
    ("skb-symbol2-cn", InputMode::SKB_SYMBOL2_CN),
    ("skb-symbol2-en", InputMode::SKB_SYMBOL2_EN),
    ("skb-english-lower", InputMode::SKB_ENGLISH_LOWER),
    ("skb-english-upper", InputMode::SKB_ENGLISH_UPPER),
    ("skb-smiley", InputMode::SKB_SMILEY),
    ("skb-phone-num", InputMode::SKB_PHONE_NUM),
    ("skb-phone-sym", InputMode::SKB_PHONE_SYM),
    ("hkb-chinese", InputMode::HKB_CHINESE),
    ("hkb-english", InputMode::HKB_ENGLISH),
];

/// Soft keys that switch modes. Keyboards encode them as negative key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeTrigger {
    Shift,
    Language,
    Symbol,
    PhoneSymbol,
    MoreSymbols,
    Smiley,
}

impl ModeTrigger {
    pub fn from_user_key(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Shift),
            -2 => Some(Self::Language),
            -3 => Some(Self::Symbol),
            -4 => Some(Self::PhoneSymbol),
            -5 => Some(Self::MoreSymbols),
            -6 => Some(Self::Smiley),
            _ => None,
        }
    }

    pub fn user_key(self) -> i32 {
        match self {
            Self::Shift => -1,
            Self::Language => -2,
            Self::Symbol => -3,
            Self::PhoneSymbol => -4,
            Self::MoreSymbols => -5,
            Self::Smiley => -6,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "shift" => Some(Self::Shift),
            "lang" | "language" => Some(Self::Language),
            "sym" | "symbol" => Some(Self::Symbol),
            "phone-sym" => Some(Self::PhoneSymbol),
            "more-sym" => Some(Self::MoreSymbols),
            "smiley" => Some(Self::Smiley),
            _ => None,
        }
    }
}

/// Pure transition table. A trigger that means nothing in the current mode
/// returns the mode unchanged.
pub fn transition(mode: InputMode, trigger: ModeTrigger) -> InputMode {
    use InputMode as M;

    match trigger {
        ModeTrigger::Language => match mode {
            M::SKB_CHINESE => M::SKB_ENGLISH_LOWER,
            M::SKB_ENGLISH_LOWER | M::SKB_ENGLISH_UPPER => M::SKB_CHINESE,
            M::SKB_SYMBOL1_CN => M::SKB_SYMBOL1_EN,
            M::SKB_SYMBOL1_EN => M::SKB_SYMBOL1_CN,
            M::SKB_SYMBOL2_CN => M::SKB_SYMBOL2_EN,
            M::SKB_SYMBOL2_EN => M::SKB_SYMBOL2_CN,
            M::SKB_SMILEY => M::SKB_CHINESE,
            _ => mode,
        },
        ModeTrigger::Symbol => match mode {
            M::SKB_CHINESE => M::SKB_SYMBOL1_CN,
            M::SKB_ENGLISH_LOWER | M::SKB_ENGLISH_UPPER => M::SKB_SYMBOL1_EN,
            M::SKB_SYMBOL1_EN | M::SKB_SYMBOL2_EN => M::SKB_ENGLISH_LOWER,
            M::SKB_SYMBOL1_CN | M::SKB_SYMBOL2_CN => M::SKB_CHINESE,
            M::SKB_SMILEY => M::SKB_SYMBOL1_CN,
            _ => mode,
        },
        ModeTrigger::Shift => match mode {
            M::SKB_ENGLISH_LOWER => M::SKB_ENGLISH_UPPER,
            M::SKB_ENGLISH_UPPER => M::SKB_ENGLISH_LOWER,
            _ => mode,
        },
        ModeTrigger::MoreSymbols => {
            let layout = if mode.layout == Some(Layout::Symbol1) {
                Layout::Symbol2
            } else {
                Layout::Symbol1
            };
            InputMode {
                layout: Some(layout),
                ..mode
            }
        }
        ModeTrigger::Smiley => {
            if mode == M::SKB_CHINESE {
                M::SKB_SMILEY
            } else {
                M::SKB_CHINESE
            }
        }
        ModeTrigger::PhoneSymbol => {
            if mode == M::SKB_PHONE_NUM {
                M::SKB_PHONE_SYM
            } else {
                M::SKB_PHONE_NUM
            }
        }
    }
}
