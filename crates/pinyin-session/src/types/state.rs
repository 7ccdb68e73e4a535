/// Session state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImeState {
    #[default]
    Idle,
    /// Typing spelling, decoder candidates shown.
    Input,
    /// Direct editing of the composing string.
    Composing,
    /// After a commit, showing next-word predictions.
    Predict,
    /// Showing completions supplied by the host application.
    AppCompletion,
    /// Focus lost; keys are ignored until the next `start_input`.
    Bypass,
}

/// How the composing view draws the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposingStatus {
    /// Decoded syllables spaced apart, cursor at the end.
    #[default]
    ShowPinyin,
    /// The raw spelling as typed.
    ShowStringLowercase,
    /// Fixed Hanzi plus remaining spelling, with a movable cursor.
    EditPinyin,
}
