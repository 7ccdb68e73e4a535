//! Key scripts: plain characters are typed as-is, braces name the other keys.
//!
//! ```text
//! nihao{space}{del}wo{alt:!}{enter}
//! ```

use pinyin_session::KeyEvent;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unterminated key name at offset {0}")]
    Unterminated(usize),
    #[error("unknown key {{{0}}}")]
    UnknownKey(String),
    #[error("{{alt:...}} takes exactly one character, got {0:?}")]
    BadAlt(String),
}

pub fn parse_script(script: &str) -> Result<Vec<KeyEvent>, ScriptError> {
    let mut events = Vec::new();
    let mut offset = 0;

    while let Some(ch) = script[offset..].chars().next() {
        match ch {
            '{' => {
                let body = &script[offset + 1..];
                let end = body.find('}').ok_or(ScriptError::Unterminated(offset))?;
                events.push(named_key(&body[..end])?);
                offset += end + 2;
                continue;
            }
            '\n' | '\r' => {}
            _ => events.push(KeyEvent::ch(ch)),
        }
        offset += ch.len_utf8();
    }
    Ok(events)
}

fn named_key(name: &str) -> Result<KeyEvent, ScriptError> {
    if let Some(arg) = name.strip_prefix("alt:") {
        let mut chars = arg.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(KeyEvent::alt(ch)),
            _ => Err(ScriptError::BadAlt(arg.to_string())),
        };
    }
    let event = match name {
        "enter" => KeyEvent::Enter,
        "space" => KeyEvent::space(),
        "shift-space" => KeyEvent::Space { shift: true },
        "del" => KeyEvent::Delete,
        "up" => KeyEvent::ArrowUp,
        "down" => KeyEvent::ArrowDown,
        "left" => KeyEvent::ArrowLeft,
        "right" => KeyEvent::ArrowRight,
        "center" => KeyEvent::Center,
        "back" => KeyEvent::Back,
        "lbrace" => KeyEvent::ch('{'),
        _ => return Err(ScriptError::UnknownKey(name.to_string())),
    };
    Ok(event)
}
