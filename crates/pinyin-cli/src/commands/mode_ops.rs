use std::process;

use pinyin_core::mode::{transition, InputMode, ModeError, ModeTrigger};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModeArgError {
    #[error("unknown mode name: {0}")]
    UnknownName(String),
    #[error("bad hex mode word: {0}")]
    BadHex(String),
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("unknown trigger: {0} (shift, lang, sym, phone-sym, more-sym, smiley)")]
    UnknownTrigger(String),
}

/// A mode by name (`skb-chinese`) or packed word (`0x01100001`).
pub fn parse_mode(arg: &str) -> Result<InputMode, ModeArgError> {
    match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => {
            let word =
                u32::from_str_radix(hex, 16).map_err(|_| ModeArgError::BadHex(arg.to_string()))?;
            Ok(InputMode::unpack(word)?)
        }
        None => {
            InputMode::from_name(arg).ok_or_else(|| ModeArgError::UnknownName(arg.to_string()))
        }
    }
}

/// Every mode visited while applying `triggers` to `start`, start included.
pub fn walk(start: InputMode, triggers: &[ModeTrigger]) -> Vec<InputMode> {
    let mut modes = vec![start];
    let mut mode = start;
    for &trigger in triggers {
        mode = transition(mode, trigger);
        modes.push(mode);
    }
    modes
}

pub fn mode_cmd(start: &str, triggers: &[String]) {
    let result = parse_mode(start).and_then(|mode| {
        let triggers = triggers
            .iter()
            .map(|t| {
                ModeTrigger::from_name(t).ok_or_else(|| ModeArgError::UnknownTrigger(t.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(walk(mode, &triggers))
    });
    let modes = result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    for mode in modes {
        println!("{:#010x}\t{}", mode.pack(), mode.name().unwrap_or("-"));
    }
}
