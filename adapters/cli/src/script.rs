//! Plain-text gesture scripts replayed by the `play` subcommand.
//!
//! One gesture per line:
//!
//! ```text
//! # comment
//! drop red -1.5 -0.5
//! rotate brown
//! advance
//! ```

use pigpen_core::{EntityId, WorldPosition};
use thiserror::Error;

/// Height at which scripted drops are reported, matching the houses' rest height.
const DROP_HEIGHT: f32 = 0.1;

/// Single host gesture parsed from a script line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Gesture {
    /// A drag of `entity` that ended at `position`.
    Drop {
        entity: EntityId,
        position: WorldPosition,
    },
    /// A rotate gesture on `entity`.
    Rotate { entity: EntityId },
    /// A request for the next level.
    Advance,
}

/// Errors reported while parsing a gesture script.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown gesture '{word}'")]
    UnknownGesture { line: usize, word: String },
    #[error("line {line}: '{gesture}' is missing its {argument}")]
    MissingArgument {
        line: usize,
        gesture: &'static str,
        argument: &'static str,
    },
    #[error("line {line}: '{value}' is not a number")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: unexpected trailing input '{rest}'")]
    TrailingInput { line: usize, rest: String },
}

/// Parses every gesture in `source`, skipping blank lines and `#` comments.
pub(crate) fn parse(source: &str) -> Result<Vec<Gesture>, ScriptError> {
    let mut gestures = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        gestures.push(parse_line(line, content)?);
    }
    Ok(gestures)
}

fn parse_line(line: usize, content: &str) -> Result<Gesture, ScriptError> {
    let mut words = content.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let gesture = match keyword {
        "drop" => {
            let entity = required(&mut words, line, "drop", "house")?;
            let x = number(required(&mut words, line, "drop", "x coordinate")?, line)?;
            let z = number(required(&mut words, line, "drop", "z coordinate")?, line)?;
            Gesture::Drop {
                entity: EntityId::new(entity),
                position: WorldPosition::new(x, DROP_HEIGHT, z),
            }
        }
        "rotate" => Gesture::Rotate {
            entity: EntityId::new(required(&mut words, line, "rotate", "house")?),
        },
        "advance" => Gesture::Advance,
        other => {
            return Err(ScriptError::UnknownGesture {
                line,
                word: other.to_owned(),
            })
        }
    };

    let rest: Vec<&str> = words.collect();
    if !rest.is_empty() {
        return Err(ScriptError::TrailingInput {
            line,
            rest: rest.join(" "),
        });
    }
    Ok(gesture)
}

fn required<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    line: usize,
    gesture: &'static str,
    argument: &'static str,
) -> Result<&'a str, ScriptError> {
    words.next().ok_or(ScriptError::MissingArgument {
        line,
        gesture,
        argument,
    })
}

fn number(value: &str, line: usize) -> Result<f32, ScriptError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ScriptError::InvalidNumber {
            line,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_gesture_kind() {
        let source = "\
            # solve level one\n\
            drop red -1.5 -0.5\n\
            \n\
            rotate brown   # twice\n\
            advance\n";

        let gestures = parse(source).expect("script parses");

        assert_eq!(
            gestures,
            vec![
                Gesture::Drop {
                    entity: EntityId::new("red"),
                    position: WorldPosition::new(-1.5, 0.1, -0.5),
                },
                Gesture::Rotate {
                    entity: EntityId::new("brown"),
                },
                Gesture::Advance,
            ]
        );
    }

    #[test]
    fn reports_the_offending_line() {
        let error = parse("advance\njump red").expect_err("unknown gesture");
        assert_eq!(
            error,
            ScriptError::UnknownGesture {
                line: 2,
                word: "jump".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_incomplete_and_malformed_drops() {
        assert_eq!(
            parse("drop red 1.0").expect_err("missing z"),
            ScriptError::MissingArgument {
                line: 1,
                gesture: "drop",
                argument: "z coordinate",
            }
        );
        assert_eq!(
            parse("drop red one 2").expect_err("bad number"),
            ScriptError::InvalidNumber {
                line: 1,
                value: "one".to_owned(),
            }
        );
        assert_eq!(
            parse("drop red NaN 0").expect_err("non-finite number"),
            ScriptError::InvalidNumber {
                line: 1,
                value: "NaN".to_owned(),
            }
        );
        assert_eq!(
            parse("rotate red yellow").expect_err("trailing input"),
            ScriptError::TrailingInput {
                line: 1,
                rest: "yellow".to_owned(),
            }
        );
    }
}
