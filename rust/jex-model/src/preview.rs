use std::borrow::Cow;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::StepParam;

/// A read-only view over a step's parameters that renders exactly the
/// argument string the execution backend would produce for them.
///
/// Rendering rules:
///
/// - parameters are stably sorted by [StepParam::order]
/// - a non-empty name is emitted as-is, followed by the value if it is
///   non-empty
/// - values are shell-quoted with [quote_argument]
/// - tokens are separated by a single space
///
/// ```rust
/// # use jex_model::{PreviewableStepParam, StepParam};
/// let params = PreviewableStepParam::from(vec![
///     StepParam { name: "-o".into(), value: "out dir".into(), order: 2, ..Default::default() },
///     StepParam { name: "-v".into(), order: 1, ..Default::default() },
/// ]);
///
/// assert_eq!(params.to_string(), "-v -o 'out dir'");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewableStepParam(pub Vec<StepParam>);

impl PreviewableStepParam {
    /// The argument vector in command-line order.
    pub fn arguments(&self) -> Vec<String> {
        let mut ordered: Vec<&StepParam> = self.0.iter().collect();
        ordered.sort_by_key(|param| param.order);

        let mut arguments = Vec::with_capacity(ordered.len() * 2);

        for param in ordered {
            if !param.name.is_empty() {
                arguments.push(param.name.clone());
            }
            if !param.value.is_empty() {
                arguments.push(quote_argument(&param.value).into_owned());
            }
        }

        arguments
    }

    /// The arguments joined into a single preview string.
    pub fn render(&self) -> String {
        self.arguments().join(" ")
    }
}

impl From<Vec<StepParam>> for PreviewableStepParam {
    fn from(params: Vec<StepParam>) -> Self {
        PreviewableStepParam(params)
    }
}

impl Display for PreviewableStepParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn is_shell_safe(character: char) -> bool {
    character.is_ascii_alphanumeric() || "_@%+=:,./-".contains(character)
}

/// Quote `value` for a POSIX shell. Values made only of characters that a
/// shell never interprets are returned unchanged; anything else is wrapped in
/// single quotes, with embedded single quotes written as `'\''`.
pub fn quote_argument(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && value.chars().all(is_shell_safe) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
    }
}
