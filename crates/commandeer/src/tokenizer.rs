//! Token classification over a raw argument list.
//!
//! The tokenizer is a cursor with push-back: splitting `-abc` yields `-a`
//! and pushes `-bc` back to be classified on the next step. Whether a token
//! is a known option depends on the command being parsed, supplied through
//! [`OptionScope`].

use std::collections::VecDeque;

use crate::flags::maybe_option;
use crate::Opt;

/// Option lookup for the command currently being parsed.
pub(crate) trait OptionScope {
    fn find_option(&self, arg: &str) -> Option<&Opt>;
    fn combine_flag_and_optional_value(&self) -> bool;
}

#[derive(Debug)]
pub(crate) enum Token<'o> {
    /// `--`: everything after it is an operand.
    Terminator,
    /// A known option. `inline` is a value attached as `-xVALUE` or
    /// `--name=VALUE`; `exact` is true when the token was the bare flag.
    Flag {
        option: &'o Opt,
        inline: Option<String>,
        exact: bool,
    },
    /// Anything else: an operand, or an option this command does not know.
    Arg(String),
}

#[derive(Debug, Default)]
pub(crate) struct Tokenizer {
    queue: VecDeque<String>,
}

impl Tokenizer {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            queue: args.into(),
        }
    }

    pub fn next_raw(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn peek_raw(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// Take every remaining token unclassified.
    pub fn drain(&mut self) -> Vec<String> {
        self.queue.drain(..).collect()
    }

    pub fn next_token<'o, S: OptionScope>(&mut self, scope: &'o S) -> Option<Token<'o>> {
        let arg = self.queue.pop_front()?;
        if arg == "--" {
            return Some(Token::Terminator);
        }

        if maybe_option(&arg) {
            if let Some(option) = scope.find_option(&arg) {
                tracing::trace!(token = %arg, attribute = option.attribute_name(), "known option");
                return Some(Token::Flag {
                    option,
                    inline: None,
                    exact: true,
                });
            }
        }

        // -abc: short flag followed by a value or more flags
        if arg.len() > 2 && arg.starts_with('-') && !arg.starts_with("--") {
            let mut chars = arg[1..].chars();
            if let Some(first) = chars.next() {
                let flag = format!("-{first}");
                let rest = chars.as_str();
                if let Some(option) = scope.find_option(&flag) {
                    let takes_inline = option.is_required()
                        || (option.is_optional() && scope.combine_flag_and_optional_value());
                    if takes_inline {
                        return Some(Token::Flag {
                            option,
                            inline: Some(rest.to_string()),
                            exact: false,
                        });
                    }
                    self.queue.push_front(format!("-{rest}"));
                    return Some(Token::Flag {
                        option,
                        inline: None,
                        exact: false,
                    });
                }
            }
        }

        // --name=value, only for options that take a value
        if arg.starts_with("--") {
            if let Some(eq) = arg.find('=') {
                if eq > 2 {
                    if let Some(option) = scope.find_option(&arg[..eq]) {
                        if option.takes_value() {
                            return Some(Token::Flag {
                                option,
                                inline: Some(arg[eq + 1..].to_string()),
                                exact: false,
                            });
                        }
                    }
                }
            }
        }

        Some(Token::Arg(arg))
    }
}
