//! Positional arguments plus `--name value` options and bare flags.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::errors::CommandError;
use crate::validation::{self, ValidationError};

const FLAGS: &[&str] = &["--yes", "--force"];

#[derive(Debug, Default)]
pub struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    options: HashMap<&'a str, &'a str>,
    flags: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(args: &[&'a str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if FLAGS.contains(&arg) {
                parsed.flags.push(arg);
            } else if let Some(name) = arg.strip_prefix("--") {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("option `--{name}` needs a value"))
                })?;
                parsed.options.insert(name, value);
            } else {
                parsed.positional.push(arg);
            }
        }
        Ok(parsed)
    }

    pub fn positional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    pub fn require(&self, index: usize, name: &str) -> Result<&'a str, CommandError> {
        self.positional(index)
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing <{name}>")))
    }

    /// Positional arguments from `index` on, joined by spaces.
    pub fn rest(&self, index: usize) -> Option<String> {
        let rest = self.positional.get(index..)?;
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub fn flag(&self, flag: &str) -> bool {
        self.flags.contains(&flag)
    }
}

/// Parses a closed-enum argument such as a category or a period.
pub fn parse_choice<T>(value: &str) -> Result<T, CommandError>
where
    T: FromStr<Err = ValidationError>,
{
    value.parse::<T>().map_err(CommandError::from)
}

pub fn parse_date_arg(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, CommandError> {
    validation::validate_date(value, now).map_err(CommandError::from)
}

pub fn parse_limit(value: Option<&str>, default: usize) -> Result<usize, CommandError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(CommandError::InvalidArguments(
                "limit must be a positive integer".into(),
            )),
        },
    }
}
