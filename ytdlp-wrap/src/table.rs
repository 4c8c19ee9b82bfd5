use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::help::HelpOption;
use crate::types::{ArgValue, OptionSet, OptionValue};

/// Ordered option descriptors as extracted from the help listing.
///
/// When a name appears more than once the later descriptor wins: the earlier
/// one is no longer visible through [`get`](Self::get) or [`iter`](Self::iter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTable {
    options: Vec<HelpOption>,
    index: HashMap<String, usize>
}

impl OptionTable {
    pub fn new(options: Vec<HelpOption>) -> Self {
        let index: HashMap<String, usize> = options
            .iter()
            .enumerate()
            .map(|(i, option)| (option.name.clone(), i))
            .collect();

        let shadowed = options.len() - index.len();
        if shadowed > 0 {
            tracing::warn!(shadowed, "duplicate option names, keeping the last of each");
        }

        Self { options, index }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let options: Vec<HelpOption> = serde_json::from_str(json)?;
        Ok(Self::new(options))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let options: Vec<&HelpOption> = self.iter().collect();
        Ok(serde_json::to_string_pretty(&options)?)
    }

    pub fn get(&self, name: &str) -> Option<&HelpOption> {
        self.index.get(name).map(|&i| &self.options[i])
    }

    /// Surviving options in help-text order.
    pub fn iter(&self) -> impl Iterator<Item = &HelpOption> {
        self.options
            .iter()
            .enumerate()
            .filter(|(i, option)| self.index.get(&option.name) == Some(i))
            .map(|(_, option)| option)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Formats `set` as command-line arguments in table order.
    pub fn format(&self, set: &OptionSet) -> Result<Vec<String>> {
        if let Some((name, _)) = set.iter().find(|(name, _)| self.get(name).is_none()) {
            return Err(Error::UnknownOption(name.to_string()));
        }

        let mut args = Vec::new();

        for option in self.iter() {
            let Some(value) = set.get(&option.name) else {
                continue;
            };

            match (value, option.takes_value()) {
                (OptionValue::Switch(on), false) => {
                    if *on {
                        args.push(option.flag());
                    }
                }
                (OptionValue::Value(value), true) => {
                    if let Some(token) = value.values().iter().find(|token| self.is_flag(token)) {
                        return Err(Error::AmbiguousValue {
                            name: option.name.clone(),
                            value: token.clone()
                        });
                    }
                    value.push_to(&option.flag(), &mut args);
                }
                (OptionValue::Switch(_), true) => {
                    return Err(Error::OptionKindMismatch {
                        name: option.name.clone(),
                        expected: "takes a value"
                    });
                }
                (OptionValue::Value(_), false) => {
                    return Err(Error::OptionKindMismatch {
                        name: option.name.clone(),
                        expected: "is a switch and takes no value"
                    });
                }
            }
        }

        Ok(args)
    }

    /// Reads arguments produced by [`format`](Self::format) back into an [`OptionSet`].
    ///
    /// A valued option consumes every following token up to the next known
    /// `--flag`, so a list is read back whatever the number of placeholders.
    pub fn parse_args(&self, args: &[String]) -> Result<OptionSet> {
        let mut set = OptionSet::new();
        let mut tokens = args.iter().peekable();

        while let Some(token) = tokens.next() {
            let name = token.strip_prefix("--").unwrap_or(token);
            let option = self
                .get(name)
                .filter(|_| token.starts_with("--"))
                .ok_or_else(|| Error::UnknownOption(name.to_string()))?;

            if !option.takes_value() {
                set.set(name, OptionValue::Switch(true));
                continue;
            }

            let mut values = Vec::new();
            while let Some(value) = tokens.next_if(|token| !self.is_flag(token)) {
                values.push(value.clone());
            }
            if values.is_empty() {
                return Err(Error::MissingValue {
                    name: option.name.clone(),
                    expected: option.args.len(),
                    found: 0
                });
            }

            let value = match <[String; 1]>::try_from(values) {
                Ok([value]) => ArgValue::One(value),
                Err(values) => ArgValue::Many(values)
            };
            set.set(name, OptionValue::Value(value));
        }

        Ok(set)
    }

    fn is_flag(&self, token: &str) -> bool {
        token
            .strip_prefix("--")
            .is_some_and(|name| self.get(name).is_some())
    }
}
