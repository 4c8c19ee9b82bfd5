use std::collections::HashMap;

/// Value of an option that takes arguments: a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    One(String),
    Many(Vec<String>)
}

impl ArgValue {
    pub fn values(&self) -> &[String] {
        match self {
            ArgValue::One(value) => std::slice::from_ref(value),
            ArgValue::Many(values) => values
        }
    }

    /// An empty string or an empty list counts as unset.
    pub fn is_empty(&self) -> bool {
        match self {
            ArgValue::One(value) => value.is_empty(),
            ArgValue::Many(values) => values.is_empty()
        }
    }

    /// Pushes `flag` followed by the value tokens, unless the value is empty.
    pub fn push_to(&self, flag: &str, args: &mut Vec<String>) {
        if self.is_empty() {
            return;
        }
        args.push(flag.to_string());
        args.extend(self.values().iter().cloned());
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::One(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::One(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(values: Vec<String>) -> Self {
        ArgValue::Many(values)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(values: Vec<&str>) -> Self {
        ArgValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Pushes `flag` when a boolean option is on.
pub fn push_switch(flag: &str, on: bool, args: &mut Vec<String>) {
    if on {
        args.push(flag.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Switch(bool),
    Value(ArgValue)
}

impl OptionValue {
    pub fn is_set(&self) -> bool {
        match self {
            OptionValue::Switch(on) => *on,
            OptionValue::Value(value) => !value.is_empty()
        }
    }
}

/// Configuration keyed by option name (without the leading `--`).
///
/// Formatting follows the order of an [`OptionTable`](crate::OptionTable),
/// not the order values were set in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    values: HashMap<String, OptionValue>
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch(mut self, name: impl Into<String>) -> Self {
        self.values.insert(name.into(), OptionValue::Switch(true));
        self
    }

    pub fn value(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.values
            .insert(name.into(), OptionValue::Value(value.into()));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: OptionValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.values.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_value_push_to() {
        let mut args = Vec::new();
        ArgValue::from("socks5://127.0.0.1:1080").push_to("--proxy", &mut args);
        ArgValue::from(vec!["a", "b"]).push_to("--pair", &mut args);
        assert_eq!(args, ["--proxy", "socks5://127.0.0.1:1080", "--pair", "a", "b"]);
    }

    #[test]
    fn test_empty_arg_value_emits_nothing() {
        let mut args = Vec::new();
        ArgValue::from("").push_to("--proxy", &mut args);
        ArgValue::Many(Vec::new()).push_to("--pair", &mut args);
        assert!(args.is_empty());
    }

    #[test]
    fn test_push_switch() {
        let mut args = Vec::new();
        push_switch("--quiet", true, &mut args);
        push_switch("--verbose", false, &mut args);
        assert_eq!(args, ["--quiet"]);
    }

    #[test]
    fn test_option_set_builder() {
        let set = OptionSet::new()
            .switch("quiet")
            .value("proxy", "http://proxy");
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("quiet"), Some(&OptionValue::Switch(true)));
        assert!(set.get("proxy").is_some_and(OptionValue::is_set));
        assert!(set.get("missing").is_none());
    }
}
