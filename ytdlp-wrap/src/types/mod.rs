mod options;

pub use options::{ArgValue, OptionSet, OptionValue, push_switch};
