//! Rendering a typed Rust client module from an [`OptionTable`].
//!
//! The table is first turned into a [`ClientModule`] model; the model is then
//! rendered through an askama template. Tests can inspect either step.

use std::collections::HashMap;

use askama::Template;

use crate::error::Result;
use crate::help::HelpOption;
use crate::table::OptionTable;

const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield"
];

// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "super", "Self", "_"];

/// One field of the generated `Options` struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub ident: String,
    pub flag: String,
    pub doc: String,
    pub placeholders: String,
    pub takes_value: bool
}

impl Field {
    fn from_option(option: &HelpOption) -> Self {
        let description = option.description.trim();
        let doc = if description.is_empty() {
            format!("Passes `{}`.", option.flag())
        } else {
            description.to_string()
        };

        Self {
            ident: rust_ident(&option.name),
            flag: option.flag(),
            doc,
            placeholders: option.args.join(" "),
            takes_value: option.takes_value()
        }
    }

    pub fn ty(&self) -> &'static str {
        if self.takes_value {
            "Option<ArgValue>"
        } else {
            "bool"
        }
    }
}

/// Model of the generated module.
#[derive(Debug, Clone, Template)]
#[template(path = "client.rs", escape = "none")]
pub struct ClientModule {
    pub source: String,
    pub fields: Vec<Field>
}

impl ClientModule {
    /// Builds the model; fields whose identifiers collide keep the later option.
    pub fn from_table(table: &OptionTable, version: Option<&str>) -> Self {
        let mut fields: Vec<Field> = Vec::with_capacity(table.len());
        let mut seen: HashMap<String, usize> = HashMap::new();

        for field in table.iter().map(Field::from_option) {
            if let Some(&i) = seen.get(&field.ident) {
                tracing::warn!(ident = %field.ident, flag = %field.flag, "field name collision, keeping the later option");
                fields[i] = field;
            } else {
                seen.insert(field.ident.clone(), fields.len());
                fields.push(field);
            }
        }

        let source = match version {
            Some(version) => format!("yt-dlp {version} --help"),
            None => "yt-dlp --help".to_string()
        };

        Self { source, fields }
    }
}

pub fn render_client(table: &OptionTable, version: Option<&str>) -> Result<String> {
    Ok(ClientModule::from_table(table, version).render()?)
}

/// Converts a flag name such as `no-abort-on-error` into a Rust field name.
pub fn rust_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    } else if RAW_KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }

    ident
}
