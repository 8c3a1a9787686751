//! Typed directive registrations built on [`Map::custom`].
//!
//! Wrappers that take a default only install it for optional directives,
//! so a required directive that resolves to nothing still fails.

use std::time::Duration;

use super::datasize::parse_data_size;
use super::duration::parse_duration;
use super::map::{default_value, DefaultFn, Map, Slot};
use super::node::Node;
use super::ConfigError;

fn optional_default<'a, T: Clone + 'a>(required: bool, value: T) -> Option<DefaultFn<'a, T>> {
    if required {
        None
    } else {
        default_value(value)
    }
}

fn single_arg(node: &Node) -> Result<&str, ConfigError> {
    match node.args.as_slice() {
        [arg] => Ok(arg.as_str()),
        args => Err(ConfigError::ArgumentCount {
            directive: node.name.clone(),
            location: node.location.clone(),
            expected: "exactly 1",
            found: args.len(),
        }),
    }
}

fn conversion_error(node: &Node, raw: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeConversion {
        directive: node.name.clone(),
        location: node.location.clone(),
        raw: raw.to_string(),
        expected,
    }
}

fn parse_bool(node: &Node) -> Result<bool, ConfigError> {
    match node.args.as_slice() {
        [] => Ok(true),
        [arg] => match arg.to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" => Ok(false),
            _ => Err(conversion_error(node, arg, "bool")),
        },
        args => Err(ConfigError::ArgumentCount {
            directive: node.name.clone(),
            location: node.location.clone(),
            expected: "0 or 1",
            found: args.len(),
        }),
    }
}

impl<'a> Map<'a> {
    /// Signed integer directive taking exactly one argument.
    pub fn int(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: i64,
        store: &Slot<i64>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default),
            |_, node| {
                let arg = single_arg(node)?;
                arg.parse().map_err(|_| conversion_error(node, arg, "integer"))
            },
            store,
        )
    }

    /// Unsigned integer directive taking exactly one argument.
    pub fn uint(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: u64,
        store: &Slot<u64>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default),
            |_, node| {
                let arg = single_arg(node)?;
                arg.parse()
                    .map_err(|_| conversion_error(node, arg, "unsigned integer"))
            },
            store,
        )
    }

    pub fn float(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: f64,
        store: &Slot<f64>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default),
            |_, node| {
                let arg = single_arg(node)?;
                arg.parse().map_err(|_| conversion_error(node, arg, "float"))
            },
            store,
        )
    }

    /// Flag directive.
    ///
    /// `name` alone means `true`; a single argument may be one of
    /// `yes`/`true`/`on`/`1` or `no`/`false`/`off`/`0`, in any case.
    pub fn bool(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        store: &Slot<bool>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            None,
            |_, node| parse_bool(node),
            store,
        )
    }

    pub fn string(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: impl Into<String>,
        store: &Slot<String>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default.into()),
            |_, node| single_arg(node).map(str::to_string),
            store,
        )
    }

    /// Directive collecting all of its arguments; at least one is required.
    pub fn string_list(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: Vec<String>,
        store: &Slot<Vec<String>>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default),
            |_, node| {
                if node.args.is_empty() {
                    return Err(ConfigError::ArgumentCount {
                        directive: node.name.clone(),
                        location: node.location.clone(),
                        expected: "at least 1",
                        found: 0,
                    });
                }
                Ok(node.args.clone())
            },
            store,
        )
    }

    /// String directive restricted to a fixed set of values.
    pub fn enumeration(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        allowed: &[&str],
        default: &str,
        store: &Slot<String>,
    ) -> &mut Self {
        let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default.to_string()),
            move |_, node| {
                let arg = single_arg(node)?;
                if !allowed.iter().any(|a| a == arg) {
                    return Err(ConfigError::invalid(
                        node,
                        format!("invalid value '{arg}', expected one of: {}", allowed.join(", ")),
                    ));
                }
                Ok(arg.to_string())
            },
            store,
        )
    }

    /// Byte count written as a data size literal, e.g. `max_message_size 32M`.
    ///
    /// Arguments are joined with single spaces, so `1M 512K` may be given
    /// either quoted or as separate arguments.
    pub fn data_size(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: u64,
        store: &Slot<u64>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default),
            |_, node| {
                parse_data_size(&node.args.join(" ")).map_err(|source| {
                    ConfigError::InvalidDataSize {
                        directive: node.name.clone(),
                        location: node.location.clone(),
                        source,
                    }
                })
            },
            store,
        )
    }

    pub fn duration(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: Duration,
        store: &Slot<Duration>,
    ) -> &mut Self {
        self.custom(
            name,
            inherit_global,
            required,
            optional_default(required, default),
            |_, node| {
                let arg = single_arg(node)?;
                parse_duration(arg).map_err(|source| ConfigError::InvalidDuration {
                    directive: node.name.clone(),
                    location: node.location.clone(),
                    source,
                })
            },
            store,
        )
    }
}
