//! Registration metadata the host uses to build a screentone node.

use std::fmt;

use crate::error::{Error, Result};
use crate::pipeline::{Config, Mode};

/// Type, range and default of one node input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// An image tensor supplied by an upstream node.
    Image,
    /// Integer widget.
    Int {
        min: i64,
        max: i64,
        step: i64,
        default: i64,
    },
    /// Float widget.
    Float {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    /// Drop-down; the first option is the default.
    Choice { options: &'static [&'static str] },
}

/// One declared node input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Everything the host needs to register the node.
#[derive(Debug)]
pub struct NodeDescriptor {
    /// Internal operation name.
    pub name: &'static str,
    /// Name shown in the host UI.
    pub display_name: &'static str,
    /// Menu category.
    pub category: &'static str,
    /// Entry point the host invokes.
    pub function: &'static str,
    /// Required inputs, in display order.
    pub inputs: &'static [ParamSpec],
    /// Output types.
    pub return_types: &'static [&'static str],
}

/// The screentone filter node.
pub static NODE: NodeDescriptor = NodeDescriptor {
    name: "ScreentoneFilter",
    display_name: "Screentone Filter",
    category: "pixelworld_ai",
    function: "apply_screentone",
    inputs: &[
        ParamSpec {
            name: "image",
            kind: ParamKind::Image,
        },
        ParamSpec {
            name: "dot_spacing",
            kind: ParamKind::Int {
                min: 5,
                max: 50,
                step: 1,
                default: 10,
            },
        },
        ParamSpec {
            name: "dot_size",
            kind: ParamKind::Int {
                min: 1,
                max: 20,
                step: 1,
                default: 4,
            },
        },
        ParamSpec {
            name: "quantization",
            kind: ParamKind::Int {
                min: 1,
                max: 256,
                step: 1,
                default: 4,
            },
        },
        ParamSpec {
            name: "white_threshold",
            kind: ParamKind::Float {
                min: 0.0,
                max: 1.0,
                step: 0.01,
                default: 0.95,
            },
        },
        ParamSpec {
            name: "black_threshold",
            kind: ParamKind::Float {
                min: 0.0,
                max: 1.0,
                step: 0.01,
                default: 0.1,
            },
        },
        ParamSpec {
            name: "mask_shrink",
            kind: ParamKind::Int {
                min: 0,
                max: 10,
                step: 1,
                default: 5,
            },
        },
        ParamSpec {
            name: "overlay_opacity",
            kind: ParamKind::Float {
                min: 0.0,
                max: 1.0,
                step: 0.01,
                default: 1.0,
            },
        },
        ParamSpec {
            name: "mode",
            kind: ParamKind::Choice {
                options: &Mode::LABELS,
            },
        },
    ],
    return_types: &["IMAGE"],
};

impl NodeDescriptor {
    /// Look up an input by name.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&ParamSpec> {
        self.inputs.iter().find(|spec| spec.name == name)
    }

    /// Build a [`Config`] from the declared defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an input is missing, has an unexpected kind, or
    /// its default does not fit the config field.
    #[allow(clippy::cast_possible_truncation)]
    pub fn default_config(&self) -> Result<Config> {
        let config = Config {
            dot_spacing: self.int_default("dot_spacing")?,
            dot_size: self.int_default("dot_size")?,
            quantization: self.int_default("quantization")?,
            white_threshold: self.float_default("white_threshold")? as f32,
            black_threshold: self.float_default("black_threshold")? as f32,
            mask_shrink: self.int_default("mask_shrink")?,
            overlay_opacity: self.float_default("overlay_opacity")? as f32,
            mode: self.choice_default("mode")?.parse()?,
        };
        config.validate()?;
        Ok(config)
    }

    fn int_default<T: TryFrom<i64>>(&self, name: &str) -> Result<T> {
        match self.input(name).map(|spec| spec.kind) {
            Some(ParamKind::Int { default, .. }) => {
                T::try_from(default).map_err(|_| invalid(name, "default out of range"))
            }
            Some(_) => Err(invalid(name, "declared with a non-integer kind")),
            None => Err(invalid(name, "not declared by the node")),
        }
    }

    fn float_default(&self, name: &str) -> Result<f64> {
        match self.input(name).map(|spec| spec.kind) {
            Some(ParamKind::Float { default, .. }) => Ok(default),
            Some(_) => Err(invalid(name, "declared with a non-float kind")),
            None => Err(invalid(name, "not declared by the node")),
        }
    }

    fn choice_default(&self, name: &str) -> Result<&'static str> {
        match self.input(name).map(|spec| spec.kind) {
            Some(ParamKind::Choice { options }) => options
                .first()
                .copied()
                .ok_or_else(|| invalid(name, "has no options")),
            Some(_) => Err(invalid(name, "declared with a non-choice kind")),
            None => Err(invalid(name, "not declared by the node")),
        }
    }
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("IMAGE"),
            Self::Int {
                min,
                max,
                step,
                default,
            } => write!(f, "INT [{min}, {max}] step {step}, default {default}"),
            Self::Float {
                min,
                max,
                step,
                default,
            } => write!(f, "FLOAT [{min}, {max}] step {step}, default {default}"),
            Self::Choice { options } => write!(f, "CHOICE {options:?}"),
        }
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.display_name, self.name)?;
        writeln!(f, "  category: {}", self.category)?;
        writeln!(f, "  function: {}", self.function)?;
        writeln!(f, "  inputs:")?;
        for spec in self.inputs {
            writeln!(f, "    {:<16} {}", spec.name, spec.kind)?;
        }
        write!(f, "  returns: {}", self.return_types.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        assert_eq!(NODE.default_config().unwrap(), Config::default());
    }

    #[test]
    fn test_input_lookup() {
        assert_eq!(NODE.input("image").map(|s| s.kind), Some(ParamKind::Image));
        assert!(NODE.input("strength").is_none());
    }

    #[test]
    fn test_mode_choices() {
        let Some(ParamKind::Choice { options }) = NODE.input("mode").map(|s| s.kind) else {
            panic!("mode must be a choice");
        };
        for option in options {
            assert!(option.parse::<Mode>().is_ok());
        }
    }

    #[test]
    fn test_int_ranges_cover_defaults() {
        for spec in NODE.inputs {
            match spec.kind {
                ParamKind::Int {
                    min, max, default, ..
                } => assert!((min..=max).contains(&default), "{}", spec.name),
                ParamKind::Float {
                    min, max, default, ..
                } => assert!((min..=max).contains(&default), "{}", spec.name),
                _ => {}
            }
        }
    }

    #[test]
    fn test_display_lists_inputs() {
        let text = NODE.to_string();

        assert!(text.starts_with("Screentone Filter (ScreentoneFilter)"));
        for spec in NODE.inputs {
            assert!(text.contains(spec.name));
        }
    }

    #[test]
    fn test_missing_input_is_reported() {
        let node = NodeDescriptor {
            name: NODE.name,
            display_name: NODE.display_name,
            category: NODE.category,
            function: NODE.function,
            inputs: &NODE.inputs[..1],
            return_types: NODE.return_types,
        };

        assert!(matches!(
            node.default_config(),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
