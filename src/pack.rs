//! Pack directives as reported by the geometry manager.
//!
//! The packer hands back its configuration as a loose option map (`-side
//! left -fill y -padx 4`). `PackArgs` parses the four options that drive the
//! packed-space model and keeps everything else verbatim for display. A
//! missing option is never an error: it resolves against `PackDefaults`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::PackDefaults;
use crate::error::PackOptionError;

/// Edge of the parent a child is packed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// Left/right packing consumes horizontal space, so the packed strip
    /// spans the parent's full height.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    #[default]
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::Nw,
        Anchor::N,
        Anchor::Ne,
        Anchor::W,
        Anchor::Center,
        Anchor::E,
        Anchor::Sw,
        Anchor::S,
        Anchor::Se,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::N => "n",
            Anchor::Ne => "ne",
            Anchor::E => "e",
            Anchor::Se => "se",
            Anchor::S => "s",
            Anchor::Sw => "sw",
            Anchor::W => "w",
            Anchor::Nw => "nw",
            Anchor::Center => "center",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    #[default]
    None,
    X,
    Y,
    Both,
}

impl Fill {
    pub const ALL: [Fill; 4] = [Fill::None, Fill::X, Fill::Y, Fill::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Fill::None => "none",
            Fill::X => "x",
            Fill::Y => "y",
            Fill::Both => "both",
        }
    }
}

impl FromStr for Side {
    type Err = PackOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Side::ALL
            .into_iter()
            .find(|side| side.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PackOptionError::new("side", s))
    }
}

impl FromStr for Anchor {
    type Err = PackOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PackOptionError::new("anchor", s))
    }
}

impl FromStr for Fill {
    type Err = PackOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fill::ALL
            .into_iter()
            .find(|fill| fill.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PackOptionError::new("fill", s))
    }
}

/// Parse a Tcl-style boolean (`1`, `yes`, `true`, `on` and their negatives).
pub fn parse_expand(s: &str) -> Result<bool, PackOptionError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(PackOptionError::new("expand", s)),
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed pack configuration of one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackArgs {
    side: Option<Side>,
    anchor: Option<Anchor>,
    fill: Option<Fill>,
    expand: Option<bool>,
    extra: BTreeMap<String, String>,
}

impl PackArgs {
    /// Parse the option map reported by the packer. Keys may carry Tk's
    /// leading dash.
    pub fn from_options(options: &BTreeMap<String, String>) -> Result<Self, PackOptionError> {
        let mut args = PackArgs::default();
        for (key, value) in options {
            match key.trim_start_matches('-') {
                "side" => args.side = Some(value.parse()?),
                "anchor" => args.anchor = Some(value.parse()?),
                "fill" => args.fill = Some(value.parse()?),
                "expand" => args.expand = Some(parse_expand(value)?),
                other => {
                    args.extra.insert(other.to_string(), value.clone());
                }
            }
        }
        Ok(args)
    }

    /// True when the packer reported nothing at all for this widget.
    pub fn is_empty(&self) -> bool {
        self.side.is_none()
            && self.anchor.is_none()
            && self.fill.is_none()
            && self.expand.is_none()
            && self.extra.is_empty()
    }

    pub fn side(&self, defaults: &PackDefaults) -> Side {
        self.side.unwrap_or(defaults.side)
    }

    pub fn anchor(&self, defaults: &PackDefaults) -> Anchor {
        self.anchor.unwrap_or(defaults.anchor)
    }

    pub fn fill(&self, defaults: &PackDefaults) -> Fill {
        self.fill.unwrap_or(defaults.fill)
    }

    pub fn expand(&self, defaults: &PackDefaults) -> bool {
        self.expand.unwrap_or(defaults.expand)
    }

    /// Options outside side/anchor/fill/expand, e.g. `padx` or `in`.
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    pub fn resolve(&self, defaults: &PackDefaults) -> ResolvedPack {
        ResolvedPack {
            side: self.side(defaults),
            anchor: self.anchor(defaults),
            fill: self.fill(defaults),
            expand: self.expand(defaults),
        }
    }
}

/// Pack options with every default applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedPack {
    pub side: Side,
    pub anchor: Anchor,
    pub fill: Fill,
    pub expand: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_keys_resolve_to_defaults() {
        let args = PackArgs::from_options(&BTreeMap::new()).unwrap();
        assert!(args.is_empty());
        let resolved = args.resolve(&PackDefaults::default());
        assert_eq!(
            resolved,
            ResolvedPack {
                side: Side::Top,
                anchor: Anchor::Center,
                fill: Fill::None,
                expand: false,
            }
        );
    }

    #[test]
    fn parses_dashed_keys_and_keeps_extras() {
        let args = PackArgs::from_options(&options(&[
            ("-side", "left"),
            ("-fill", "y"),
            ("-expand", "1"),
            ("-padx", "10"),
        ]))
        .unwrap();
        let defaults = PackDefaults::default();
        assert_eq!(args.side(&defaults), Side::Left);
        assert_eq!(args.fill(&defaults), Fill::Y);
        assert!(args.expand(&defaults));
        assert_eq!(args.anchor(&defaults), Anchor::Center);
        assert_eq!(args.extra().get("padx").map(String::as_str), Some("10"));
        assert!(!args.is_empty());
    }

    #[test]
    fn only_extras_is_not_empty() {
        let args = PackArgs::from_options(&options(&[("in", ".frame")])).unwrap();
        assert!(!args.is_empty());
    }

    #[test]
    fn unknown_values_are_rejected() {
        let err = PackArgs::from_options(&options(&[("side", "middle")])).unwrap_err();
        assert_eq!(err.option, "side");
        assert_eq!(err.value, "middle");
        assert!(PackArgs::from_options(&options(&[("fill", "all")])).is_err());
        assert!(PackArgs::from_options(&options(&[("anchor", "up")])).is_err());
        assert!(PackArgs::from_options(&options(&[("expand", "maybe")])).is_err());
    }

    #[test]
    fn defaults_are_configurable() {
        let defaults = PackDefaults {
            side: Side::Left,
            anchor: Anchor::Nw,
            fill: Fill::Both,
            expand: true,
        };
        let resolved = PackArgs::default().resolve(&defaults);
        assert_eq!(resolved.side, Side::Left);
        assert_eq!(resolved.anchor, Anchor::Nw);
        assert_eq!(resolved.fill, Fill::Both);
        assert!(resolved.expand);
    }

    #[test]
    fn horizontal_sides() {
        assert!(Side::Left.is_horizontal());
        assert!(Side::Right.is_horizontal());
        assert!(!Side::Top.is_horizontal());
        assert!(!Side::Bottom.is_horizontal());
    }
}
