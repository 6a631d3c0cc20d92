use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual flavour of a toast. Unknown names map to [`NotificationKind::Default`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "&'static str")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    #[default]
    Default,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Default => "default",
        }
    }

    /// Lenient parse used at the ingress point.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "info" => Self::Info,
            _ => Self::Default,
        }
    }

    pub const fn palette(self) -> Palette {
        match self {
            Self::Success => Palette {
                accent: "#71ff76",
                icon: Icon::Check,
            },
            Self::Error => Palette {
                accent: "#ff6868",
                icon: Icon::Cross,
            },
            Self::Info => Palette {
                accent: "#6970ff",
                icon: Icon::Exclamation,
            },
            Self::Default => Palette {
                accent: "#afafaf",
                icon: Icon::Dot,
            },
        }
    }
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

impl From<NotificationKind> for &'static str {
    fn from(value: NotificationKind) -> Self {
        value.as_str()
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Icon {
    Check,
    Cross,
    Exclamation,
    Dot,
}

impl Icon {
    pub const fn glyph(self) -> char {
        match self {
            Self::Check => '✔',
            Self::Cross => '✖',
            Self::Exclamation => '!',
            Self::Dot => '•',
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    pub accent: &'static str,
    pub icon: Icon,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Notification {
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn plain(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Default, message)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    TopRight,
    TopCenter,
    TopLeft,
    BottomRight,
    BottomLeft,
    BottomCenter,
}

impl Position {
    pub const ALL: [Self; 6] = [
        Self::TopRight,
        Self::TopCenter,
        Self::TopLeft,
        Self::BottomRight,
        Self::BottomLeft,
        Self::BottomCenter,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::TopCenter => "top-center",
            Self::TopLeft => "top-left",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
        }
    }

    /// Bottom anchored containers stack upwards and put the counter on top.
    pub const fn is_bottom(self) -> bool {
        matches!(
            self,
            Self::BottomRight | Self::BottomLeft | Self::BottomCenter
        )
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pos| pos.as_str() == s)
            .ok_or_else(|| format!("unknown position: {s}"))
    }
}

/// One of the three on-screen positions, `First` being the oldest visible toast.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(into = "u8")]
pub enum Slot {
    First,
    Second,
    Third,
}

impl Slot {
    pub const COUNT: usize = 3;

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

impl From<Slot> for u8 {
    fn from(value: Slot) -> Self {
        value.number()
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::First),
            "2" => Ok(Self::Second),
            "3" => Ok(Self::Third),
            other => Err(format!("unknown slot: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ToastId(pub(crate) u64);

impl ToastId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{Notification, NotificationKind, Position, Slot};
    use std::str::FromStr;

    #[test]
    fn unknown_kind_falls_back_to_default() {
        assert_eq!(NotificationKind::parse_lossy("warning"), NotificationKind::Default);
        assert_eq!(NotificationKind::parse_lossy(" Error "), NotificationKind::Error);

        let parsed: Notification =
            serde_json::from_str(r#"{"type":"bogus","message":"hi"}"#).unwrap();
        assert_eq!(parsed.kind, NotificationKind::Default);
        assert_eq!(parsed.message, "hi");
    }

    #[test]
    fn missing_kind_is_default() {
        let parsed: Notification = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(parsed.kind, NotificationKind::Default);
    }

    #[test]
    fn kind_serializes_as_lowercase_name() {
        let json = serde_json::to_string(&Notification::info("x")).unwrap();
        assert_eq!(json, r#"{"type":"info","message":"x"}"#);
    }

    #[test]
    fn position_accepts_only_known_values() {
        assert_eq!(Position::from_str("bottom-center"), Ok(Position::BottomCenter));
        assert!(Position::from_str("middle").is_err());
        assert!(Position::from_str("Top-Right").is_err());
        assert!(Position::BottomLeft.is_bottom());
        assert!(!Position::TopCenter.is_bottom());
    }

    #[test]
    fn slot_numbers_are_one_based() {
        assert_eq!(Slot::from_index(0), Some(Slot::First));
        assert_eq!(Slot::from_index(3), None);
        assert_eq!(Slot::from_str("3"), Ok(Slot::Third));
        assert_eq!(Slot::Second.to_string(), "2");
    }
}
