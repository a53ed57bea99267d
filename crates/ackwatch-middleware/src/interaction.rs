//! Inbound interactions and their payload kinds.
//!
//! Each payload kind is its own struct implementing [`InteractionData`].
//! [`InteractionKind`] is the closed set of kinds; it only picks the variant's
//! data and delegates naming and formatting to it, so a new kind touches one
//! struct and one match arm.

use std::fmt;

/// Formatting capability shared by all payload kinds.
pub trait InteractionData: fmt::Debug + Send + Sync {
    /// Short kind label, e.g. `Command`.
    fn kind_name(&self) -> &'static str;

    /// Kind-specific details. Empty when the kind carries nothing worth
    /// printing.
    fn describe(&self) -> String;
}

/// A named option passed to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    /// Option name.
    pub name: String,
    /// Option value as text.
    pub value: String,
}

impl CommandOption {
    /// Create an option.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An invoked command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandData {
    /// Command name.
    pub name: String,
    /// Target of a context-menu command.
    pub target_id: Option<u64>,
    /// Options supplied with the command.
    pub options: Vec<CommandOption>,
}

impl InteractionData for CommandData {
    fn kind_name(&self) -> &'static str {
        "Command"
    }

    fn describe(&self) -> String {
        let options = self
            .options
            .iter()
            .map(|option| format!("{}={}", option.name, option.value))
            .collect::<Vec<_>>()
            .join(", ");
        match self.target_id {
            Some(target) => format!("{} | target: {target} | options: [{options}]", self.name),
            None => format!("{} | options: [{options}]", self.name),
        }
    }
}

/// A pressed button.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonData {
    /// Developer-defined identifier of the button.
    pub custom_id: String,
}

impl InteractionData for ButtonData {
    fn kind_name(&self) -> &'static str {
        "Button"
    }

    fn describe(&self) -> String {
        self.custom_id.clone()
    }
}

/// A string select menu submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringSelectData {
    /// Developer-defined identifier of the menu.
    pub custom_id: String,
    /// Selected values.
    pub values: Vec<String>,
}

impl InteractionData for StringSelectData {
    fn kind_name(&self) -> &'static str {
        "StringSelect"
    }

    fn describe(&self) -> String {
        format!("{} | [{}]", self.custom_id, self.values.join(", "))
    }
}

/// A submitted modal form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalData {
    /// Developer-defined identifier of the modal.
    pub custom_id: String,
    /// Submitted `(field id, value)` pairs.
    pub fields: Vec<(String, String)>,
}

impl InteractionData for ModalData {
    fn kind_name(&self) -> &'static str {
        "Modal"
    }

    fn describe(&self) -> String {
        let fields = self
            .fields
            .iter()
            .map(|(id, _)| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} | fields: [{fields}]", self.custom_id)
    }
}

/// An autocomplete request while a user types a command option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutocompleteData {
    /// Command being typed.
    pub command: String,
    /// Option that has focus.
    pub focused_option: String,
    /// Partial input so far.
    pub partial: String,
}

impl InteractionData for AutocompleteData {
    fn kind_name(&self) -> &'static str {
        "Autocomplete"
    }

    fn describe(&self) -> String {
        format!("{} | {}={:?}", self.command, self.focused_option, self.partial)
    }
}

/// A liveness ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingData;

impl InteractionData for PingData {
    fn kind_name(&self) -> &'static str {
        "Ping"
    }

    fn describe(&self) -> String {
        String::new()
    }
}

/// A payload of a kind this crate does not model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnknownData {
    /// Raw payload text.
    pub raw: String,
}

impl InteractionData for UnknownData {
    fn kind_name(&self) -> &'static str {
        "Unknown"
    }

    fn describe(&self) -> String {
        self.raw.clone()
    }
}

/// Closed set of payload kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
    /// See [`CommandData`].
    Command(CommandData),
    /// See [`ButtonData`].
    Button(ButtonData),
    /// See [`StringSelectData`].
    StringSelect(StringSelectData),
    /// See [`ModalData`].
    Modal(ModalData),
    /// See [`AutocompleteData`].
    Autocomplete(AutocompleteData),
    /// See [`PingData`].
    Ping(PingData),
    /// See [`UnknownData`].
    Unknown(UnknownData),
}

impl InteractionKind {
    /// The payload as its formatting capability.
    #[must_use]
    pub fn data(&self) -> &dyn InteractionData {
        match self {
            Self::Command(data) => data,
            Self::Button(data) => data,
            Self::StringSelect(data) => data,
            Self::Modal(data) => data,
            Self::Autocomplete(data) => data,
            Self::Ping(data) => data,
            Self::Unknown(data) => data,
        }
    }

    /// Short kind label.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.data().kind_name()
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        let details = data.describe();
        if details.is_empty() {
            f.write_str(data.kind_name())
        } else {
            write!(f, "{} | {details}", data.kind_name())
        }
    }
}

impl From<CommandData> for InteractionKind {
    fn from(data: CommandData) -> Self {
        Self::Command(data)
    }
}

impl From<ButtonData> for InteractionKind {
    fn from(data: ButtonData) -> Self {
        Self::Button(data)
    }
}

impl From<StringSelectData> for InteractionKind {
    fn from(data: StringSelectData) -> Self {
        Self::StringSelect(data)
    }
}

impl From<ModalData> for InteractionKind {
    fn from(data: ModalData) -> Self {
        Self::Modal(data)
    }
}

impl From<AutocompleteData> for InteractionKind {
    fn from(data: AutocompleteData) -> Self {
        Self::Autocomplete(data)
    }
}

impl From<PingData> for InteractionKind {
    fn from(data: PingData) -> Self {
        Self::Ping(data)
    }
}

impl From<UnknownData> for InteractionKind {
    fn from(data: UnknownData) -> Self {
        Self::Unknown(data)
    }
}

/// An inbound interaction that expects an acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// Token the acknowledgment must carry.
    pub token: String,
    /// User that triggered the interaction.
    pub sender_id: u64,
    /// Channel the interaction happened in.
    pub channel_id: u64,
    /// Payload.
    pub kind: InteractionKind,
}

impl Interaction {
    /// Create an interaction.
    #[must_use]
    pub fn new(
        token: impl Into<String>,
        sender_id: u64,
        channel_id: u64,
        kind: impl Into<InteractionKind>,
    ) -> Self {
        Self {
            token: token.into(),
            sender_id,
            channel_id,
            kind: kind.into(),
        }
    }

    /// One-line description used in timeout reports.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("@{} | {}", self.sender_id, self.kind)
    }
}
