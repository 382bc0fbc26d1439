use strum::{Display, EnumString};

/// Control line understood by the daemon socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Command {
    Toggle,
    Expand,
    Collapse,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    ConfigReload,
}
