use std::path::PathBuf;

/// Emitted by the slideshow loop once per interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowPicture {
    pub identifier: String,
    pub path: PathBuf,
}

/// Emitted by the viewer after a picture was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displayed {
    pub identifier: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Stop,
    Restart,
    Shutdown,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Shutdown => "shutdown",
        }
    }
}
