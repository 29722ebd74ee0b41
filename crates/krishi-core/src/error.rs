//! User-input validation errors

use crate::{Language, Text};
use thiserror::Error;

/// Input rejected before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("district is required")]
    MissingDistrict,

    #[error("state is required")]
    MissingState,

    #[error("no soil report selected")]
    NoReportSelected,

    #[error("file exceeds the upload limit")]
    FileTooLarge,

    #[error("no image selected")]
    NoImageSelected,

    #[error("no active chat session")]
    NoChatSession,

    #[error("message is empty")]
    EmptyMessage,
}

impl ValidationError {
    /// Message shown to the user in the active language
    pub fn localized(&self, lang: Language) -> &'static str {
        let text = match self {
            Self::MissingDistrict => Text::EnterDistrict,
            Self::MissingState => Text::EnterState,
            Self::NoReportSelected => Text::SelectReportFirst,
            Self::FileTooLarge => Text::FileTooLarge,
            Self::NoImageSelected => Text::SelectImage,
            Self::NoChatSession => Text::NoChatSession,
            Self::EmptyMessage => Text::EmptyMessage,
        };
        text.get(lang)
    }
}
