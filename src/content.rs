//! Content formatting: turns a category plus raw text into the payload
//! embedded in the QR code.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{QrError, QrResult};

/// What kind of content the code carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    #[default]
    Url,
    Email,
    Phone,
    Text,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 4] = [
        ContentCategory::Url,
        ContentCategory::Email,
        ContentCategory::Phone,
        ContentCategory::Text,
    ];

    /// Sample value offered when switching to this category.
    pub fn sample(self) -> &'static str {
        match self {
            ContentCategory::Url => "https://example.com",
            ContentCategory::Email => "example@email.com",
            ContentCategory::Phone => "+1234567890",
            ContentCategory::Text => "Hello World!",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentCategory::Url => "URL",
            ContentCategory::Email => "Email Address",
            ContentCategory::Phone => "Phone Number",
            ContentCategory::Text => "Text",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ContentCategory::Text => "Enter any text here",
            other => other.sample(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ContentCategory::Url => "Enter the URL for your QR code",
            ContentCategory::Email => "Enter an email address",
            ContentCategory::Phone => "Enter a phone number with country code",
            ContentCategory::Text => "Enter plain text for your QR code",
        }
    }

    /// Capitalized name, e.g. `Url`, as used in export file names.
    pub fn display_name(self) -> &'static str {
        match self {
            ContentCategory::Url => "Url",
            ContentCategory::Email => "Email",
            ContentCategory::Phone => "Phone",
            ContentCategory::Text => "Text",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentCategory::Url => "url",
            ContentCategory::Email => "email",
            ContentCategory::Phone => "phone",
            ContentCategory::Text => "text",
        };
        f.write_str(name)
    }
}

/// Produce the canonical payload for `raw` under `category`.
///
/// URLs keep an existing `http://` or `https://` scheme and otherwise get
/// `https://`; email and phone get `mailto:` and `tel:` unless already
/// present. Text passes through. Nothing beyond the scheme is validated.
pub fn format(category: ContentCategory, raw: &str) -> QrResult<String> {
    if raw.is_empty() {
        return Err(QrError::EmptyContent);
    }

    let payload = match category {
        ContentCategory::Url => {
            if raw.starts_with("http://") || raw.starts_with("https://") {
                raw.to_string()
            } else {
                format!("https://{}", raw)
            }
        }
        ContentCategory::Email => with_prefix("mailto:", raw),
        ContentCategory::Phone => with_prefix("tel:", raw),
        ContentCategory::Text => raw.to_string(),
    };

    Ok(payload)
}

fn with_prefix(prefix: &str, raw: &str) -> String {
    if raw.starts_with(prefix) {
        raw.to_string()
    } else {
        format!("{}{}", prefix, raw)
    }
}

/// Best-effort replacement content after a category change.
///
/// Returns the category's sample value when `current` is empty or lacks the
/// category's marker (`://`, `@`, `+`), or, for text, when it carries any of
/// those markers. Otherwise returns `current` unchanged. Only meant to run on
/// category change; plain text containing `+` is a known false positive.
pub fn suggest_default(category: ContentCategory, current: &str) -> String {
    let replace = match category {
        ContentCategory::Url => !current.contains("://"),
        ContentCategory::Email => !current.contains('@'),
        ContentCategory::Phone => !current.contains('+'),
        ContentCategory::Text => {
            current.contains("://") || current.contains('@') || current.contains('+')
        }
    };

    if current.is_empty() || replace {
        category.sample().to_string()
    } else {
        current.to_string()
    }
}
