//! User-facing wording for raw audit-engine findings.
//!
//! Everything here is static data and pure functions: the same input always
//! yields the same [`Translation`].

pub mod tables;
pub mod topics;

use serde::Serialize;
use tables::{lookup, CODE_TITLES, CODE_TOPICS, TITLE_TRANSLATIONS};
pub use topics::Topic;

pub const TITLE_PLACEHOLDER: &str = "Problème détecté";
pub const HELP_PLACEHOLDER: &str = "Problème d'accessibilité détecté";

const LEARN_MORE_MARKER: &str = "[learn more";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub title: String,
    pub help: String,
}

/// Translate a finding into a title and remediation text.
///
/// Exact rule-code and title tables are consulted first, then keyword heuristics
/// over the raw texts. Unknown findings keep their raw description, cut at the
/// "Learn more" link.
pub fn translate(code: &str, raw_title: &str, raw_description: &str) -> Translation {
    let code = code.trim();
    let raw_title = raw_title.trim();

    let topic = lookup(CODE_TOPICS, code)
        .or_else(|| Topic::detect(&[raw_description, raw_title]));

    let title = lookup(CODE_TOPICS, code)
        .map(|t| t.explanation().title)
        .or_else(|| lookup(CODE_TITLES, code))
        .or_else(|| lookup(TITLE_TRANSLATIONS, raw_title))
        .map(str::to_string)
        .unwrap_or_else(|| {
            if raw_title.is_empty() {
                TITLE_PLACEHOLDER.to_string()
            } else {
                raw_title.to_string()
            }
        });

    let help = match topic {
        Some(topic) => topic.render_help(),
        None => simplify_description(raw_description),
    };

    Translation { title, help }
}

/// Strip the trailing "[Learn more](...)" link, falling back to a placeholder.
fn simplify_description(desc: &str) -> String {
    let cut = desc
        .to_ascii_lowercase()
        .find(LEARN_MORE_MARKER)
        .and_then(|idx| desc.get(..idx))
        .unwrap_or(desc)
        .trim();

    if cut.is_empty() {
        HELP_PLACEHOLDER.to_string()
    } else {
        cut.to_string()
    }
}
