// Dashboard pages. Each page builds a serializable view from the shared
// context and renders it as text or JSON.

pub mod home;
pub mod players;
pub mod teams;

use serde::Serialize;
use thiserror::Error;

use pitchside_core::context::LOOKUP_MISS_GUIDANCE;

/// A selection that names something absent from the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("unknown club '{0}'")]
    UnknownClub(String),

    #[error("no player named '{name}'{}", .club.as_ref().map(|c| format!(" at {c}")).unwrap_or_default())]
    UnknownPlayer { name: String, club: Option<String> },

    #[error("the player table is empty")]
    EmptyTable,
}

/// A rendered page.
pub trait PageView: Serialize {
    fn render_text(&self) -> String;
}

pub fn render<V: PageView>(view: &V, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(view)?)
    } else {
        Ok(view.render_text())
    }
}

/// Shown in place of a page whose data the session does not have yet.
#[derive(Debug, Clone, Serialize)]
pub struct Guidance {
    pub message: &'static str,
}

impl Guidance {
    pub fn lookup_miss() -> Self {
        Self {
            message: LOOKUP_MISS_GUIDANCE,
        }
    }
}

impl PageView for Guidance {
    fn render_text(&self) -> String {
        self.message.to_string()
    }
}

/// Resolve an optional club selection against the table's club list,
/// defaulting to the first club.
pub(crate) fn select_club(clubs: &[String], wanted: Option<&str>) -> Result<String, PageError> {
    match wanted {
        Some(club) => clubs
            .iter()
            .find(|c| c.as_str() == club)
            .cloned()
            .ok_or_else(|| PageError::UnknownClub(club.to_string())),
        None => clubs.first().cloned().ok_or(PageError::EmptyTable),
    }
}

/// `label: value` line with the label padded to `width`.
pub(crate) fn field(out: &mut String, label: &str, value: impl std::fmt::Display, width: usize) {
    out.push_str(&format!("{label:<width$} {value}\n"));
}

pub(crate) fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
