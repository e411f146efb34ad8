// File: ./src/invitation.rs
//! Read-only invitation page built from a saved card.
//!
//! The view starts behind a closed curtain showing only a "click to open"
//! prompt. Opening it reveals the cover (nicknames and short date) and the
//! details (parents, invitation text, full names, venue, date, time, map
//! links and contacts).
use crate::error::{FormatError, FormatResult};
use crate::format::{ShortDate, format_date_long, format_date_short};
use crate::locale::CardLocale;
use crate::model::card::{CardConfiguration, Person};
use crate::model::form::EventKind;
use crate::source::CardSource;
use anyhow::Result;
use rust_i18n::t;
use strum::IntoEnumIterator;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curtain {
    #[default]
    Closed,
    Open,
}

/// A contact row with its click-to-chat link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLine {
    pub name: String,
    pub phone: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationView {
    card: CardConfiguration,
    locale: CardLocale,
    date_short: ShortDate,
    date_long: String,
    curtain: Curtain,
}

impl InvitationView {
    /// View in the card's own language. Fails if the stored event date is
    /// malformed.
    pub fn new(card: CardConfiguration) -> FormatResult<Self> {
        let locale = card.card_language;
        Self::with_locale(card, locale)
    }

    pub fn with_locale(card: CardConfiguration, locale: CardLocale) -> FormatResult<Self> {
        let date_short = format_date_short(&card.event_date, locale)?;
        let date_long = format_date_long(&card.event_date, locale)?;
        Ok(Self {
            card,
            locale,
            date_short,
            date_long,
            curtain: Curtain::Closed,
        })
    }

    pub fn card(&self) -> &CardConfiguration {
        &self.card
    }

    pub fn locale(&self) -> CardLocale {
        self.locale
    }

    pub fn curtain(&self) -> Curtain {
        self.curtain
    }

    /// Opening is one-way; repeated calls do nothing.
    pub fn open_curtain(&mut self) {
        if self.curtain == Curtain::Closed {
            log::debug!("Opening curtain for '{}'", self.card.card_url);
            self.curtain = Curtain::Open;
        }
    }

    pub fn first_person(&self) -> Person<'_> {
        self.card.first_person()
    }

    pub fn second_person(&self) -> Person<'_> {
        self.card.second_person()
    }

    pub fn date_short(&self) -> &ShortDate {
        &self.date_short
    }

    pub fn date_long(&self) -> &str {
        &self.date_long
    }

    /// "MONDAY • 15.06.26"
    pub fn cover_date(&self) -> String {
        format!(
            "{} • {}",
            self.date_short.weekday.to_uppercase(),
            self.date_short.formatted
        )
    }

    /// The stored event type, translated when it is one of the form's
    /// keywords and kept verbatim otherwise.
    pub fn event_label(&self) -> String {
        let raw = self.card.event_type.trim();
        EventKind::iter()
            .find(|k| k.value().eq_ignore_ascii_case(raw))
            .map(|k| k.label(self.locale))
            .unwrap_or_else(|| raw.to_string())
    }

    pub fn time_range(&self) -> String {
        format!("{} - {}", self.card.start_time, self.card.end_time)
    }

    pub fn contacts(&self) -> Vec<ContactLine> {
        self.card
            .contacts
            .iter()
            .map(|c| ContactLine {
                name: c.name.clone(),
                phone: c.phone.clone(),
                link: c.whatsapp_link(),
            })
            .collect()
    }

    /// Text lines of the page, top to bottom. Behind a closed curtain only
    /// the prompt is visible.
    pub fn lines(&self) -> Vec<String> {
        let l = self.locale.code();
        if self.curtain == Curtain::Closed {
            return vec![t!("invitation.click_to_open", locale = l).into_owned()];
        }

        let first = self.first_person();
        let second = self.second_person();
        let event = self.event_label();
        let mut out = Vec::new();

        // Cover
        out.push(t!("invitation.heading", locale = l).to_uppercase());
        out.push(first.nickname.to_uppercase());
        out.push("&".to_string());
        out.push(second.nickname.to_uppercase());
        out.push(self.cover_date());
        out.push(String::new());

        // Details
        out.push(t!("invitation.gratitude", locale = l).into_owned());
        if self.card.has_parents() {
            out.extend(self.card.father_name.iter().cloned());
            out.extend(self.card.mother_name.iter().cloned());
        }
        out.push(t!("invitation.invite", locale = l).into_owned());
        out.push(t!("invitation.honorifics", locale = l).into_owned());
        out.push(t!("invitation.occasion", locale = l, event = event.to_lowercase()).into_owned());
        out.push(String::new());
        out.push(first.full_name.to_uppercase());
        out.push("&".to_string());
        out.push(second.full_name.to_uppercase());
        out.push(String::new());

        out.push(t!("invitation.venue", locale = l).to_uppercase());
        out.push(event);
        match &self.card.address_line2 {
            Some(line2) => {
                out.push(format!("{},", self.card.address_line1));
                out.push(line2.clone());
            }
            None => out.push(self.card.address_line1.clone()),
        }
        out.push(String::new());

        out.push(t!("invitation.date", locale = l).to_uppercase());
        out.push(self.date_long.clone());
        if let Some(hijri) = &self.card.hijri_date {
            out.push(hijri.clone());
        }
        out.push(String::new());

        out.push(t!("invitation.time", locale = l).to_uppercase());
        out.push(self.time_range());

        if self.card.has_map_links() {
            out.push(String::new());
            if let Some(link) = &self.card.google_maps_link {
                out.push(format!("{}: {}", t!("invitation.view_map", locale = l), link));
            }
            if let Some(link) = &self.card.waze_link {
                out.push(format!("Waze: {}", link));
            }
        }
        out.push(String::new());

        out.push(t!("invitation.contact", locale = l).to_uppercase());
        out.push(t!("invitation.inquiries", locale = l).into_owned());
        for c in self.contacts() {
            out.push(format!("{}  {}  ({})", c.name, c.phone, c.link));
        }
        out
    }
}

/// Result of looking up an invitation by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationPage {
    Card(Box<InvitationView>),
    NotFound { id: String },
    /// The card exists but its stored date cannot be displayed.
    Unreadable { id: String, error: FormatError },
}

impl InvitationPage {
    /// Fetch and build the page. A missing card yields the not-found page,
    /// a stored card with a malformed date yields `Unreadable`, and source
    /// failures propagate.
    pub async fn load<S: CardSource>(source: &S, id: &str) -> Result<Self> {
        let Some(card) = source.fetch(id).await? else {
            log::info!("No card found for '{}'", id);
            return Ok(InvitationPage::NotFound { id: id.to_string() });
        };
        match InvitationView::new(card) {
            Ok(view) => Ok(InvitationPage::Card(Box::new(view))),
            Err(e) => {
                log::warn!("Card '{}' cannot be displayed: {}", id, e);
                Ok(InvitationPage::Unreadable {
                    id: id.to_string(),
                    error: e,
                })
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InvitationPage::NotFound { .. })
    }

    pub fn lines(&self, locale: CardLocale) -> Vec<String> {
        match self {
            InvitationPage::Card(view) => view.lines(),
            InvitationPage::NotFound { .. } => {
                let l = locale.code();
                vec![
                    "404".to_string(),
                    t!("not_found.title", locale = l).into_owned(),
                    t!("not_found.message", locale = l).into_owned(),
                ]
            }
            InvitationPage::Unreadable { id, error } => {
                let l = locale.code();
                vec![
                    t!("unreadable.title", locale = l).into_owned(),
                    t!("unreadable.message", locale = l, id = id).into_owned(),
                    error.to_string(),
                ]
            }
        }
    }
}

/// Centre every line in a column of `width` display cells. Lines wider
/// than the column are left as they are.
pub fn render_centered(lines: &[String], width: usize) -> String {
    let mut out = String::new();
    for line in lines {
        let w = UnicodeWidthStr::width(line.as_str());
        if w < width {
            out.push_str(&" ".repeat((width - w) / 2));
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
