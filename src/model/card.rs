// File: ./src/model/card.rs
// The card configuration record produced by the form and read by the renderer.
use crate::error::FormatResult;
use crate::format::{Time12, parse_iso_date};
use crate::locale::CardLocale;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Which partner is named first on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
pub enum NameOrder {
    #[default]
    #[serde(rename = "male-female")]
    MaleFemale,
    #[serde(rename = "female-male")]
    FemaleMale,
}

impl NameOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            NameOrder::MaleFemale => "male-female",
            NameOrder::FemaleMale => "female-male",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "male-female" => Some(NameOrder::MaleFemale),
            "female-male" => Some(NameOrder::FemaleMale),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Person<'a> {
    pub full_name: &'a str,
    pub nickname: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Click-to-chat link; everything but digits is stripped from the number.
    pub fn whatsapp_link(&self) -> String {
        let digits: String = self.phone.chars().filter(|c| c.is_ascii_digit()).collect();
        format!("https://wa.me/{}", digits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfiguration {
    #[serde(default)]
    pub card_language: CardLocale,
    #[serde(default)]
    pub card_design: String,
    #[serde(default)]
    pub card_url: String,

    pub groom_full_name: String,
    pub bride_full_name: String,
    pub groom_nickname: String,
    pub bride_nickname: String,
    #[serde(default)]
    pub name_order: NameOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple_hash_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub event_type: String,
    /// ISO `YYYY-MM-DD`
    pub event_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hijri_date: Option<String>,
    /// 12-hour display form, e.g. "11:00 AM"
    pub start_time: String,
    pub end_time: String,

    // Older records carry a single `address` field.
    #[serde(alias = "address")]
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waze_link: Option<String>,

    #[serde(default)]
    pub contacts: Vec<Contact>,
}

static SAMPLE_CARD: Lazy<CardConfiguration> = Lazy::new(|| CardConfiguration {
    card_language: CardLocale::Malay,
    card_design: "design1".to_string(),
    card_url: "ahmad-nora".to_string(),
    groom_full_name: "Ahmad bin Abdullah".to_string(),
    bride_full_name: "Nora binti Ali".to_string(),
    groom_nickname: "Ahmad".to_string(),
    bride_nickname: "Nora".to_string(),
    name_order: NameOrder::MaleFemale,
    couple_hash_tag: None,
    father_name: Some("Abdullah bin Hassan".to_string()),
    mother_name: Some("Fatimah binti Ibrahim".to_string()),
    email: None,
    event_type: "Majlis Perkahwinan".to_string(),
    event_date: "2026-06-15".to_string(),
    hijri_date: Some("15 Ramadan 1448H".to_string()),
    start_time: "11:00 AM".to_string(),
    end_time: "4:00 PM".to_string(),
    address_line1: "Dewan Serbaguna, Taman Bunga".to_string(),
    address_line2: Some("Jalan Mawar 5, 50000 Kuala Lumpur".to_string()),
    google_maps_link: Some("https://maps.google.com/".to_string()),
    waze_link: Some("https://waze.com/".to_string()),
    contacts: vec![
        Contact::new("Ahmad", "+60123456789"),
        Contact::new("Nora", "+60198765432"),
    ],
});

impl CardConfiguration {
    /// Built-in demo card.
    pub fn sample() -> Self {
        SAMPLE_CARD.clone()
    }

    fn groom(&self) -> Person<'_> {
        Person {
            full_name: &self.groom_full_name,
            nickname: &self.groom_nickname,
        }
    }

    fn bride(&self) -> Person<'_> {
        Person {
            full_name: &self.bride_full_name,
            nickname: &self.bride_nickname,
        }
    }

    /// Partner named first, per `name_order`.
    pub fn first_person(&self) -> Person<'_> {
        match self.name_order {
            NameOrder::MaleFemale => self.groom(),
            NameOrder::FemaleMale => self.bride(),
        }
    }

    pub fn second_person(&self) -> Person<'_> {
        match self.name_order {
            NameOrder::MaleFemale => self.bride(),
            NameOrder::FemaleMale => self.groom(),
        }
    }

    /// Local wall-clock start of the event.
    pub fn event_start(&self) -> FormatResult<NaiveDateTime> {
        let date = parse_iso_date(&self.event_date)?;
        let time = Time12::parse(&self.start_time)?.to_naive_time()?;
        Ok(date.and_time(time))
    }

    pub fn has_parents(&self) -> bool {
        self.father_name.is_some() || self.mother_name.is_some()
    }

    pub fn has_map_links(&self) -> bool {
        self.google_maps_link.is_some() || self.waze_link.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_order_swaps_people() {
        let mut card = CardConfiguration::sample();
        assert_eq!(card.first_person().nickname, "Ahmad");
        assert_eq!(card.second_person().nickname, "Nora");

        card.name_order = NameOrder::FemaleMale;
        assert_eq!(card.first_person().full_name, "Nora binti Ali");
        assert_eq!(card.second_person().full_name, "Ahmad bin Abdullah");
    }

    #[test]
    fn test_whatsapp_link_strips_formatting() {
        let c = Contact::new("Ahmad", "+60 12-345 6789");
        assert_eq!(c.whatsapp_link(), "https://wa.me/60123456789");
    }

    #[test]
    fn test_event_start_combines_date_and_time() {
        let card = CardConfiguration::sample();
        let start = card.event_start().unwrap();
        assert_eq!(start.to_string(), "2026-06-15 11:00:00");
    }

    #[test]
    fn test_deserializes_legacy_address_field() {
        let json = r#"{
            "cardLanguage": "ms",
            "groomFullName": "Faris bin Wahab",
            "brideFullName": "Sarah binti Ahmad",
            "groomNickname": "Faris",
            "brideNickname": "Sarah",
            "nameOrder": "female-male",
            "eventType": "Majlis Perkahwinan",
            "eventDate": "2026-06-15",
            "startTime": "11:00 AM",
            "endTime": "4:00 PM",
            "address": "Dewan Serbaguna, Taman Gedung"
        }"#;
        let card: CardConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(card.address_line1, "Dewan Serbaguna, Taman Gedung");
        assert_eq!(card.name_order, NameOrder::FemaleMale);
        assert!(card.contacts.is_empty());
        assert!(!card.has_parents());
    }
}
