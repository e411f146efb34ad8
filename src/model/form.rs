// File: ./src/model/form.rs
// Form values behind the card wizard, the step -> field mapping and the
// per-field validation rules.
use crate::format::{Time12, parse_iso_date};
use crate::locale::CardLocale;
use crate::model::card::{CardConfiguration, NameOrder};
use crate::model::contacts::ContactList;
use rust_i18n::t;
use std::fmt;
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

pub const CARD_DESIGNS: [&str; 2] = ["design1", "design2"];

/// Every editable field of the card form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum CardField {
    CardLanguage,
    CardDesign,
    CardUrl,
    GroomFullName,
    BrideFullName,
    GroomNickname,
    BrideNickname,
    NameOrder,
    CoupleHashTag,
    FatherName,
    MotherName,
    Email,
    EventType,
    EventDate,
    HijriDate,
    StartTime,
    EndTime,
    AddressLine1,
    AddressLine2,
    GoogleMapsLink,
    WazeLink,
}

impl CardField {
    /// camelCase identifier, matching the JSON field of the saved card.
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn is_required(self) -> bool {
        !matches!(
            self,
            CardField::CoupleHashTag
                | CardField::Email
                | CardField::HijriDate
                | CardField::AddressLine2
                | CardField::GoogleMapsLink
                | CardField::WazeLink
        )
    }

    pub fn label(self, locale: CardLocale) -> String {
        let l = locale.code();
        match self {
            CardField::CardLanguage => t!("fields.cardLanguage", locale = l),
            CardField::CardDesign => t!("fields.cardDesign", locale = l),
            CardField::CardUrl => t!("fields.cardUrl", locale = l),
            CardField::GroomFullName => t!("fields.groomFullName", locale = l),
            CardField::BrideFullName => t!("fields.brideFullName", locale = l),
            CardField::GroomNickname => t!("fields.groomNickname", locale = l),
            CardField::BrideNickname => t!("fields.brideNickname", locale = l),
            CardField::NameOrder => t!("fields.nameOrder", locale = l),
            CardField::CoupleHashTag => t!("fields.coupleHashTag", locale = l),
            CardField::FatherName => t!("fields.fatherName", locale = l),
            CardField::MotherName => t!("fields.motherName", locale = l),
            CardField::Email => t!("fields.email", locale = l),
            CardField::EventType => t!("fields.eventType", locale = l),
            CardField::EventDate => t!("fields.eventDate", locale = l),
            CardField::HijriDate => t!("fields.hijriDate", locale = l),
            CardField::StartTime => t!("fields.startTime", locale = l),
            CardField::EndTime => t!("fields.endTime", locale = l),
            CardField::AddressLine1 => t!("fields.addressLine1", locale = l),
            CardField::AddressLine2 => t!("fields.addressLine2", locale = l),
            CardField::GoogleMapsLink => t!("fields.googleMapsLink", locale = l),
            CardField::WazeLink => t!("fields.wazeLink", locale = l),
        }
        .into_owned()
    }
}

/// The pages of the card wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FormStep {
    CardConfig,
    Couple,
    Event,
    Location,
    Contacts,
}

impl FormStep {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Fields that must pass validation before leaving this step. Optional
    /// fields are only checked on final submission.
    pub fn fields(self) -> &'static [CardField] {
        use CardField::*;
        match self {
            FormStep::CardConfig => &[CardLanguage, CardDesign, CardUrl],
            FormStep::Couple => &[
                GroomFullName,
                BrideFullName,
                GroomNickname,
                BrideNickname,
                NameOrder,
                FatherName,
                MotherName,
            ],
            FormStep::Event => &[EventType, EventDate, StartTime, EndTime],
            FormStep::Location => &[AddressLine1],
            FormStep::Contacts => &[],
        }
    }

    /// Every field shown on the page, required or not.
    pub fn all_fields(self) -> &'static [CardField] {
        use CardField::*;
        match self {
            FormStep::CardConfig => &[CardLanguage, CardDesign, CardUrl],
            FormStep::Couple => &[
                GroomFullName,
                BrideFullName,
                GroomNickname,
                BrideNickname,
                NameOrder,
                CoupleHashTag,
                FatherName,
                MotherName,
                Email,
            ],
            FormStep::Event => &[EventType, EventDate, HijriDate, StartTime, EndTime],
            FormStep::Location => &[AddressLine1, AddressLine2, GoogleMapsLink, WazeLink],
            FormStep::Contacts => &[],
        }
    }

    pub fn title(self, locale: CardLocale) -> String {
        let l = locale.code();
        match self {
            FormStep::CardConfig => t!("steps.card.title", locale = l),
            FormStep::Couple => t!("steps.couple.title", locale = l),
            FormStep::Event => t!("steps.event.title", locale = l),
            FormStep::Location => t!("steps.location.title", locale = l),
            FormStep::Contacts => t!("steps.contacts.title", locale = l),
        }
        .into_owned()
    }

    pub fn description(self, locale: CardLocale) -> String {
        let l = locale.code();
        match self {
            FormStep::CardConfig => t!("steps.card.description", locale = l),
            FormStep::Couple => t!("steps.couple.description", locale = l),
            FormStep::Event => t!("steps.event.description", locale = l),
            FormStep::Location => t!("steps.location.description", locale = l),
            FormStep::Contacts => t!("steps.contacts.description", locale = l),
        }
        .into_owned()
    }
}

/// Selectable event types. The stored value is the Malay keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum EventKind {
    Engagement,
    Wedding,
    Reception,
}

impl EventKind {
    pub fn value(self) -> &'static str {
        match self {
            EventKind::Engagement => "pertunangan",
            EventKind::Wedding => "perkahwinan",
            EventKind::Reception => "resepsi",
        }
    }

    pub fn label(self, locale: CardLocale) -> String {
        let l = locale.code();
        match self {
            EventKind::Engagement => t!("event_types.engagement", locale = l),
            EventKind::Wedding => t!("event_types.wedding", locale = l),
            EventKind::Reception => t!("event_types.reception", locale = l),
        }
        .into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    InvalidSlug,
    InvalidDate,
    InvalidTime,
    InvalidLink,
    InvalidEmail,
    InvalidChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CardField,
    pub kind: FieldErrorKind,
}

impl FieldError {
    fn new(field: CardField, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    /// Message shown under the field.
    pub fn message(&self, locale: CardLocale) -> String {
        let l = locale.code();
        match self.kind {
            FieldErrorKind::Required if self.field == CardField::CardDesign => {
                t!("validation.select_design", locale = l)
            }
            FieldErrorKind::Required => {
                t!("validation.required", locale = l, field = self.field.label(locale))
            }
            FieldErrorKind::InvalidSlug => t!("validation.url_format", locale = l),
            FieldErrorKind::InvalidDate => t!("validation.invalid_date", locale = l),
            FieldErrorKind::InvalidTime => t!("validation.invalid_time", locale = l),
            FieldErrorKind::InvalidLink => t!("validation.invalid_link", locale = l),
            FieldErrorKind::InvalidEmail => t!("validation.invalid_email", locale = l),
            FieldErrorKind::InvalidChoice => t!("validation.invalid_choice", locale = l),
        }
        .into_owned()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.field.key(), self.kind)
    }
}

impl std::error::Error for FieldError {}

/// Card url slug: lowercase ASCII letters, digits and hyphens.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Absolute http(s) link with a host.
pub fn is_valid_link(s: &str) -> bool {
    match s.parse::<http::Uri>() {
        Ok(uri) => matches!(uri.scheme_str(), Some("http" | "https")) && uri.host().is_some(),
        Err(_) => false,
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dotted domain whose
/// labels are all non-empty.
pub fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Values typed into the wizard. Everything is kept as entered; parsing
/// happens in validation and in `to_card`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardForm {
    pub card_language: CardLocale,
    pub card_design: String,
    pub card_url: String,
    pub groom_full_name: String,
    pub bride_full_name: String,
    pub groom_nickname: String,
    pub bride_nickname: String,
    pub name_order: NameOrder,
    pub couple_hash_tag: String,
    pub father_name: String,
    pub mother_name: String,
    pub email: String,
    pub event_type: String,
    pub event_date: String,
    pub hijri_date: String,
    pub start_time: String,
    pub end_time: String,
    pub address_line1: String,
    pub address_line2: String,
    pub google_maps_link: String,
    pub waze_link: String,
}

impl Default for CardForm {
    fn default() -> Self {
        Self {
            card_language: CardLocale::Malay,
            card_design: String::new(),
            card_url: String::new(),
            groom_full_name: String::new(),
            bride_full_name: String::new(),
            groom_nickname: String::new(),
            bride_nickname: String::new(),
            name_order: NameOrder::MaleFemale,
            couple_hash_tag: String::new(),
            father_name: String::new(),
            mother_name: String::new(),
            email: String::new(),
            event_type: EventKind::Wedding.value().to_string(),
            event_date: String::new(),
            hijri_date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            google_maps_link: String::new(),
            waze_link: String::new(),
        }
    }
}

fn opt(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl CardForm {
    pub fn from_card(card: &CardConfiguration) -> Self {
        let or_empty = |o: &Option<String>| o.clone().unwrap_or_default();
        Self {
            card_language: card.card_language,
            card_design: card.card_design.clone(),
            card_url: card.card_url.clone(),
            groom_full_name: card.groom_full_name.clone(),
            bride_full_name: card.bride_full_name.clone(),
            groom_nickname: card.groom_nickname.clone(),
            bride_nickname: card.bride_nickname.clone(),
            name_order: card.name_order,
            couple_hash_tag: or_empty(&card.couple_hash_tag),
            father_name: or_empty(&card.father_name),
            mother_name: or_empty(&card.mother_name),
            email: or_empty(&card.email),
            event_type: card.event_type.clone(),
            event_date: card.event_date.clone(),
            hijri_date: or_empty(&card.hijri_date),
            start_time: card.start_time.clone(),
            end_time: card.end_time.clone(),
            address_line1: card.address_line1.clone(),
            address_line2: or_empty(&card.address_line2),
            google_maps_link: or_empty(&card.google_maps_link),
            waze_link: or_empty(&card.waze_link),
        }
    }

    fn text(&self, field: CardField) -> Option<&String> {
        Some(match field {
            CardField::CardLanguage | CardField::NameOrder => return None,
            CardField::CardDesign => &self.card_design,
            CardField::CardUrl => &self.card_url,
            CardField::GroomFullName => &self.groom_full_name,
            CardField::BrideFullName => &self.bride_full_name,
            CardField::GroomNickname => &self.groom_nickname,
            CardField::BrideNickname => &self.bride_nickname,
            CardField::CoupleHashTag => &self.couple_hash_tag,
            CardField::FatherName => &self.father_name,
            CardField::MotherName => &self.mother_name,
            CardField::Email => &self.email,
            CardField::EventType => &self.event_type,
            CardField::EventDate => &self.event_date,
            CardField::HijriDate => &self.hijri_date,
            CardField::StartTime => &self.start_time,
            CardField::EndTime => &self.end_time,
            CardField::AddressLine1 => &self.address_line1,
            CardField::AddressLine2 => &self.address_line2,
            CardField::GoogleMapsLink => &self.google_maps_link,
            CardField::WazeLink => &self.waze_link,
        })
    }

    fn text_mut(&mut self, field: CardField) -> Option<&mut String> {
        Some(match field {
            CardField::CardLanguage | CardField::NameOrder => return None,
            CardField::CardDesign => &mut self.card_design,
            CardField::CardUrl => &mut self.card_url,
            CardField::GroomFullName => &mut self.groom_full_name,
            CardField::BrideFullName => &mut self.bride_full_name,
            CardField::GroomNickname => &mut self.groom_nickname,
            CardField::BrideNickname => &mut self.bride_nickname,
            CardField::CoupleHashTag => &mut self.couple_hash_tag,
            CardField::FatherName => &mut self.father_name,
            CardField::MotherName => &mut self.mother_name,
            CardField::Email => &mut self.email,
            CardField::EventType => &mut self.event_type,
            CardField::EventDate => &mut self.event_date,
            CardField::HijriDate => &mut self.hijri_date,
            CardField::StartTime => &mut self.start_time,
            CardField::EndTime => &mut self.end_time,
            CardField::AddressLine1 => &mut self.address_line1,
            CardField::AddressLine2 => &mut self.address_line2,
            CardField::GoogleMapsLink => &mut self.google_maps_link,
            CardField::WazeLink => &mut self.waze_link,
        })
    }

    /// Current value as text.
    pub fn value(&self, field: CardField) -> String {
        match field {
            CardField::CardLanguage => self.card_language.code().to_string(),
            CardField::NameOrder => self.name_order.as_str().to_string(),
            _ => self.text(field).cloned().unwrap_or_default(),
        }
    }

    /// Store a value. Only the enum-backed fields can reject input here;
    /// text fields are checked by `validate_field`.
    pub fn set(&mut self, field: CardField, value: &str) -> Result<(), FieldError> {
        match field {
            CardField::CardLanguage => {
                self.card_language = value
                    .parse()
                    .map_err(|_| FieldError::new(field, FieldErrorKind::InvalidChoice))?;
            }
            CardField::NameOrder => {
                self.name_order = NameOrder::parse(value)
                    .ok_or_else(|| FieldError::new(field, FieldErrorKind::InvalidChoice))?;
            }
            _ => {
                if let Some(slot) = self.text_mut(field) {
                    *slot = value.to_string();
                }
            }
        }
        Ok(())
    }

    pub fn validate_field(&self, field: CardField) -> Result<(), FieldError> {
        let Some(raw) = self.text(field) else {
            // Enum-backed, always holds a valid choice.
            return Ok(());
        };
        let value = raw.trim();
        let fail = |kind| Err(FieldError::new(field, kind));

        if value.is_empty() {
            return if field.is_required() {
                fail(FieldErrorKind::Required)
            } else {
                Ok(())
            };
        }

        match field {
            CardField::CardUrl if !is_valid_slug(value) => fail(FieldErrorKind::InvalidSlug),
            CardField::EventDate if parse_iso_date(value).is_err() => {
                fail(FieldErrorKind::InvalidDate)
            }
            CardField::StartTime | CardField::EndTime if Time12::parse(value).is_err() => {
                fail(FieldErrorKind::InvalidTime)
            }
            CardField::GoogleMapsLink | CardField::WazeLink if !is_valid_link(value) => {
                fail(FieldErrorKind::InvalidLink)
            }
            CardField::Email if !is_valid_email(value) => fail(FieldErrorKind::InvalidEmail),
            _ => Ok(()),
        }
    }

    /// Errors for the required fields of one step, in field order.
    pub fn validate_step(&self, step: FormStep) -> Vec<FieldError> {
        step.fields()
            .iter()
            .filter_map(|f| self.validate_field(*f).err())
            .collect()
    }

    pub fn validate_all(&self) -> Vec<FieldError> {
        CardField::iter()
            .filter_map(|f| self.validate_field(f).err())
            .collect()
    }

    /// Build the card record. Times are normalised to padded `"HH:MM AM"`.
    pub fn to_card(&self, contacts: &ContactList) -> Result<CardConfiguration, Vec<FieldError>> {
        let errors = self.validate_all();
        if !errors.is_empty() {
            return Err(errors);
        }

        let normalize_time = |s: &str| {
            Time12::parse(s)
                .map(|t| t.to_string())
                .unwrap_or_else(|_| s.trim().to_string())
        };

        Ok(CardConfiguration {
            card_language: self.card_language,
            card_design: self.card_design.trim().to_string(),
            card_url: self.card_url.trim().to_string(),
            groom_full_name: self.groom_full_name.trim().to_string(),
            bride_full_name: self.bride_full_name.trim().to_string(),
            groom_nickname: self.groom_nickname.trim().to_string(),
            bride_nickname: self.bride_nickname.trim().to_string(),
            name_order: self.name_order,
            couple_hash_tag: opt(self.couple_hash_tag.trim_start_matches('#')),
            father_name: opt(&self.father_name),
            mother_name: opt(&self.mother_name),
            email: opt(&self.email),
            event_type: self.event_type.trim().to_string(),
            event_date: self.event_date.trim().to_string(),
            hijri_date: opt(&self.hijri_date),
            start_time: normalize_time(&self.start_time),
            end_time: normalize_time(&self.end_time),
            address_line1: self.address_line1.trim().to_string(),
            address_line2: opt(&self.address_line2),
            google_maps_link: opt(&self.google_maps_link),
            waze_link: opt(&self.waze_link),
            contacts: contacts.filled(),
        })
    }
}
