// File: src/controller.rs
//! Host side of the card wizard.
//! Owns the form values, the field-error map and the contact editor, and
//! plugs them into a `FormWizard` through `CardStepValidator`. Every front
//! end (the CLI today) talks to this controller instead of touching the
//! form or the wizard directly.
use crate::context::AppContext;
use crate::locale::LocalePreference;
use crate::model::card::CardConfiguration;
use crate::model::contacts::{ContactField, ContactList};
use crate::model::form::{CardField, CardForm, FieldError, FormStep};
use crate::storage::LocalStorage;
use crate::wizard::{AdvanceOutcome, FormWizard, StepValidator};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use strum::{EnumCount, IntoEnumIterator};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Everything the user has typed so far, plus the errors currently shown.
#[derive(Debug, Default)]
pub struct FormSession {
    pub form: CardForm,
    pub contacts: ContactList,
    pub errors: HashMap<CardField, FieldError>,
}

/// Validates the fields of one step against the shared session and records
/// the resulting field errors there.
#[derive(Clone)]
pub struct CardStepValidator {
    session: Arc<Mutex<FormSession>>,
}

impl StepValidator for CardStepValidator {
    async fn validate(&self, step: usize) -> Result<bool> {
        let step = FormStep::from_index(step)
            .ok_or_else(|| anyhow::anyhow!("No form step at index {}", step))?;

        let mut session = self.session.lock().await;
        for field in step.fields() {
            session.errors.remove(field);
        }
        let errors = session.form.validate_step(step);
        let passed = errors.is_empty();
        for err in errors {
            session.errors.insert(err.field, err);
        }
        Ok(passed)
    }
}

pub struct FormController {
    pub session: Arc<Mutex<FormSession>>,
    wizard: FormWizard<CardStepValidator>,
    locale_pref: Arc<dyn LocalePreference>,
    ctx: Arc<dyn AppContext>,
}

impl FormController {
    /// Blank form. The initial card language is reported to the locale
    /// store straight away.
    pub fn new(ctx: Arc<dyn AppContext>, locale_pref: Arc<dyn LocalePreference>) -> Result<Self> {
        Self::with_session(ctx, locale_pref, FormSession::default())
    }

    /// Form pre-filled from an existing card, for editing.
    pub fn for_card(
        ctx: Arc<dyn AppContext>,
        locale_pref: Arc<dyn LocalePreference>,
        card: &CardConfiguration,
    ) -> Result<Self> {
        let session = FormSession {
            form: CardForm::from_card(card),
            contacts: ContactList::from_contacts(&card.contacts),
            errors: HashMap::new(),
        };
        Self::with_session(ctx, locale_pref, session)
    }

    fn with_session(
        ctx: Arc<dyn AppContext>,
        locale_pref: Arc<dyn LocalePreference>,
        session: FormSession,
    ) -> Result<Self> {
        locale_pref.notify(session.form.card_language);
        let session = Arc::new(Mutex::new(session));
        let validator = CardStepValidator {
            session: session.clone(),
        };
        Ok(Self {
            session,
            wizard: FormWizard::new(FormStep::COUNT, validator)?,
            locale_pref,
            ctx,
        })
    }

    pub fn wizard(&self) -> &FormWizard<CardStepValidator> {
        &self.wizard
    }

    pub fn current_form_step(&self) -> FormStep {
        FormStep::from_index(self.wizard.current_step()).unwrap_or(FormStep::CardConfig)
    }

    /// Store a value typed by the user and clear that field's error.
    /// Changing the card language notifies the locale store.
    pub async fn set_field(&self, field: CardField, value: &str) -> Result<(), FieldError> {
        let mut session = self.session.lock().await;
        let before = session.form.card_language;
        session.form.set(field, value)?;
        session.errors.remove(&field);

        let after = session.form.card_language;
        drop(session);
        if after != before {
            self.locale_pref.notify(after);
        }
        Ok(())
    }

    pub async fn field_value(&self, field: CardField) -> String {
        self.session.lock().await.form.value(field)
    }

    pub async fn field_error(&self, field: CardField) -> Option<FieldError> {
        self.session.lock().await.errors.get(&field).cloned()
    }

    /// Errors currently shown on a step, in field order.
    pub async fn step_errors(&self, step: FormStep) -> Vec<FieldError> {
        let session = self.session.lock().await;
        step.all_fields()
            .iter()
            .filter_map(|f| session.errors.get(f).cloned())
            .collect()
    }

    /// Validate one stored value right away, optional fields included, and
    /// record or clear its error.
    pub async fn check_field(&self, field: CardField) -> Result<(), FieldError> {
        let mut session = self.session.lock().await;
        match session.form.validate_field(field) {
            Ok(()) => {
                session.errors.remove(&field);
                Ok(())
            }
            Err(err) => {
                session.errors.insert(field, err.clone());
                Err(err)
            }
        }
    }

    /// Move the wizard back to the first step showing a field error, so a
    /// failed submission can be corrected without losing the session.
    pub async fn reopen_first_error(&self) -> Option<FormStep> {
        let step = {
            let session = self.session.lock().await;
            FormStep::iter().find(|step| {
                step.all_fields()
                    .iter()
                    .any(|f| session.errors.contains_key(f))
            })?
        };
        if !self.wizard.jump_to(step.index()) {
            log::warn!("Cannot reopen step '{}'", step.id());
            return None;
        }
        log::info!("Reopened step '{}' after a failed submission", step.id());
        Some(step)
    }

    pub async fn add_contact(&self) -> Uuid {
        self.session.lock().await.contacts.add()
    }

    pub async fn remove_contact(&self, id: Uuid) -> bool {
        self.session.lock().await.contacts.remove(id)
    }

    pub async fn update_contact(&self, id: Uuid, field: ContactField, value: &str) -> bool {
        self.session.lock().await.contacts.update(id, field, value)
    }

    pub async fn contacts(&self) -> ContactList {
        self.session.lock().await.contacts.clone()
    }

    /// "Next" / "Complete" button.
    pub async fn next(&self) -> AdvanceOutcome {
        self.wizard.advance().await
    }

    /// Build the card from the whole form and save it under its url slug.
    /// Field errors are recorded in the session on failure.
    pub async fn submit(&self) -> Result<CardConfiguration> {
        let card = {
            let mut session = self.session.lock().await;
            match session.form.to_card(&session.contacts) {
                Ok(card) => card,
                Err(errors) => {
                    let count = errors.len();
                    for err in errors {
                        session.errors.insert(err.field, err);
                    }
                    anyhow::bail!("Form has {} invalid field(s)", count);
                }
            }
        };

        LocalStorage::save_card(self.ctx.as_ref(), &card)?;
        log::info!("Saved card '{}'", card.card_url);
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;
    use crate::locale::CardLocale;
    use std::sync::Mutex as StdMutex;

    fn recorder() -> (Arc<StdMutex<Vec<CardLocale>>>, Arc<dyn LocalePreference>) {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = seen.clone();
        let pref: Arc<dyn LocalePreference> =
            Arc::new(move |l: CardLocale| sink.lock().unwrap().push(l));
        (seen, pref)
    }

    #[tokio::test]
    async fn test_language_changes_notify_store() {
        let (seen, pref) = recorder();
        let controller = FormController::new(Arc::new(TestContext::new()), pref).unwrap();

        controller.set_field(CardField::CardLanguage, "en").await.unwrap();
        // Same value again: no second notification.
        controller.set_field(CardField::CardLanguage, "en").await.unwrap();
        controller.set_field(CardField::CardDesign, "design2").await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![CardLocale::Malay, CardLocale::English]
        );
    }

    #[tokio::test]
    async fn test_failed_step_records_field_errors() {
        let (_, pref) = recorder();
        let controller = FormController::new(Arc::new(TestContext::new()), pref).unwrap();

        let outcome = controller.next().await;
        assert_eq!(outcome, AdvanceOutcome::Rejected { step: 0 });
        let errors = controller.step_errors(FormStep::CardConfig).await;
        assert_eq!(errors.len(), 2);

        controller.set_field(CardField::CardDesign, "design1").await.unwrap();
        assert!(controller.field_error(CardField::CardDesign).await.is_none());
        controller.set_field(CardField::CardUrl, "ahmad-nora").await.unwrap();

        assert!(controller.next().await.moved());
        assert_eq!(controller.current_form_step(), FormStep::Couple);
        assert!(controller.step_errors(FormStep::CardConfig).await.is_empty());
    }

    #[tokio::test]
    async fn test_edit_existing_card_and_submit() {
        let ctx = Arc::new(TestContext::new());
        let (_, pref) = recorder();
        let card = CardConfiguration::sample();
        let controller = FormController::for_card(ctx.clone(), pref, &card).unwrap();

        for _ in 0..FormStep::COUNT - 1 {
            assert!(controller.next().await.moved());
        }
        assert_eq!(controller.next().await, AdvanceOutcome::Completed);

        let saved = controller.submit().await.unwrap();
        assert_eq!(saved.card_url, card.card_url);
        let loaded = LocalStorage::load_card(ctx.as_ref(), &card.card_url).unwrap();
        assert_eq!(loaded, Some(saved));
    }

    #[tokio::test]
    async fn test_failed_submit_reopens_step_and_can_be_retried() {
        let ctx = Arc::new(TestContext::new());
        let (_, pref) = recorder();
        let controller =
            FormController::for_card(ctx.clone(), pref, &CardConfiguration::sample()).unwrap();
        controller.set_field(CardField::WazeLink, "waze").await.unwrap();

        for _ in 0..FormStep::COUNT - 1 {
            assert!(controller.next().await.moved());
        }
        assert_eq!(controller.next().await, AdvanceOutcome::Completed);

        assert!(controller.submit().await.is_err());
        assert!(LocalStorage::load_card(ctx.as_ref(), "ahmad-nora").unwrap().is_none());
        assert_eq!(
            controller.reopen_first_error().await,
            Some(FormStep::Location)
        );
        assert_eq!(controller.current_form_step(), FormStep::Location);
        assert_eq!(
            controller.step_errors(FormStep::Location).await[0].field,
            CardField::WazeLink
        );

        controller
            .set_field(CardField::WazeLink, "https://waze.com/ul?q=dewan")
            .await
            .unwrap();
        assert!(controller.check_field(CardField::WazeLink).await.is_ok());
        assert_eq!(controller.reopen_first_error().await, None);

        let saved = controller.submit().await.unwrap();
        assert_eq!(saved.waze_link.as_deref(), Some("https://waze.com/ul?q=dewan"));
        assert_eq!(
            LocalStorage::load_card(ctx.as_ref(), "ahmad-nora").unwrap(),
            Some(saved)
        );
    }

    #[tokio::test]
    async fn test_check_field_reports_optional_errors() {
        let (_, pref) = recorder();
        let controller = FormController::new(Arc::new(TestContext::new()), pref).unwrap();
        assert!(controller.check_field(CardField::Email).await.is_ok());

        controller.set_field(CardField::Email, "sarah@").await.unwrap();
        let err = controller.check_field(CardField::Email).await.unwrap_err();
        assert_eq!(controller.field_error(CardField::Email).await, Some(err));
        assert_eq!(controller.step_errors(FormStep::Couple).await.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_with_blank_form_fails() {
        let (_, pref) = recorder();
        let controller = FormController::new(Arc::new(TestContext::new()), pref).unwrap();
        assert!(controller.submit().await.is_err());
        assert!(controller.field_error(CardField::GroomFullName).await.is_some());
    }
}
