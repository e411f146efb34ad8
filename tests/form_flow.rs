// Driving the card wizard end to end through the form controller.
use serial_test::serial;
use std::sync::{Arc, Mutex};
use strum::EnumCount;
use wedcard::config::Config;
use wedcard::context::{AppContext, TestContext};
use wedcard::controller::FormController;
use wedcard::locale::{CardLocale, ConfigLocaleStore, LocalePreference};
use wedcard::model::{CardField, ContactField, FieldErrorKind, FormStep};
use wedcard::storage::LocalStorage;
use wedcard::wizard::{AdvanceOutcome, BackOutcome};

async fn fill(controller: &FormController, values: &[(CardField, &str)]) {
    for (field, value) in values {
        controller.set_field(*field, value).await.unwrap();
    }
}

#[tokio::test]
#[serial]
async fn test_fill_every_step_and_save() {
    let ctx = Arc::new(TestContext::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let pref: Arc<dyn LocalePreference> =
        Arc::new(move |l: CardLocale| sink.lock().unwrap().push(l));
    let controller = FormController::new(ctx.clone(), pref).unwrap();
    assert_eq!(controller.wizard().back(), BackOutcome::Exit);

    fill(
        &controller,
        &[
            (CardField::CardLanguage, "en"),
            (CardField::CardDesign, "design2"),
            (CardField::CardUrl, "faris-sarah"),
        ],
    )
    .await;
    assert!(controller.next().await.moved());

    // Couple step rejects until every required name is present.
    assert_eq!(controller.next().await, AdvanceOutcome::Rejected { step: 1 });
    assert_eq!(
        controller
            .field_error(CardField::FatherName)
            .await
            .map(|e| e.kind),
        Some(FieldErrorKind::Required)
    );
    fill(
        &controller,
        &[
            (CardField::GroomFullName, "Faris bin Wahab"),
            (CardField::BrideFullName, "Sarah binti Ahmad"),
            (CardField::GroomNickname, "Faris"),
            (CardField::BrideNickname, "Sarah"),
            (CardField::NameOrder, "female-male"),
            (CardField::FatherName, "Wahab bin Hassan"),
            (CardField::MotherName, "Siti binti Samad"),
        ],
    )
    .await;
    assert!(controller.next().await.moved());

    fill(
        &controller,
        &[
            (CardField::EventType, "resepsi"),
            (CardField::EventDate, "2026-06-15"),
            (CardField::StartTime, "11:00 AM"),
            (CardField::EndTime, "4:00 PM"),
        ],
    )
    .await;
    assert!(controller.next().await.moved());

    // Jump back to the couple step. The location step was never passed, so
    // the way back there is through "next" again.
    assert!(controller.wizard().jump_to(1));
    assert_eq!(controller.current_form_step(), FormStep::Couple);
    assert!(!controller.wizard().jump_to(3));
    assert!(controller.wizard().jump_to(2));
    assert!(controller.next().await.moved());
    assert_eq!(controller.current_form_step(), FormStep::Location);

    fill(
        &controller,
        &[
            (CardField::AddressLine1, "Dewan Serbaguna, Taman Gedung"),
            (CardField::WazeLink, "https://waze.com/ul?q=taman-gedung"),
        ],
    )
    .await;
    assert!(controller.next().await.moved());

    let contacts = controller.contacts().await;
    let row = contacts.iter().next().unwrap().id;
    assert!(!controller.remove_contact(row).await);
    controller.update_contact(row, ContactField::Name, "Faris").await;
    controller.update_contact(row, ContactField::Phone, "+60123456789").await;

    assert_eq!(controller.next().await, AdvanceOutcome::Completed);
    assert_eq!(controller.wizard().completed_steps().len(), FormStep::COUNT);

    let card = controller.submit().await.unwrap();
    assert_eq!(card.event_type, "resepsi");
    assert_eq!(card.end_time, "04:00 PM");
    assert_eq!(
        LocalStorage::load_card(ctx.as_ref(), "faris-sarah").unwrap(),
        Some(card)
    );
    assert_eq!(
        *seen.lock().unwrap(),
        vec![CardLocale::Malay, CardLocale::English]
    );
}

#[tokio::test]
#[serial]
async fn test_language_choice_reaches_config_file() {
    let ctx = Arc::new(TestContext::new());
    let shared: Arc<dyn AppContext> = ctx.clone();
    let pref = Arc::new(ConfigLocaleStore::new(shared.clone()));
    let controller = FormController::new(shared, pref).unwrap();

    controller
        .set_field(CardField::CardLanguage, "en")
        .await
        .unwrap();

    // Persistence runs on a blocking task; poll until it lands.
    let mut saved = None;
    for _ in 0..100 {
        if let Ok(config) = Config::load(ctx.as_ref())
            && config.locale.as_deref() == Some("en")
        {
            saved = config.locale;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(saved.as_deref(), Some("en"));
}
