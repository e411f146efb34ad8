use anyhow::{Context, Result};
use rust_i18n::t;
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::time::Duration;
use wedcard::config::Config;
use wedcard::context::{AppContext, StandardContext};
use wedcard::controller::FormController;
use wedcard::countdown::CountdownTicker;
use wedcard::format::{Time12, format_date_long, format_date_short, to_12_hour, to_24_hour};
use wedcard::invitation::{InvitationPage, render_centered};
use wedcard::locale::{CardLocale, ConfigLocaleStore};
use wedcard::model::{CardField, ContactField, FormStep};
use wedcard::source::{CardSource, LocalCardStore, SampleSource};
use wedcard::storage::LocalStorage;
use wedcard::wizard::{AdvanceOutcome, BackOutcome};

// t!() resolves catalogs per crate, so the binary loads its own copy.
rust_i18n::i18n!("locales", fallback = "en");

const PAGE_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // WEDCARD_HOME keeps config, cards and logs under one directory.
    let ctx: Arc<dyn AppContext> =
        Arc::new(StandardContext::new(env::var_os("WEDCARD_HOME").map(PathBuf::from)));

    let config = match Config::load_or_default(ctx.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Ignoring unreadable config: {:#}", e);
            Config::default()
        }
    };
    init_logging(ctx.as_ref(), &config);

    let ui_locale = if config.locale.is_some() {
        config.preferred_locale()
    } else {
        CardLocale::from_system()
    };

    match args.get(1).map(String::as_str) {
        None | Some("--help") | Some("-h") | Some("help") => {
            print_help();
            Ok(())
        }
        Some("new") => run_wizard(ctx, &config, ui_locale).await,
        Some("list") => {
            for id in LocalStorage::list_cards(ctx.as_ref())? {
                println!("{}", id);
            }
            Ok(())
        }
        Some("show") => {
            let id = required_arg(&args, 2, "show <id>")?;
            show(ctx, id, ui_locale).await
        }
        Some("countdown") => {
            let id = required_arg(&args, 2, "countdown <id>")?;
            countdown(ctx, id, &config).await
        }
        Some("time") => {
            let value = required_arg(&args, 2, "time <HH:MM | HH:MM AM>")?;
            convert_time(value)
        }
        Some("date") => {
            let iso = required_arg(&args, 2, "date <YYYY-MM-DD> [ms|en]")?;
            let locale = match args.get(3) {
                Some(code) => code
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Unknown locale '{}'", code))?,
                None => ui_locale,
            };
            let short = format_date_short(iso, locale)?;
            println!("{} {}", short.weekday, short.formatted);
            println!("{}", format_date_long(iso, locale)?);
            Ok(())
        }
        Some(other) => {
            print_help();
            anyhow::bail!("Unknown command '{}'", other)
        }
    }
}

fn required_arg<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Usage: wedcard {}", usage))
}

fn init_logging(ctx: &dyn AppContext, config: &Config) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        config.level_filter(),
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = ctx.get_log_file_path()
        && let Ok(file) = File::create(&path)
    {
        loggers.push(WriteLogger::new(
            log::LevelFilter::Debug,
            LogConfig::default(),
            file,
        ));
    }
    // Only fails if a logger is already installed.
    let _ = CombinedLogger::init(loggers);
}

fn prompt_string(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        anyhow::bail!("Input closed");
    }
    Ok(input.trim().to_string())
}

async fn run_wizard(
    ctx: Arc<dyn AppContext>,
    config: &Config,
    ui_locale: CardLocale,
) -> Result<()> {
    let pref = Arc::new(ConfigLocaleStore::new(ctx.clone()));
    let controller = FormController::new(ctx, pref)?;
    let l = ui_locale.code();

    let defaults = [
        (CardField::CardLanguage, config.default_card_language.code()),
        (CardField::CardDesign, config.default_card_design.as_str()),
    ];
    for (field, value) in defaults {
        if let Err(e) = controller.set_field(field, value).await {
            log::warn!("Ignoring configured default for {}: {}", field.key(), e);
        }
    }

    loop {
        let step = controller.current_form_step();
        let wizard = controller.wizard();
        println!();
        println!(
            "[{}/{}] {}  {}",
            step.index() + 1,
            wizard.step_count(),
            step.title(ui_locale),
            progress_bar(wizard.progress(), 20)
        );
        println!("{}", step.description(ui_locale));

        if step == FormStep::Contacts {
            edit_contacts(&controller, ui_locale).await?;
        } else {
            for field in step.all_fields() {
                edit_field(&controller, *field, ui_locale).await?;
            }
        }

        let choice = prompt_string(&format!("{} ", t!("cli.navigate", locale = l)))?;
        let mut parts = choice.split_whitespace();
        match parts.next().unwrap_or("n") {
            "b" | "back" => {
                if wizard.back() == BackOutcome::Exit {
                    println!("{}", t!("cli.cancelled", locale = l));
                    return Ok(());
                }
            }
            "j" | "jump" => {
                let target = parts.next().and_then(|n| n.parse::<usize>().ok());
                let moved = target.is_some_and(|n| n >= 1 && wizard.jump_to(n - 1));
                if !moved {
                    println!("{}", t!("cli.locked_step", locale = l));
                }
            }
            "q" | "quit" => {
                println!("{}", t!("cli.cancelled", locale = l));
                return Ok(());
            }
            // After a failed submission every step is already completed, so
            // "next" on the last page submits again.
            _ if wizard.is_finished() && wizard.is_last_step() => {
                if submit(&controller, ui_locale).await? {
                    return Ok(());
                }
            }
            _ => match controller.next().await {
                AdvanceOutcome::Completed => {
                    if submit(&controller, ui_locale).await? {
                        return Ok(());
                    }
                }
                AdvanceOutcome::Rejected { .. } => {
                    for err in controller.step_errors(step).await {
                        println!("  ! {}", err.message(ui_locale));
                    }
                }
                other => log::debug!("advance: {:?}", other),
            },
        }
    }
}

/// Save the card and show it. Returns `false` when some field is invalid;
/// the wizard is then back on the step holding the first error.
async fn submit(controller: &FormController, ui_locale: CardLocale) -> Result<bool> {
    let l = ui_locale.code();
    match controller.submit().await {
        Ok(card) => {
            let id = card.card_url.clone();
            println!("{}", t!("cli.saved", locale = l, id = id));
            let page = InvitationPage::load(&SampleSource::new(vec![card]), &id).await?;
            print_page(page, ui_locale);
            Ok(true)
        }
        Err(e) => {
            for field in CardField::iter() {
                if let Some(err) = controller.field_error(field).await {
                    println!("  ! {}", err.message(ui_locale));
                }
            }
            match controller.reopen_first_error().await {
                Some(step) => {
                    let title = step.title(ui_locale);
                    println!("{}", t!("cli.fix_and_resubmit", locale = l, step = title));
                    Ok(false)
                }
                // Nothing to correct: storage failed.
                None => Err(e),
            }
        }
    }
}

async fn edit_field(
    controller: &FormController,
    field: CardField,
    locale: CardLocale,
) -> Result<()> {
    let current = controller.field_value(field).await;
    if let Some(err) = controller.field_error(field).await {
        println!("  ! {}", err.message(locale));
    }
    let marker = if field.is_required() { "*" } else { "" };
    let hint = match field {
        CardField::CardLanguage => " (ms/en)",
        CardField::CardDesign => " (design1/design2)",
        CardField::NameOrder => " (male-female/female-male)",
        CardField::EventType => " (pertunangan/perkahwinan/resepsi)",
        CardField::EventDate => " (YYYY-MM-DD)",
        CardField::StartTime | CardField::EndTime => " (HH:MM AM)",
        CardField::Email => " (name@example.com)",
        _ => "",
    };
    loop {
        let input = prompt_string(&format!(
            "  {}{}{} [{}]: ",
            field.label(locale),
            marker,
            hint,
            current
        ))?;
        if input.is_empty() {
            return Ok(());
        }
        // "-" clears an optional field.
        let value = if input == "-" && !field.is_required() {
            ""
        } else {
            input.as_str()
        };
        if let Err(err) = controller.set_field(field, value).await {
            println!("  ! {}", err.message(locale));
            continue;
        }
        match controller.check_field(field).await {
            Ok(()) => return Ok(()),
            Err(err) => println!("  ! {}", err.message(locale)),
        }
    }
}

async fn edit_contacts(controller: &FormController, locale: CardLocale) -> Result<()> {
    let l = locale.code();
    let mut rows: Vec<_> = controller.contacts().await.iter().map(|e| e.id).collect();
    let mut index = 0;
    loop {
        let id = match rows.get(index) {
            Some(id) => *id,
            None => {
                let more = prompt_string(&format!("  {} ", t!("cli.add_contact", locale = l)))?;
                if !more.eq_ignore_ascii_case("y") {
                    return Ok(());
                }
                let id = controller.add_contact().await;
                rows.push(id);
                id
            }
        };
        let label = t!("cli.contact_name", locale = l);
        let name = prompt_string(&format!("  #{} {}: ", index + 1, label))?;
        if name == "-" {
            if controller.remove_contact(id).await {
                rows.remove(index);
            } else {
                println!("  ! {}", t!("cli.keep_one_contact", locale = l));
                index += 1;
            }
            continue;
        }
        if !name.is_empty() {
            controller.update_contact(id, ContactField::Name, &name).await;
        }
        let label = t!("cli.contact_phone", locale = l);
        let phone = prompt_string(&format!("  #{} {}: ", index + 1, label))?;
        if !phone.is_empty() {
            controller.update_contact(id, ContactField::Phone, &phone).await;
        }
        index += 1;
    }
}

fn progress_bar(ratio: f32, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f32).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Saved cards first, then the built-in demo. Only a genuine miss falls
/// through; an unreadable saved card is reported as such.
async fn fetch_page(ctx: Arc<dyn AppContext>, id: &str) -> Result<InvitationPage> {
    let page = InvitationPage::load(&LocalCardStore::new(ctx), id).await?;
    if page.is_not_found() {
        return InvitationPage::load(&SampleSource::default(), id).await;
    }
    Ok(page)
}

async fn show(ctx: Arc<dyn AppContext>, id: &str, ui_locale: CardLocale) -> Result<()> {
    let page = fetch_page(ctx, id).await?;
    if let InvitationPage::Unreadable { error, .. } = &page {
        let error = error.clone();
        print_page(page, ui_locale);
        return Err(error).with_context(|| format!("Card '{}' cannot be displayed", id));
    }
    print_page(page, ui_locale);
    Ok(())
}

fn print_page(page: InvitationPage, ui_locale: CardLocale) {
    let page = match page {
        InvitationPage::Card(mut view) => {
            println!("{}", render_centered(&view.lines(), PAGE_WIDTH));
            let _ = prompt_string("");
            view.open_curtain();
            InvitationPage::Card(view)
        }
        not_found => not_found,
    };
    print!("{}", render_centered(&page.lines(ui_locale), PAGE_WIDTH));
}

async fn countdown(ctx: Arc<dyn AppContext>, id: &str, config: &Config) -> Result<()> {
    let card = match LocalCardStore::new(ctx).fetch(id).await? {
        Some(card) => card,
        None => SampleSource::default()
            .fetch(id)
            .await?
            .with_context(|| format!("No card found for '{}'", id))?,
    };
    let target = card.event_start()?;
    let tick = Duration::from_secs(config.countdown_tick_secs);
    let mut ticker = CountdownTicker::spawn(target, tick);
    while let Some(remaining) = ticker.next().await {
        print!("\r{}   ", remaining);
        io::stdout().flush()?;
        if remaining.is_zero() {
            break;
        }
    }
    println!();
    Ok(())
}

/// Accepts either form and prints the other.
fn convert_time(value: &str) -> Result<()> {
    let upper = value.trim().to_ascii_uppercase();
    if upper.ends_with("AM") || upper.ends_with("PM") {
        let t12: Time12 = upper.parse()?;
        println!("{}", to_24_hour(t12.hour, t12.minute, t12.period)?);
    } else {
        let t12 = to_12_hour(value.trim())?;
        println!("{}", t12);
    }
    Ok(())
}

fn print_help() {
    println!(
        "wedcard v{} - Wedding invitation card composer",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    wedcard new                       Fill in a new card, step by step");
    println!("    wedcard list                      List saved cards");
    println!("    wedcard show <id>                 Display the invitation for a card");
    println!("    wedcard countdown <id>            Live countdown to the event start");
    println!("    wedcard time <value>              Convert 24h <-> 12h (\"16:30\", \"4:30 PM\")");
    println!("    wedcard date <YYYY-MM-DD> [ms|en] Short and long date forms");
    println!("    wedcard --help                    Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    WEDCARD_HOME    Keep config, cards and logs under this directory");
    println!();
    println!("The demo card is available as 'ahmad-nora'.");
}
