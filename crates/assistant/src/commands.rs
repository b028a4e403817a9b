//! Subcommand handlers for the `smartfood` binary.

use std::io::IsTerminal;

use anyhow::{Context, anyhow};
use chrono::{Local, NaiveDate};

use smartfood_client::{PantryApi, SavedItem};
use smartfood_core::{DomainError, ItemId};
use smartfood_inventory::{FoodState, ManualEntry, Packaging, StorageLocation, parse_expiry_input};

use crate::cli::Command;
use crate::dialog::{Dialogs, ScriptedDialogs};
use crate::reconciler::{InventoryView, Mutation};
use crate::render::{render_summary, render_table};
use crate::terminal::TerminalDialogs;
use crate::wizard::{ExpiryChoice, IntakeStep, IntakeWizard, StepKind, WizardError};

pub async fn run<A: PantryApi>(command: Command, api: A, terminal: &TerminalDialogs) -> anyhow::Result<()> {
    match command {
        Command::Add { manual: false } => add(&api, terminal).await,
        Command::Add { manual: true } => {
            match add_manual(&api, terminal, Local::now().date_naive()).await? {
                Some(saved) => match saved.id {
                    Some(id) => println!("Saved (id {id})."),
                    None => println!("Saved."),
                },
                None => println!("Nothing saved."),
            }
            Ok(())
        }
        Command::List { by_urgency } => list(api, by_urgency).await,
        Command::Delete { id, yes: true } => {
            delete(api, &id, &ScriptedDialogs::new().confirming(true)).await
        }
        Command::Delete { id, yes: false } => delete(api, &id, terminal).await,
        Command::Consume {
            id,
            amount: Some(amount),
        } => consume(api, &id, &ScriptedDialogs::new().answering(Some(&amount))).await,
        Command::Consume { id, amount: None } => consume(api, &id, terminal).await,
        Command::Edit { id, name, qty } => edit(api, &id, name, qty, terminal).await,
    }
}

fn color_output() -> bool {
    std::io::stdout().is_terminal()
}

async fn loaded<A: PantryApi>(api: A) -> anyhow::Result<InventoryView<A>> {
    let mut view = InventoryView::new(api);
    view.refresh().await.context("could not load the inventory")?;
    Ok(view)
}

async fn list<A: PantryApi>(api: A, by_urgency: bool) -> anyhow::Result<()> {
    let mut view = loaded(api).await?;
    view.set_sort_by_urgency(by_urgency);
    print!("{}", render_table(&view.visible_items(), color_output()));
    Ok(())
}

async fn delete<A, D>(api: A, id: &ItemId, dialogs: &D) -> anyhow::Result<()>
where
    A: PantryApi,
    D: Dialogs + ?Sized,
{
    let mut view = loaded(api).await?;
    let outcome = view
        .delete(id, dialogs)
        .await
        .with_context(|| format!("could not delete item {id}"))?;
    match outcome {
        Mutation::Applied => {
            println!("Deleted item {id}.");
            print!("{}", render_table(&view.visible_items(), color_output()));
        }
        Mutation::Cancelled => println!("Nothing deleted."),
    }
    Ok(())
}

async fn consume<A, D>(api: A, id: &ItemId, dialogs: &D) -> anyhow::Result<()>
where
    A: PantryApi,
    D: Dialogs + ?Sized,
{
    let mut view = loaded(api).await?;
    let outcome = view
        .consume(id, dialogs)
        .await
        .with_context(|| format!("could not consume item {id}"))?;
    match outcome {
        Mutation::Applied => {
            let left = view.item(id).map(|item| item.qty).unwrap_or_default();
            println!("Recorded. {left} left.");
        }
        Mutation::Cancelled => println!("Nothing consumed."),
    }
    Ok(())
}

async fn edit<A: PantryApi>(
    api: A,
    id: &ItemId,
    name: Option<String>,
    qty: Option<String>,
    terminal: &TerminalDialogs,
) -> anyhow::Result<()> {
    let mut view = loaded(api).await?;
    let session = view.begin_edit(id)?;

    if name.is_none() && qty.is_none() {
        let current = session.form.clone();
        let Some(name) = terminal.read_with_default("Name", &current.name).await else {
            return Ok(());
        };
        let Some(qty) = terminal.read_with_default("Quantity", &current.qty).await else {
            return Ok(());
        };
        session.form.name = name;
        session.form.qty = qty;
    } else {
        if let Some(name) = name {
            session.form.name = name;
        }
        if let Some(qty) = qty {
            session.form.qty = qty;
        }
    }

    view.save_edit()
        .await
        .with_context(|| format!("could not update item {id}"))?;
    println!("Updated item {id}.");
    Ok(())
}

/// Drive the intake wizard from the terminal until the user saves and stops,
/// or input ends.
async fn add<A: PantryApi + ?Sized>(api: &A, terminal: &TerminalDialogs) -> anyhow::Result<()> {
    let mut wizard = IntakeWizard::new();
    println!("What food item would you like to add?");

    loop {
        let outcome = match wizard.step_kind() {
            StepKind::Name => {
                let Some(name) = terminal.read_line("Food name: ").await else {
                    return Ok(());
                };
                wizard.submit_name(&name)
            }
            StepKind::CategoryConfirm => {
                let detected = match wizard.step() {
                    IntakeStep::CategoryConfirm { detected, .. } => detected.to_string(),
                    _ => String::new(),
                };
                let accept = terminal
                    .confirm(&format!("Detected category: {detected}. Is this correct?"))
                    .await;
                wizard.confirm_category(accept)
            }
            StepKind::CategoryManual => {
                let Some(text) = terminal.read_line("Enter the correct category: ").await else {
                    return Ok(());
                };
                wizard.submit_manual_category(&text)
            }
            StepKind::Location => {
                let Some(text) = terminal
                    .read_line("Where will you store it? (Fridge/Freezer/Pantry): ")
                    .await
                else {
                    return Ok(());
                };
                match text.parse::<StorageLocation>() {
                    Ok(location) => wizard.choose_location(location),
                    Err(err) => Err(err.into()),
                }
            }
            StepKind::Packaging => {
                let Some(text) = terminal.read_line("Is it sealed or open? [sealed]: ").await else {
                    return Ok(());
                };
                match choice_or_default::<Packaging>(&text) {
                    Ok(packaging) => wizard.choose_packaging(packaging),
                    Err(err) => Err(err.into()),
                }
            }
            StepKind::State => {
                let Some(text) = terminal.read_line("Is it raw or cooked? [raw]: ").await else {
                    return Ok(());
                };
                match choice_or_default::<FoodState>(&text) {
                    Ok(state) => {
                        println!("Predicting shelf life... please wait");
                        wizard
                            .choose_state(state, api, Local::now().naive_local())
                            .await
                    }
                    Err(err) => Err(err.into()),
                }
            }
            StepKind::Done => {
                if let Some(summary) = wizard.summary() {
                    print!("{}", render_summary(summary));
                }
                let Some(answer) = terminal
                    .read_line("Save with the [p]redicted date, type a custom date (2025-07-01, +3, 07/01), or [q]uit: ")
                    .await
                else {
                    return Ok(());
                };
                let today = Local::now().date_naive();
                let choice = match answer.to_lowercase().as_str() {
                    "q" | "quit" => return Ok(()),
                    "" | "p" | "predicted" => Ok(ExpiryChoice::Predicted),
                    text => match parse_expiry_input(text, today) {
                        Some(date) => wizard.set_custom_expiry(date).map(|()| ExpiryChoice::Custom),
                        None => Err(DomainError::validation(format!("could not read {text:?} as a date")).into()),
                    },
                };
                match choice {
                    Ok(choice) => wizard.commit(choice, api, today).await.map(|_| ()),
                    Err(err) => Err(err),
                }
            }
            StepKind::Predicting => {
                return Err(anyhow!("intake stopped with a prediction still pending"));
            }
        };

        if let Err(err) = outcome {
            report(&wizard, &err);
            wizard.dismiss_notice();
            continue;
        }

        if wizard.summary().is_some_and(|summary| summary.is_saved()) {
            if let Some(notice) = wizard.notice() {
                println!("{notice}");
            }
            if !terminal.confirm("Add another item?").await {
                return Ok(());
            }
            wizard.restart();
        }
    }
}

/// Ask for each field of a hand-entered item, then save it.
///
/// `Ok(None)` when the user cancels a prompt; nothing is sent in that case.
async fn add_manual<A, D>(api: &A, dialogs: &D, today: NaiveDate) -> anyhow::Result<Option<SavedItem>>
where
    A: PantryApi + ?Sized,
    D: Dialogs + ?Sized,
{
    let mut entry = ManualEntry::default();
    let fields = [
        ("Name:", &mut entry.name),
        ("Qty (e.g., 1) [1]:", &mut entry.qty),
        ("Unit (g, L, pcs) [pcs]:", &mut entry.unit),
        ("Category (e.g., fruit, dairy) [detect]:", &mut entry.category),
        ("Location (Fridge/Freezer/Pantry) [Fridge]:", &mut entry.location),
        ("Purchased on (YYYY-MM-DD or '3' = 3 days ago) [today]:", &mut entry.purchased),
        ("Expiry on (YYYY-MM-DD or '5' = in 5 days) [none]:", &mut entry.expiry),
    ];
    for (label, slot) in fields {
        let Some(answer) = dialogs.prompt(label).await else {
            return Ok(None);
        };
        *slot = answer;
    }

    let record = entry.to_record(today)?;
    let saved = api
        .add_item(&record)
        .await
        .inspect_err(|err| tracing::warn!(item = %record.name, error = %err, "saving item failed"))
        .with_context(|| format!("could not save {}", record.name))?;
    tracing::info!(item = %record.name, expiry = ?record.expiry_on, "item saved");
    Ok(Some(saved))
}

fn report(wizard: &IntakeWizard, err: &WizardError) {
    match wizard.notice() {
        Some(notice) => println!("{notice}"),
        None => println!("{err}"),
    }
}

/// Parse a menu answer, where a blank answer picks the type's default.
fn choice_or_default<T>(text: &str) -> Result<T, DomainError>
where
    T: Default + std::str::FromStr<Err = DomainError>,
{
    if text.trim().is_empty() {
        Ok(T::default())
    } else {
        text.parse()
    }
}
