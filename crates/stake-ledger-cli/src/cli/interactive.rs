/*
[INPUT]:  Orchestrator handle and user input via CLI
[OUTPUT]: Wallet session toggles, new tasks, background completions
[POS]:    CLI interactive flow
[UPDATE]: When ledger actions or menu entries change
*/

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use stake_ledger::{LedgerError, Orchestrator, Task, TaskDraft, TaskId};
use tokio::task::JoinHandle;

use crate::render;

type Completion = (TaskId, JoinHandle<stake_ledger::Result<Task>>);

pub async fn run_interactive(orchestrator: Orchestrator) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{}", style("Stake Ledger").bold().cyan());

    let mut draft = TaskDraft::default();
    let mut completions: Vec<Completion> = Vec::new();

    loop {
        report_finished(&mut completions).await;

        let snapshot = orchestrator.snapshot();
        render::print_snapshot(&snapshot, orchestrator.token_symbol());

        let session_action = if snapshot.session.connected {
            "Disconnect wallet"
        } else {
            "Connect wallet"
        };
        let actions = vec![session_action, "New task", "Complete task", "Refresh", "Exit"];
        let selection = Select::with_theme(&theme)
            .with_prompt("Select action")
            .items(&actions)
            .default(0)
            .interact()?;

        match selection {
            0 => toggle_session(&orchestrator).await,
            1 => create_task(&orchestrator, &theme, &mut draft)?,
            2 => {
                if let Some(completion) = start_completion(&orchestrator, &theme)? {
                    completions.push(completion);
                }
            }
            3 => {}
            _ => break,
        }
    }

    if !completions.is_empty() {
        println!(
            "{}",
            style(format!(
                "Waiting for {} pending completion(s)...",
                completions.len()
            ))
            .dim()
        );
    }
    for (id, handle) in completions {
        print_completion(id, handle.await);
    }
    Ok(())
}

async fn toggle_session(orchestrator: &Orchestrator) {
    if orchestrator.is_authorized() {
        orchestrator.disconnect();
        println!("{}", style("Wallet disconnected.").yellow());
        return;
    }

    println!("{}", style("Connecting wallet...").dim());
    match orchestrator.connect().await {
        Ok(_) => println!("{}", style("Wallet connected.").green()),
        Err(err) => println!("{}", style(err).red()),
    }
}

fn create_task(
    orchestrator: &Orchestrator,
    theme: &ColorfulTheme,
    draft: &mut TaskDraft,
) -> Result<()> {
    if !orchestrator.is_authorized() {
        println!("{}", style("Connect your wallet to create tasks.").yellow());
        return Ok(());
    }

    println!("{}", style("Create new task").bold());
    draft.name = Input::with_theme(theme)
        .with_prompt("Task name")
        .with_initial_text(draft.name.clone())
        .allow_empty(true)
        .interact_text()?;
    draft.description = Input::with_theme(theme)
        .with_prompt("Description")
        .with_initial_text(draft.description.clone())
        .allow_empty(true)
        .interact_text()?;
    draft.stake_input = Input::with_theme(theme)
        .with_prompt(format!("Stake ({})", orchestrator.token_symbol()))
        .with_initial_text(draft.stake_input.clone())
        .allow_empty(true)
        .interact_text()?;

    match orchestrator.submit_draft(draft) {
        Ok(task) => println!(
            "{} {}",
            style("Task created:").green(),
            render::task_choice(&task, orchestrator.token_symbol())
        ),
        Err(err) if err.is_input_error() => {
            println!("{}", style(format!("{err}; the draft was kept for editing.")).red())
        }
        Err(err) => println!("{}", style(err).red()),
    }
    Ok(())
}

fn start_completion(
    orchestrator: &Orchestrator,
    theme: &ColorfulTheme,
) -> Result<Option<Completion>> {
    if !orchestrator.is_authorized() {
        println!("{}", style("Connect your wallet to complete tasks.").yellow());
        return Ok(None);
    }

    let candidates: Vec<Task> = orchestrator
        .list_tasks()
        .into_iter()
        .filter(|task| task.is_pending() && !orchestrator.is_completing(task.id))
        .collect();
    if candidates.is_empty() {
        println!("{}", style("No pending tasks.").yellow());
        return Ok(None);
    }

    let items: Vec<String> = candidates
        .iter()
        .map(|task| render::task_choice(task, orchestrator.token_symbol()))
        .collect();
    let selection = Select::with_theme(theme)
        .with_prompt("Select task to complete")
        .items(&items)
        .default(0)
        .interact()?;

    let id = candidates[selection].id;
    let worker = orchestrator.clone();
    let handle = tokio::spawn(async move { worker.complete_task(id).await });
    println!("{}", style(format!("Processing {id}...")).dim());
    Ok(Some((id, handle)))
}

async fn report_finished(completions: &mut Vec<Completion>) {
    let (finished, pending): (Vec<Completion>, Vec<Completion>) = std::mem::take(completions)
        .into_iter()
        .partition(|(_, handle)| handle.is_finished());
    *completions = pending;

    for (id, handle) in finished {
        print_completion(id, handle.await);
    }
}

fn print_completion(
    id: TaskId,
    outcome: std::result::Result<stake_ledger::Result<Task>, tokio::task::JoinError>,
) {
    match outcome {
        Ok(Ok(task)) => println!("{} {}", style("Completed").green(), task.name),
        Ok(Err(LedgerError::InvalidState { .. })) => {
            println!("{}", style(format!("Task {id} was already completed.")).dim())
        }
        Ok(Err(err)) => println!("{}", style(format!("Task {id}: {err}")).red()),
        Err(err) => println!("{}", style(format!("Task {id}: {err}")).red()),
    }
}
