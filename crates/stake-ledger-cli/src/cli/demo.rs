/*
[INPUT]:  Orchestrator handle
[OUTPUT]: Scripted walkthrough of the ledger actions with printed outcomes
[POS]:    CLI non-interactive flow
[UPDATE]: When the walkthrough should cover new actions
*/

use anyhow::{Context, Result};
use console::style;
use stake_ledger::{LedgerError, Orchestrator, TaskId};

use crate::render;

/// Connect, create a task, complete it and print the ledger before and after.
pub async fn run_demo(orchestrator: &Orchestrator, json: bool) -> Result<()> {
    let symbol = orchestrator.token_symbol().to_string();

    step("Complete a task before connecting");
    match orchestrator.complete_task(TaskId(1)).await {
        Err(LedgerError::Unauthorized) => println!("  rejected: wallet not connected"),
        other => println!("  unexpected outcome: {other:?}"),
    }

    step("Connect wallet");
    let session = orchestrator.connect().await.context("connect wallet")?;
    println!(
        "  connected as {}",
        session.identifier.as_deref().unwrap_or("<unknown>")
    );

    step("Create a task with an empty name");
    if let Err(err) = orchestrator.create_task("", "Deploy the contract", "1.0") {
        println!("  rejected: {err}");
    }

    step("Create a task staking 1.5");
    let task = orchestrator
        .create_task("Write tests", "Cover the ledger invariants", "1.5")
        .context("create demo task")?;
    println!(
        "  {} stored with {} base units ({})",
        task.id,
        task.stake_amount,
        orchestrator.format_stake(task.stake_amount)
    );
    render::print_snapshot(&orchestrator.snapshot(), &symbol);

    step("Complete it");
    let done = orchestrator
        .complete_task(task.id)
        .await
        .context("complete demo task")?;
    println!("  {} is {}", done.id, done.status);

    let snapshot = orchestrator.snapshot();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?
        );
    } else {
        render::print_snapshot(&snapshot, &symbol);
    }
    Ok(())
}

fn step(title: &str) {
    println!("\n{}", style(format!("» {title}")).bold());
}
