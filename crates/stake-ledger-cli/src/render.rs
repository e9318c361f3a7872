/*
[INPUT]:  LedgerSnapshot and token symbol
[OUTPUT]: Styled terminal output (session banner, metrics, task list)
[POS]:    Presentation layer - read-only rendering of ledger state
[UPDATE]: When snapshot fields or display layout change
*/

use chrono::{DateTime, Utc};
use console::style;
use stake_ledger::{LedgerMetrics, LedgerSnapshot, Task, format_stake, short_address};

pub fn print_session(snapshot: &LedgerSnapshot) {
    if snapshot.connecting {
        println!("{}", style("Connecting wallet...").yellow());
        return;
    }
    match &snapshot.session.identifier {
        Some(address) if snapshot.session.connected => {
            println!(
                "{} {}",
                style("● Wallet connected").green(),
                style(short_address(address)).dim()
            );
        }
        _ => println!(
            "{}",
            style("Connect your wallet to manage your tasks.").yellow()
        ),
    }
}

pub fn print_metrics(metrics: &LedgerMetrics, symbol: &str) {
    println!("\n{}", style("--- Metrics ---").bold());
    println!("  Total tasks:     {}", metrics.total_count);
    println!("  Completed:       {}", style(metrics.completed_count).green());
    println!("  Pending:         {}", style(metrics.pending_count).cyan());
    println!(
        "  Staked:          {}",
        style(format_stake(metrics.total_stake, symbol)).magenta()
    );
}

pub fn print_tasks(snapshot: &LedgerSnapshot, symbol: &str) {
    println!("\n{}", style("--- Tasks ---").bold());
    if !snapshot.session.connected {
        println!("  {}", style("Wallet not connected.").dim());
        return;
    }
    if snapshot.tasks.is_empty() {
        println!("  {}", style("No tasks yet. Create your first task!").dim());
        return;
    }
    for task in &snapshot.tasks {
        let completing = snapshot.in_progress.contains(&task.id);
        println!("{}", task_line(task, completing, symbol));
        println!("      {}", style(&task.description).dim());
    }
}

pub fn print_snapshot(snapshot: &LedgerSnapshot, symbol: &str) {
    print_session(snapshot);
    print_metrics(&snapshot.metrics, symbol);
    print_tasks(snapshot, symbol);
    println!();
}

pub fn task_line(task: &Task, completing: bool, symbol: &str) -> String {
    let badge = if task.is_completed() {
        style("completed").green().to_string()
    } else if completing {
        style("processing").yellow().to_string()
    } else {
        style("pending").cyan().to_string()
    };

    let mut line = format!(
        "  {:<5} {} [{}] created {} | stake {}",
        task.id.to_string(),
        style(&task.name).bold(),
        badge,
        format_date(task.created_at),
        format_stake(task.stake_amount, symbol),
    );
    if let Some(completed_at) = task.completed_at {
        line.push_str(&format!(" | completed {}", format_date(completed_at)));
    }
    line
}

/// Short label used in selection menus
pub fn task_choice(task: &Task, symbol: &str) -> String {
    format!(
        "{} {} ({})",
        task.id,
        task.name,
        format_stake(task.stake_amount, symbol)
    )
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
