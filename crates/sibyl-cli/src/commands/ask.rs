//! `syb ask`: one full question → SQL → result turn

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use sibyl_config::Config;
use sibyl_core::{AskOutcome, QueryResult};

use crate::bootstrap;

pub async fn run(config: &Config, question: &str) -> Result<()> {
    let pipeline = bootstrap::build_pipeline(config).await?;

    match pipeline.ask(question).await? {
        AskOutcome::Answered(result) => {
            println!("{}", result.sql.cyan());
            println!();
            print_table(&result);
            println!();
            println!("{}", format!("{} row(s)", result.row_count).dimmed());
        }
        AskOutcome::NoSql { raw } => {
            println!("{}", "(no SQL generated)".yellow());
            if !raw.trim().is_empty() {
                eprintln!("{}", "model output:".dimmed());
                eprintln!("{raw}");
            }
        }
    }
    Ok(())
}

fn print_table(result: &QueryResult) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    if !result.columns.is_empty() {
        table.set_header(result.columns.iter().map(|c| Cell::new(c)));
    }
    for row in &result.rows {
        table.add_row(row.iter().map(|v| Cell::new(v.to_string())));
    }
    println!("{table}");
}
