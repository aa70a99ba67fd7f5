//! `syb train`: maintain the context index

use anyhow::{bail, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use sibyl_config::Config;
use sibyl_core::CollectionKind;

use crate::bootstrap;
use crate::cli::TrainAction;

pub async fn run(config: &Config, action: TrainAction) -> Result<()> {
    let pipeline = bootstrap::build_pipeline(config).await?;

    match action {
        TrainAction::Ddl { ddl } => {
            let id = pipeline.train_ddl(&ddl).await?;
            println!("indexed ddl record {id}");
        }
        TrainAction::Doc { text } => {
            let id = pipeline.train_documentation(&text).await?;
            println!("indexed documentation record {id}");
        }
        TrainAction::Pair { question, sql } => {
            let id = pipeline.train_example(&question, &sql).await?;
            println!("indexed example record {id}");
        }
        TrainAction::Auto => {
            let indexed = pipeline.train_from_catalog().await?;
            println!("indexed {indexed} CREATE statement(s) from the catalog");
        }
        TrainAction::Reset { collection } => {
            let target = match collection.as_deref() {
                Some(name) => match CollectionKind::parse(name) {
                    Some(kind) => Some(kind),
                    None => bail!(
                        "unknown collection '{name}' (expected ddl, documentation or sql_examples)"
                    ),
                },
                None => None,
            };
            pipeline.reset(target)?;
            match target {
                Some(kind) => println!("removed collection {kind}"),
                None => println!("removed all indexed context"),
            }
        }
        TrainAction::Show => {
            let stats = pipeline.training_stats()?;
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_header(["collection", "records"]);
            table.add_row(["ddl".to_string(), stats.ddl.to_string()]);
            table.add_row(["documentation".to_string(), stats.documentation.to_string()]);
            table.add_row(["sql_examples".to_string(), stats.sql_examples.to_string()]);
            println!("{table}");
            let total = stats.ddl + stats.documentation + stats.sql_examples;
            println!("{}", format!("{total} record(s) total").dimmed());
        }
    }
    Ok(())
}
