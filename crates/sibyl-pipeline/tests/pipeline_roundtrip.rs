//! End-to-end pipeline round trips with deterministic in-process providers

use std::sync::Arc;

use sibyl_config::RetrievalConfig;
use sibyl_core::{AskOutcome, SibylError, SqlValue};
use sibyl_db::Database;
use sibyl_llm::mock::{HashEmbedder, ScriptedChat};
use sibyl_pipeline::SqlPipeline;
use sibyl_store::ContextStore;

const ORDERS_DDL: &str =
    "CREATE TABLE orders (id INTEGER PRIMARY KEY, customer TEXT, status TEXT)";
const EXAMPLE_QUESTION: &str = "一共有多少条订单？";
const EXAMPLE_SQL: &str = "SELECT COUNT(*) FROM orders";

async fn seeded_database() -> Database {
    let db = Database::sqlite_memory().await.unwrap();
    db.execute(ORDERS_DDL).await.unwrap();
    db.execute("INSERT INTO orders VALUES (1, 'alice', 'completed')")
        .await
        .unwrap();
    db.execute("INSERT INTO orders VALUES (2, 'bob', 'pending')")
        .await
        .unwrap();
    db.execute("INSERT INTO orders VALUES (3, 'carol', 'completed')")
        .await
        .unwrap();
    db
}

async fn pipeline_with(chat: Arc<ScriptedChat>) -> SqlPipeline {
    let store = Arc::new(ContextStore::memory(Arc::new(HashEmbedder::new(64))).unwrap());
    let database = Arc::new(seeded_database().await);
    let pipeline = SqlPipeline::new(
        store,
        chat,
        database,
        RetrievalConfig::default(),
        0.0,
        2000,
    );

    pipeline.train_ddl(ORDERS_DDL).await.unwrap();
    pipeline
        .train_documentation("Order status is either completed or pending.")
        .await
        .unwrap();
    pipeline
        .train_example(EXAMPLE_QUESTION, EXAMPLE_SQL)
        .await
        .unwrap();
    pipeline
}

#[tokio::test]
async fn ask_round_trip_returns_the_count() {
    let chat = Arc::new(ScriptedChat::new([format!("```sql\n{EXAMPLE_SQL}\n```")]));
    let pipeline = pipeline_with(chat.clone()).await;

    let outcome = pipeline.ask(EXAMPLE_QUESTION).await.unwrap();
    match outcome {
        AskOutcome::Answered(result) => {
            assert_eq!(result.sql, EXAMPLE_SQL);
            assert_eq!(result.rows, vec![vec![SqlValue::Integer(3)]]);
        }
        other => panic!("expected Answered, got {other:?}"),
    }

    // The trained context reached the prompt verbatim
    let prompts = chat.recorded_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(ORDERS_DDL));
    assert!(prompts[0].contains(&format!("Q: {EXAMPLE_QUESTION}\nSQL: {EXAMPLE_SQL}")));
    assert!(prompts[0].contains(&format!("Question: {EXAMPLE_QUESTION}")));
}

#[tokio::test]
async fn reasoning_only_completion_is_no_sql_not_an_error() {
    let chat = Arc::new(ScriptedChat::new([
        "<think>I cannot figure out this schema at all",
    ]));
    let pipeline = pipeline_with(chat).await;

    let outcome = pipeline.ask("what is the answer").await.unwrap();
    match outcome {
        AskOutcome::NoSql { raw } => assert!(raw.starts_with("<think>")),
        other => panic!("expected NoSql, got {other:?}"),
    }
}

#[tokio::test]
async fn execution_failure_carries_the_generated_sql() {
    let chat = Arc::new(ScriptedChat::new(["SELECT * FROM nonexistent_table"]));
    let pipeline = pipeline_with(chat).await;

    let err = pipeline.ask("list the widgets").await.unwrap_err();
    match err {
        SibylError::Execution { message, sql } => {
            assert!(message.contains("nonexistent_table"));
            assert_eq!(sql, "SELECT * FROM nonexistent_table");
        }
        other => panic!("expected Execution, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_question_is_rejected_before_any_backend_call() {
    let chat = Arc::new(ScriptedChat::new(["SELECT 1"]));
    let pipeline = pipeline_with(chat.clone()).await;

    let err = pipeline.ask("   ").await.unwrap_err();
    assert!(matches!(err, SibylError::InvalidArgument(_)));
    assert!(chat.recorded_prompts().is_empty());
}

#[tokio::test]
async fn ask_works_with_an_empty_index() {
    let chat = Arc::new(ScriptedChat::new(["SELECT COUNT(*) FROM orders"]));
    let store = Arc::new(ContextStore::memory(Arc::new(HashEmbedder::new(64))).unwrap());
    let database = Arc::new(seeded_database().await);
    let pipeline = SqlPipeline::new(
        store,
        chat.clone(),
        database,
        RetrievalConfig::default(),
        0.0,
        2000,
    );

    let outcome = pipeline.ask("how many orders").await.unwrap();
    assert!(matches!(outcome, AskOutcome::Answered(_)));

    let prompts = chat.recorded_prompts();
    assert!(!prompts[0].contains("=== Schema ==="));
}

#[tokio::test]
async fn train_from_catalog_indexes_ddl_and_dialect_hint() {
    let chat = Arc::new(ScriptedChat::new(Vec::<String>::new()));
    let pipeline = pipeline_with(chat).await;
    pipeline.reset(None).unwrap();

    let indexed = pipeline.train_from_catalog().await.unwrap();
    assert_eq!(indexed, 1);

    let stats = pipeline.training_stats().unwrap();
    assert_eq!(stats.ddl, 1);
    assert_eq!(stats.documentation, 1);
    assert_eq!(stats.sql_examples, 0);
}

#[tokio::test]
async fn reset_clears_every_collection() {
    let chat = Arc::new(ScriptedChat::new(Vec::<String>::new()));
    let pipeline = pipeline_with(chat).await;

    let before = pipeline.training_stats().unwrap();
    assert_eq!(before.ddl, 1);
    assert_eq!(before.documentation, 1);
    assert_eq!(before.sql_examples, 1);

    pipeline.reset(None).unwrap();
    let after = pipeline.training_stats().unwrap();
    assert_eq!(after.ddl, 0);
    assert_eq!(after.documentation, 0);
    assert_eq!(after.sql_examples, 0);
}
