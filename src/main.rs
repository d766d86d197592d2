use bookshelf_lib::app_log;
use bookshelf_lib::catalog::{sample_books, InMemoryRecordSource};
use bookshelf_lib::config::PipelineConfig;
use bookshelf_lib::error::BookshelfResult;
use bookshelf_lib::ident::RandomIdGenerator;
use bookshelf_lib::logger::{init_tracing, LogLevel};
use bookshelf_lib::pipeline::Pipeline;
use bookshelf_lib::purity::MaskingPurifier;
use std::process::ExitCode;
use std::sync::Arc;

const SOURCE: &str = "main";

/// Environment variable naming an optional JSON config file
const CONFIG_ENV: &str = "BOOKSHELF_CONFIG";

fn load_config() -> BookshelfResult<PipelineConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            app_log!(LogLevel::Info, SOURCE, "Loading config from {}", path);
            PipelineConfig::load(path.trim())
        }
        _ => Ok(PipelineConfig::default()),
    }
}

async fn run() -> BookshelfResult<()> {
    let config = load_config()?;
    let source = Arc::new(InMemoryRecordSource::with_records(sample_books()));

    let pipeline = Pipeline::set_up(
        &config,
        source,
        Arc::new(MaskingPurifier::new()),
        Arc::new(RandomIdGenerator::new()),
    )
    .await?;

    let rows = serde_json::to_string_pretty(pipeline.generate_display_item_row())?;
    println!("{}", rows);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            app_log!(LogLevel::Error, SOURCE, "bookshelf failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
