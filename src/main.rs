//! Unit Converter (uconv)
//!
//! An MCP server for converting values between units.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use uconv::build_info;
use uconv::config::Config;
use uconv::converter::UnitConverter;
use uconv::fallback::GeminiClient;
use uconv::mcp::ConverterService;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr; stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("uconv=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Fallback model: {} ({})", config.model, config.base_url);

    // The blocking HTTP client must be created outside the async runtime
    let converter = Arc::new(UnitConverter::new(GeminiClient::new(&config)));
    let service = ConverterService::new(Arc::clone(&converter));

    eprintln!("Starting MCP server on stdio...");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let transport = (stdin(), stdout());
        let server = service.serve(transport).await?;
        server.waiting().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    drop(runtime);
    drop(converter);
    Ok(())
}
