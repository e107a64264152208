//! Converter MCP Server Implementation
//!
//! Exposes the conversion tools over MCP.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::task::JoinError;

use crate::converter::UnitConverter;
use crate::fallback::GeminiClient;
use crate::tools::conversions;
use crate::tools::status::StatusTracker;

/// Converter MCP Service
#[derive(Clone)]
pub struct ConverterService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    converter: Arc<UnitConverter<GeminiClient>>,
    /// Held for the duration of a conversion so requests never overlap
    conversion_lock: Arc<Mutex<()>>,
    tool_router: ToolRouter<ConverterService>,
}

impl ConverterService {
    pub fn new(converter: Arc<UnitConverter<GeminiClient>>) -> Self {
        let model = converter.generator().model().to_string();
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(model))),
            converter,
            conversion_lock: Arc::new(Mutex::new(())),
            tool_router: Self::tool_router(),
        }
    }
}

/// Run blocking `work` on the blocking pool while holding `lock`
///
/// The guard moves into the blocking task, so dropping the returned future
/// (a cancelled request) does not release the lock before `work` finishes.
async fn run_exclusive<F, T>(lock: &Arc<Mutex<()>>, work: F) -> Result<T, JoinError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let guard = Arc::clone(lock).lock_owned().await;
    tokio::task::spawn_blocking(move || {
        let _guard = guard;
        work()
    })
    .await
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListUnitsParams {
    /// Unit category: Length, Weight, Temperature, Speed, Time, Area or Volume
    pub category: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitsParams {
    /// Unit category: Length, Weight, Temperature, Speed, Time, Area or Volume
    pub category: String,
    /// Unit to convert from (must belong to the category)
    pub from_unit: String,
    /// Unit to convert to (must belong to the category and differ from from_unit)
    pub to_unit: String,
    /// Value to convert (zero or positive)
    pub value: f64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl ConverterService {
    #[tool(description = "Get the current status of the converter service including build info, fallback model, table size, and process information")]
    async fn converter_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for converting units, including which conversions are exact and which are answered by the AI model.")]
    fn conversion_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CONVERSION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CONVERSION_INSTRUCTIONS)]))
    }

    #[tool(description = "List all unit categories with their valid units")]
    fn list_unit_categories(&self) -> Result<CallToolResult, McpError> {
        let result = conversions::list_unit_categories();
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List the valid units of one category")]
    fn list_units(&self, Parameters(p): Parameters<ListUnitsParams>) -> Result<CallToolResult, McpError> {
        let json = match conversions::list_units(&p.category) {
            Ok(units) => serde_json::to_string_pretty(&units),
            Err(e) => serde_json::to_string_pretty(&serde_json::json!({
                "error": e.to_string(),
                "kind": "unknown_category"
            })),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Convert a value between two units of the same category. Uses a direct conversion table when possible and asks an AI model otherwise.")]
    async fn convert_units(&self, Parameters(p): Parameters<ConvertUnitsParams>) -> Result<CallToolResult, McpError> {
        let converter = Arc::clone(&self.converter);
        let result = run_exclusive(&self.conversion_lock, move || {
            conversions::convert_units(&*converter, &p.category, &p.from_unit, &p.to_unit, p.value)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Conversion task failed: {}", e), None))?;

        let json = match result {
            Ok(converted) => serde_json::to_string_pretty(&converted),
            Err(refused) => serde_json::to_string_pretty(&refused),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ConverterService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "uconv".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Unit Converter".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Unit Converter - converts values between units of Length, Weight, Temperature, Speed, Time, Area and Volume. \
                 Call conversion_instructions first. \
                 Units: list_unit_categories, list_units. \
                 Convert: convert_units (units must differ; value must be zero or positive). \
                 Status: converter_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_run_exclusive_returns_work_result() {
        let lock = Arc::new(Mutex::new(()));
        let value = run_exclusive(&lock, || 6 * 7).await.unwrap();
        assert_eq!(value, 42);
        assert!(lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_conversion_keeps_lock_until_work_ends() {
        let lock = Arc::new(Mutex::new(()));
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let call = run_exclusive(&lock, move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
        });

        // Dropping the future mid-call stands in for a cancelled request
        let outcome = tokio::time::timeout(Duration::from_millis(200), call).await;
        assert!(outcome.is_err());

        started_rx.await.unwrap();
        assert!(lock.try_lock().is_err(), "lock released while work still running");

        release_tx.send(()).unwrap();
        let reacquired = tokio::time::timeout(Duration::from_secs(5), lock.lock()).await;
        assert!(reacquired.is_ok());
    }
}
