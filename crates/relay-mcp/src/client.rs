use crate::bridge::{self, ToolOutcome};
use crate::catalog::{self, McpTool};
use crate::error::Result;
use crate::session::{self, ClientInfo, Session};
use crate::transport::McpTransport;
use relay_llm::Tool;
use serde_json::{Map, Value};
use url::Url;

/// Connection to one MCP server over streamable HTTP.
///
/// # Examples
///
/// ```no_run
/// # async fn run() -> relay_mcp::Result<()> {
/// use relay_mcp::{ClientInfo, McpClient};
///
/// let client = McpClient::connect("http://localhost:8000/mcp", &ClientInfo::default()).await?;
/// for tool in client.list_tools().await? {
///     println!("{} : {}", tool.name, tool.description.unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct McpClient {
    transport: McpTransport,
    session: Session,
}

impl McpClient {
    /// Handshake with the server at `endpoint`
    pub async fn connect(endpoint: &str, client: &ClientInfo) -> Result<Self> {
        Self::connect_with(McpTransport::new(), endpoint, client).await
    }

    pub async fn connect_with(transport: McpTransport, endpoint: &str, client: &ClientInfo) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let session = session::initialize(&transport, endpoint, client).await?;
        Ok(Self { transport, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn list_tools(&self) -> Result<Vec<McpTool>> {
        catalog::list_tools(&self.transport, &self.session).await
    }

    /// Catalog in function-calling form
    pub async fn llm_tools(&self) -> Result<Vec<Tool>> {
        Ok(catalog::to_llm_tools(&self.list_tools().await?))
    }

    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> ToolOutcome {
        bridge::invoke(&self.transport, &self.session, name, arguments).await
    }
}
