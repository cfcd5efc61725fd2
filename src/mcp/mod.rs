use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router,
    schemars::JsonSchema,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use taskboard_core::StoreError;

use crate::db::Database;
use crate::models::*;

#[derive(Clone)]
pub struct McpServer {
    db: Database,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskIdRequest {
    #[schemars(description = "The task ID")]
    pub task_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTaskRequest {
    #[schemars(description = "Short name of the task")]
    pub name: String,
    #[schemars(description = "What the task is about")]
    pub description: String,
    #[schemars(description = "Start time as Unix epoch seconds")]
    pub start: Option<i64>,
    #[schemars(description = "Finish time as Unix epoch seconds")]
    pub finish: Option<i64>,
    #[schemars(description = "Descriptions of the subtasks to create, in order")]
    #[serde(default)]
    pub subtasks: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SubtaskEditRequest {
    #[schemars(description = "ID of an existing subtask to rename; omit to add a new subtask")]
    pub id: Option<i64>,
    #[schemars(description = "The subtask description")]
    pub description: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTaskRequest {
    #[schemars(description = "The task ID to update")]
    pub task_id: i64,
    #[schemars(description = "New name")]
    pub name: Option<String>,
    #[schemars(description = "New description")]
    pub description: Option<String>,
    #[schemars(description = "New start time as Unix epoch seconds")]
    pub start: Option<i64>,
    #[schemars(description = "New finish time as Unix epoch seconds")]
    pub finish: Option<i64>,
    #[schemars(description = "Subtasks to rename or add; subtasks not listed are kept")]
    #[serde(default)]
    pub subtasks: Vec<SubtaskEditRequest>,
}

#[derive(Debug, Serialize)]
struct Created {
    id: i64,
}

impl McpServer {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            tool_router: Self::tool_router(),
        }
    }

    fn store_error(err: StoreError) -> McpError {
        if err.is_client_error() {
            McpError::invalid_params(err.to_string(), None)
        } else {
            McpError::internal_error(err.to_string(), None)
        }
    }

    fn json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_router]
impl McpServer {
    #[tool(description = "List all tasks with their subtasks")]
    async fn list_tasks(&self) -> Result<CallToolResult, McpError> {
        let tasks = self.db.get_all_tasks().map_err(Self::store_error)?;
        Self::json(&tasks)
    }

    #[tool(description = "Get a single task with its subtasks")]
    async fn get_task(
        &self,
        params: Parameters<TaskIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let task = self
            .db
            .get_task(params.0.task_id)
            .map_err(Self::store_error)?
            .ok_or_else(|| McpError::invalid_params("Task not found", None))?;
        Self::json(&task)
    }

    #[tool(description = "Create a task, optionally with subtasks")]
    async fn create_task(
        &self,
        params: Parameters<CreateTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let id = self
            .db
            .create_task(CreateTaskInput {
                name: req.name,
                description: req.description,
                start: req.start,
                finish: req.finish,
                subtasks: req
                    .subtasks
                    .into_iter()
                    .map(|description| CreateSubtaskInput { description })
                    .collect(),
            })
            .map_err(Self::store_error)?;
        Self::json(&Created { id })
    }

    #[tool(description = "Update fields of a task and rename or add subtasks")]
    async fn update_task(
        &self,
        params: Parameters<UpdateTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let input = UpdateTaskInput {
            name: req.name,
            description: req.description,
            start: req.start.map(Some),
            finish: req.finish.map(Some),
            subtasks: req
                .subtasks
                .into_iter()
                .map(|s| SubtaskEdit {
                    id: s.id,
                    description: s.description,
                })
                .collect(),
        };

        let updated = self
            .db
            .update_task(req.task_id, input)
            .map_err(Self::store_error)?;
        if !updated {
            return Err(McpError::invalid_params("Task not found", None));
        }

        Ok(CallToolResult::success(vec![Content::text("Task updated")]))
    }

    #[tool(description = "Delete a task; its subtasks are detached, not deleted")]
    async fn delete_task(
        &self,
        params: Parameters<TaskIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let deleted = self
            .db
            .delete_task(params.0.task_id)
            .map_err(Self::store_error)?;
        if !deleted {
            return Err(McpError::invalid_params("Task not found", None));
        }

        Ok(CallToolResult::success(vec![Content::text("Task deleted")]))
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("taskboard MCP server for tracking tasks and subtasks".into()),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(db: Database) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(db);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
