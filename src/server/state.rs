use crate::tools::ToolSurface;

pub struct AppState {
    pub tools: ToolSurface,
}
