use std::collections::HashMap;
use std::sync::Arc;

use wand_agents::{Agent, AgentContext, EchoAgent, HttpGetAgent, SumAgent};
use wand_config::{AgentConfig, Payload, ToolConfig};
use wand_tools::{ChartGenerator, DataFetcher, Tool};

use crate::error::RegistryError;

/// Constructs an agent from its parameters and tools.
pub type AgentFactory = Arc<dyn Fn(AgentContext) -> Box<dyn Agent> + Send + Sync>;

/// Constructs a tool from its configuration map.
pub type ToolFactory = Arc<dyn Fn(&Payload) -> Arc<dyn Tool> + Send + Sync>;

/// Name-keyed agent and tool factories.
#[derive(Clone, Default)]
pub struct Registry {
  agents: HashMap<String, AgentFactory>,
  tools: HashMap<String, ToolFactory>,
}

impl Registry {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a registry holding the built-in agents and tools.
  pub fn builtin() -> Self {
    let mut registry = Self::new();

    registry.register_agent(EchoAgent::NAME, |ctx| Box::new(EchoAgent::new(ctx)));
    registry.register_agent(SumAgent::NAME, |ctx| Box::new(SumAgent::new(ctx)));
    registry.register_agent(HttpGetAgent::NAME, |ctx| Box::new(HttpGetAgent::new(ctx)));

    registry.register_tool(DataFetcher::NAME, |config| Arc::new(DataFetcher::new(config)));
    registry.register_tool(ChartGenerator::NAME, |config| {
      Arc::new(ChartGenerator::new(config.clone()))
    });

    registry
  }

  /// Register an agent factory, replacing any previous one with that name.
  pub fn register_agent<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
  where
    F: Fn(AgentContext) -> Box<dyn Agent> + Send + Sync + 'static,
  {
    self.agents.insert(name.into(), Arc::new(factory));
    self
  }

  /// Register a tool factory, replacing any previous one with that name.
  pub fn register_tool<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
  where
    F: Fn(&Payload) -> Arc<dyn Tool> + Send + Sync + 'static,
  {
    self.tools.insert(name.into(), Arc::new(factory));
    self
  }

  /// Construct a tool from its node-level configuration.
  pub fn build_tool(&self, config: &ToolConfig) -> Result<Arc<dyn Tool>, RegistryError> {
    let factory = self
      .tools
      .get(&config.name)
      .ok_or_else(|| RegistryError::UnknownTool(config.name.clone()))?;
    Ok(factory(&config.config))
  }

  /// Construct an agent together with all of its tools.
  ///
  /// The agent name is checked before any tool is built.
  pub fn build_agent(&self, config: &AgentConfig) -> Result<Box<dyn Agent>, RegistryError> {
    let factory = self
      .agents
      .get(&config.name)
      .ok_or_else(|| RegistryError::UnknownAgent(config.name.clone()))?;

    let tools = config
      .tools
      .iter()
      .map(|tool| self.build_tool(tool))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(factory(AgentContext::new(config.params.clone(), tools)))
  }

  pub fn has_agent(&self, name: &str) -> bool {
    self.agents.contains_key(name)
  }

  pub fn has_tool(&self, name: &str) -> bool {
    self.tools.contains_key(name)
  }

  /// Registered agent names, sorted.
  pub fn agent_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.agents.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Registered tool names, sorted.
  pub fn tool_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }
}

impl std::fmt::Debug for Registry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Registry")
      .field("agents", &self.agent_names())
      .field("tools", &self.tool_names())
      .finish()
  }
}
