//! Minimal agent/task/crew runner
//!
//! A crew owns a set of agents and an ordered list of tasks. With the
//! sequential process each task runs once, in order, and sees the outputs of
//! the tasks before it as context. The last task's output is the crew result.

pub mod demo;
pub mod llm;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

pub use llm::{ChatMessage, ChatModel, OpenAiChat};

use crate::{Error, Result};

/// An LLM-backed worker with a fixed persona
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub allow_delegation: bool,
    llm: Arc<dyn ChatModel>,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            allow_delegation: false,
            llm,
        }
    }

    #[must_use]
    pub fn allow_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("model", &self.llm.model_name())
            .field("allow_delegation", &self.allow_delegation)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<Agent>,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }

    fn prompt(&self, context: &[TaskOutput]) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}",
            self.description.trim_end(),
            self.expected_output
        );
        if !context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            let joined = context
                .iter()
                .map(|o| o.raw.as_str())
                .collect::<Vec<_>>()
                .join("\n\n----------\n\n");
            prompt.push_str(&joined);
        }
        prompt
    }
}

/// How tasks are scheduled within a crew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Process {
    #[default]
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    pub agent: String,
    pub description: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewOutput {
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Anything that can be kicked off once to produce a crew result
#[async_trait]
pub trait Kickoff: Send + Sync {
    async fn kickoff(&self) -> Result<CrewOutput>;
}

#[derive(Debug)]
pub struct Crew {
    agents: Vec<Arc<Agent>>,
    tasks: Vec<Task>,
    process: Process,
}

impl Crew {
    /// # Errors
    ///
    /// Returns `Error::Crew` if there are no tasks or a task is assigned to an
    /// agent that is not part of the crew.
    pub fn new(agents: Vec<Arc<Agent>>, tasks: Vec<Task>, process: Process) -> Result<Self> {
        if tasks.is_empty() {
            return Err(Error::Crew("crew has no tasks".to_string()));
        }
        for task in &tasks {
            if !agents.iter().any(|a| Arc::ptr_eq(a, &task.agent)) {
                return Err(Error::Crew(format!(
                    "task agent '{}' is not a member of the crew",
                    task.agent.role
                )));
            }
        }
        Ok(Self {
            agents,
            tasks,
            process,
        })
    }

    pub fn agents(&self) -> &[Arc<Agent>] {
        &self.agents
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    async fn run_sequential(&self) -> Result<CrewOutput> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for (i, task) in self.tasks.iter().enumerate() {
            info!(task = i + 1, total = self.tasks.len(), agent = %task.agent.role, "running task");
            let messages = [
                ChatMessage::system(task.agent.system_prompt()),
                ChatMessage::user(task.prompt(&outputs)),
            ];
            let raw = task.agent.llm.complete(&messages).await?;
            outputs.push(TaskOutput {
                agent: task.agent.role.clone(),
                description: task.description.clone(),
                raw,
            });
        }
        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
        })
    }
}

#[async_trait]
impl Kickoff for Crew {
    async fn kickoff(&self) -> Result<CrewOutput> {
        match self.process {
            Process::Sequential => self.run_sequential().await,
        }
    }
}
