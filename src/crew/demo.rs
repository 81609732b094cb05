//! The fixed single-agent crew run after a device is allowed

use std::sync::Arc;

use super::{Agent, ChatModel, Crew, Process, Task};
use crate::Result;

pub const WORKER_ROLE: &str = "CrewAI Worker";

/// Build the one-agent, one-task sequential crew.
///
/// # Errors
///
/// Only fails if crew validation fails, which the fixed graph never does.
pub fn build_demo_crew(llm: Arc<dyn ChatModel>) -> Result<Crew> {
    let agent = Arc::new(
        Agent::new(
            WORKER_ROLE,
            "Create short, practical 3-step plans that show developers how to keep \
             their CrewAI agents under control using MachineID.",
            "You help developers run CrewAI agents safely. MachineID acts as an \
             external device-level control plane: agents register on startup and \
             validate before doing work so runaway execution is impossible.",
            llm,
        )
        .allow_delegation(false),
    );

    let task = Task::new(
        "Write a concise 3-step plan explaining how to use MachineID with CrewAI:\n\
         - Register each agent on startup\n\
         - Validate before doing work\n\
         - Treat a failed validation as a hard stop\n",
        "Exactly 3 numbered steps, 1–2 sentences each, focused on register + \
         validate as enforcement boundaries.",
        Arc::clone(&agent),
    );

    Crew::new(vec![agent], vec![task], Process::Sequential)
}
