//! `padhai ask` — One-shot query through the dispatcher.

use padhai_agent::{AgentRequest, Tone};
use padhai_core::profile::StudentId;
use tracing::debug;

pub async fn run(
    student: String,
    tone: Option<String>,
    query: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let tone = tone.as_deref().map(str::parse::<Tone>).transpose()?;

    let config = super::load_config()?;
    let orchestrator = super::build_orchestrator(&config).await?;

    let mut request = AgentRequest::new(query, StudentId::from(&student));
    request.tone = tone;

    let reply = orchestrator.handle(request).await?;
    debug!(student = %student, agent = %reply.label, "One-shot query answered");

    println!("[{}]", reply.label);
    println!("{}", reply.response);

    Ok(())
}
