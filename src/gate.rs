//! Register → validate → kickoff, stopping at the first gate that says no

use std::io::Write;
use std::process::ExitCode;

use tracing::{info, warn};

use crate::config::{Config, ValidateMethod};
use crate::crew::{CrewOutput, Kickoff};
use crate::machineid::MachineIdClient;
use crate::types::{show, RegisterStatus};
use crate::{Error, Result};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Register answered `limit_reached`; the crew was not built
    LimitReached,
    /// Register answered anything other than `ok`/`exists`/`limit_reached`
    RegisterFailed,
    /// Validate did not answer `allowed: true`; the crew was not built
    Denied,
    /// The crew ran but kickoff returned an error
    CrewFailed(String),
    Completed(CrewOutput),
}

impl Outcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::LimitReached | Self::Denied | Self::Completed(_) => ExitCode::SUCCESS,
            Self::RegisterFailed | Self::CrewFailed(_) => ExitCode::FAILURE,
        }
    }
}

/// Run the gated flow once, writing progress lines to `out`.
///
/// `build_crew` is only called after validation allows the device, and the
/// crew it returns is kicked off exactly once.
///
/// # Errors
///
/// Transport failures, non-JSON replies, undecodable replies, crew
/// construction errors and write failures on `out`.
pub async fn run<K, F, W>(
    config: &Config,
    client: &MachineIdClient,
    build_crew: F,
    out: &mut W,
) -> Result<Outcome>
where
    K: Kickoff,
    F: FnOnce() -> Result<K>,
    W: Write,
{
    writeln!(out, "✔ MACHINEID_ORG_KEY loaded: {}", config.masked_org_key())?;
    writeln!(out, "Using base_url: {}", config.base_url)?;
    writeln!(out, "Using device_id: {}", config.device_id)?;
    writeln!(out)?;

    writeln!(out, "→ Registering device '{}'", config.device_id)?;
    let reg = report_non_json(client.register_device(&config.device_id).await, out)?;
    writeln!(out, "✔ register status={}", show(reg.status.as_ref()))?;
    if let Some(plan) = reg.plan_summary() {
        writeln!(out, "  {plan}")?;
    }

    match reg.status() {
        RegisterStatus::Ok | RegisterStatus::Exists => {}
        RegisterStatus::LimitReached => {
            warn!(device_id = %config.device_id, "device limit reached");
            writeln!(out, "🚫 Device limit reached. Crew will NOT start.")?;
            return Ok(Outcome::LimitReached);
        }
        RegisterStatus::Failed => {
            writeln!(out, "🚫 Register failed: {}", reg.raw)?;
            return Ok(Outcome::RegisterFailed);
        }
    }

    tokio::time::sleep(config.settle_delay).await;

    let method = match config.validate_method {
        ValidateMethod::Post => "POST canonical",
        ValidateMethod::Get => "GET",
    };
    writeln!(out, "→ Validating device '{}' ({method})", config.device_id)?;
    let val = report_non_json(
        client
            .validate_device(&config.device_id, config.validate_method)
            .await,
        out,
    )?;
    writeln!(
        out,
        "✔ decision allowed={} code={} request_id={}",
        val.is_allowed(),
        show(val.code.as_ref()),
        show(val.request_id.as_ref()),
    )?;

    if !val.is_allowed() {
        info!(reason = ?val.reason, "execution denied");
        writeln!(out, "🚫 Execution denied. Crew will NOT start.")?;
        return Ok(Outcome::Denied);
    }

    writeln!(out, "✅ Execution allowed. Starting CrewAI run.")?;
    writeln!(out)?;

    let crew = build_crew()?;
    match crew.kickoff().await {
        Ok(result) => {
            writeln!(out, "✔ CrewAI result:")?;
            writeln!(out, "{result}")?;
            writeln!(out)?;
            writeln!(out, "Done.")?;
            Ok(Outcome::Completed(result))
        }
        Err(e) => {
            writeln!(out, "❌ CrewAI run failed: {e}")?;
            Ok(Outcome::CrewFailed(e.to_string()))
        }
    }
}

fn report_non_json<T, W: Write>(res: Result<T>, out: &mut W) -> Result<T> {
    if let Err(Error::NonJson { status, body }) = &res {
        writeln!(out, "❌ Non-JSON response")?;
        writeln!(out, "HTTP: {status}")?;
        writeln!(out, "{body}")?;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::TaskOutput;

    #[test]
    fn exit_codes() {
        assert_eq!(Outcome::LimitReached.exit_code(), ExitCode::SUCCESS);
        assert_eq!(Outcome::Denied.exit_code(), ExitCode::SUCCESS);
        assert_eq!(Outcome::RegisterFailed.exit_code(), ExitCode::FAILURE);
        assert_eq!(
            Outcome::CrewFailed("boom".to_string()).exit_code(),
            ExitCode::FAILURE
        );
        let done = Outcome::Completed(CrewOutput {
            raw: "ok".to_string(),
            tasks_output: vec![TaskOutput {
                agent: "a".to_string(),
                description: "d".to_string(),
                raw: "ok".to_string(),
            }],
        });
        assert_eq!(done.exit_code(), ExitCode::SUCCESS);
    }
}
