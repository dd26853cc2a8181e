//! Line-oriented interactive session
//!
//! Reads one command per line and prints the resulting view. The login gate
//! only hides the dashboard; data keeps loading either way.

use crate::controller::DashboardController;
use crate::error::{DashboardError, Result};
use crate::render::{DashboardView, RegionListing};
use crate::state::{DashboardState, Summary};
use aadhaar_core::config::CapacityConfig;
use aadhaar_core::{ALL_DISTRICTS, AllocationEntry};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  login              open the dashboard
  logout             return to the login screen
  state <name>       select a state (district resets to All)
  district <name>    select a district of the current state, or All
  capacity <n>       set capacity per center
  regions            list states, or the districts of the selected state
  show               print the dashboard
  json               print the dashboard state as JSON
  help               show this help
  quit               leave the session";

#[derive(Serialize)]
struct JsonView<'a> {
    state: &'a DashboardState,
    summary: Summary,
    allocation: Vec<AllocationEntry>,
}

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Open the dashboard view
    Login,
    /// Return to the login view
    Logout,
    /// Select a state
    State(String),
    /// Select a district of the current state
    District(String),
    /// Set capacity per center
    Capacity(u32),
    /// List regions
    Regions,
    /// Print the dashboard
    Show,
    /// Print the state as JSON
    Json,
    /// Print the command list
    Help,
    /// End the session
    Quit,
}

impl FromStr for SessionCommand {
    type Err = DashboardError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let argument = |name: &str| {
            if rest.is_empty() {
                Err(DashboardError::InvalidCommand(format!("`{name}` needs an argument")))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "state" => argument("state").map(Self::State),
            "district" => argument("district").map(Self::District),
            "capacity" => {
                let value = argument("capacity")?;
                value
                    .parse()
                    .map(Self::Capacity)
                    .map_err(|_| DashboardError::InvalidCommand(format!("not a number: {value}")))
            }
            "regions" => Ok(Self::Regions),
            "show" => Ok(Self::Show),
            "json" => Ok(Self::Json),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(DashboardError::InvalidCommand(format!(
                "unknown command `{other}`; type `help`"
            ))),
        }
    }
}

/// Interactive session over a controller
#[derive(Debug)]
pub struct Session<'a> {
    controller: &'a DashboardController,
    capacity: &'a CapacityConfig,
}

impl<'a> Session<'a> {
    /// Create a session; `capacity` bounds the values `capacity <n>` accepts
    #[must_use]
    pub const fn new(controller: &'a DashboardController, capacity: &'a CapacityConfig) -> Self {
        Self {
            controller,
            capacity,
        }
    }

    /// Run until `quit` or end of input
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Command
    /// and request errors are printed and the session continues.
    pub async fn run<R, W>(&self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        write!(output, "{}", DashboardView(&self.controller.snapshot()))?;
        output.flush()?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<SessionCommand>() {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => {
                    if let Err(e) = self.execute(command, output).await {
                        writeln!(output, "Error: {e}")?;
                    }
                }
                Err(e) => writeln!(output, "{e}")?,
            }
            output.flush()?;
        }
        Ok(())
    }

    /// Execute one command, printing its result
    ///
    /// # Errors
    ///
    /// Returns validation and request errors, and output failures.
    pub async fn execute<W: Write>(&self, command: SessionCommand, output: &mut W) -> Result<()> {
        let controller = self.controller;

        if !controller.is_logged_in()
            && !matches!(
                command,
                SessionCommand::Login | SessionCommand::Help | SessionCommand::Quit
            )
        {
            write!(output, "{}", DashboardView(&controller.snapshot()))?;
            return Ok(());
        }

        match command {
            SessionCommand::Login => controller.log_in(),
            SessionCommand::Logout => controller.log_out(),
            SessionCommand::State(state) => {
                let known = controller.with_state(|s| {
                    s.directory.value().is_empty() || s.directory.value().states.contains(&state)
                });
                if !known {
                    return Err(DashboardError::unknown_state(state));
                }
                controller.select_state(&state).await?;
            }
            SessionCommand::District(district) => {
                let (has_state, known) = controller.with_state(|s| {
                    (
                        s.selection.has_state(),
                        district == ALL_DISTRICTS || s.districts.contains(&district),
                    )
                });
                if !has_state {
                    return Err(DashboardError::NoStateSelected);
                }
                if !known {
                    return Err(DashboardError::unknown_district(district));
                }
                controller.select_district(&district).await?;
            }
            SessionCommand::Capacity(value) => {
                let capacity = self.capacity.control_value(value)?;
                controller.set_capacity(capacity.get())?;
            }
            SessionCommand::Regions => {
                let listing = controller.with_state(|s| {
                    let state = s.selection.has_state().then_some(s.selection.state.as_str());
                    RegionListing {
                        directory: s.directory.value(),
                        state,
                    }
                    .to_string()
                });
                write!(output, "{listing}")?;
                return Ok(());
            }
            SessionCommand::Json => {
                let snapshot = controller.snapshot();
                let document = JsonView {
                    summary: snapshot.summary(),
                    allocation: snapshot.allocation(),
                    state: &snapshot,
                };
                writeln!(output, "{}", serde_json::to_string_pretty(&document)?)?;
                return Ok(());
            }
            SessionCommand::Help => {
                writeln!(output, "{HELP}")?;
                return Ok(());
            }
            SessionCommand::Show | SessionCommand::Quit => {}
        }

        write!(output, "{}", DashboardView(&controller.snapshot()))?;
        Ok(())
    }
}
