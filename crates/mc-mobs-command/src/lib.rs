//! Administrative command parsing and results.
//!
//! The parser knows nothing about the simulation; the server maps each
//! [`AdminCommand`] onto it and reports back through [`CommandResult`].

use std::fmt;

/// Result returned by a command handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// Whether the command executed successfully.
    pub success: bool,
    /// Messages to send back to the command sender.
    pub messages: Vec<String>,
    /// If true, the server should shut down.
    pub should_stop: bool,
}

impl CommandResult {
    /// Create a successful result with a single message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: vec![message.into()],
            should_stop: false,
        }
    }

    /// Create a failed result with a single message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
            should_stop: false,
        }
    }
}

/// Creature kinds accepted by `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Animal,
    Monster,
}

impl KindFilter {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "animal" | "animals" => Some(KindFilter::Animal),
            "monster" | "monsters" | "mob" | "mobs" => Some(KindFilter::Monster),
            _ => None,
        }
    }
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    /// Remove creatures, optionally only in one world and of some kinds.
    Clear {
        world: Option<String>,
        kinds: Vec<KindFilter>,
    },
    /// Report the live creature count.
    Count,
    /// Spawn a creature by name or network id.
    Spawn {
        kind: String,
        position: Option<(f32, f32, f32)>,
        world: Option<String>,
    },
    Stop,
    Help,
}

/// Name, usage and description of every command, in help order.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("clear", "clear [world] [animal|monster]...", "Remove creatures"),
    ("count", "count", "Show how many creatures are alive"),
    ("spawn", "spawn <name|id> [x y z] [world]", "Spawn a creature"),
    ("stop", "stop", "Save spawn sites and stop the server"),
    ("help", "help", "List available commands"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    InvalidNumber(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => f.write_str("Empty command"),
            CommandError::Unknown(name) => write!(
                f,
                "Unknown command: {name}. Type help for a list of commands."
            ),
            CommandError::Usage(usage) => write!(f, "Usage: {usage}"),
            CommandError::InvalidNumber(s) => write!(f, "Invalid number: {s}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CommandError> for CommandResult {
    fn from(e: CommandError) -> Self {
        CommandResult::err(e.to_string())
    }
}

fn usage_of(name: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, usage, _)| *usage)
        .unwrap_or("help")
}

impl AdminCommand {
    /// Parse a console line such as `spawn zombie 10 5 -3 world`.
    ///
    /// A leading `/` is accepted.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.trim().trim_start_matches('/').split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        match name.as_str() {
            "clear" => Ok(parse_clear(&args)),
            "count" => Ok(AdminCommand::Count),
            "spawn" => parse_spawn(&args),
            "stop" => Ok(AdminCommand::Stop),
            "help" | "?" => Ok(AdminCommand::Help),
            _ => Err(CommandError::Unknown(name.clone())),
        }
    }
}

fn parse_clear(args: &[&str]) -> AdminCommand {
    let mut world = None;
    let mut kinds = Vec::new();
    for arg in args {
        match KindFilter::parse(arg) {
            Some(kind) => {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            None if world.is_none() => world = Some(arg.to_string()),
            None => {}
        }
    }
    AdminCommand::Clear { world, kinds }
}

fn parse_spawn(args: &[&str]) -> Result<AdminCommand, CommandError> {
    let Some((kind, rest)) = args.split_first() else {
        return Err(CommandError::Usage(usage_of("spawn")));
    };
    let (position, world) = match rest {
        [] => (None, None),
        [world] => (None, Some(world.to_string())),
        [x, y, z] => (Some((number(x)?, number(y)?, number(z)?)), None),
        [x, y, z, world] => (
            Some((number(x)?, number(y)?, number(z)?)),
            Some(world.to_string()),
        ),
        _ => return Err(CommandError::Usage(usage_of("spawn"))),
    };
    Ok(AdminCommand::Spawn {
        kind: kind.to_string(),
        position,
        world,
    })
}

fn number(s: &str) -> Result<f32, CommandError> {
    s.parse()
        .map_err(|_| CommandError::InvalidNumber(s.to_string()))
}

/// The `help` listing.
pub fn help() -> CommandResult {
    let mut lines = vec!["Available commands:".to_string()];
    for (_, usage, description) in COMMANDS {
        lines.push(format!("  {usage} - {description}"));
    }
    CommandResult {
        success: true,
        messages: lines,
        should_stop: false,
    }
}

/// Result of `stop`.
pub fn stop() -> CommandResult {
    CommandResult {
        success: true,
        messages: vec!["Stopping the server...".to_string()],
        should_stop: true,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
