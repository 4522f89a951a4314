//! Command-line argument parsing for the `edu` binary.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Sign in and store the session
    Login { email: String, password: String },
    /// Forget the stored session
    Logout,
    /// Print the signed-in user
    Whoami,
    /// Change the signed-in user's role
    Role { role: String },
    /// GET a path and print the payload
    Get { path: String },
    /// POST to a streaming path and print each event
    Stream { path: String, body: Option<String> },
    /// Show what the route guard decides for a path
    Guard { path: String },
    /// The arguments could not be understood
    Invalid(String),
}

/// Usage text printed by `--help` and after invalid arguments.
pub const USAGE: &str = "\
Usage: edu <command> [args]

Commands:
  login <email> <password>   Sign in and store the session
  logout                     Forget the stored session
  whoami                     Print the signed-in user
  role <role>                Change your role
  get <path>                 GET a path and print the payload
  stream <path> [json-body]  POST to a streaming path and print each event
  guard <path>               Check whether a view may be entered

Options:
  -h, --help                 Show this help
  -V, --version              Show the version

Environment:
  EDU_API_BASE               API base URL (default http://localhost:8000/api/v1)
  EDU_CONNECT_TIMEOUT_SECS   Connect timeout in seconds (default 10)
  EDU_SESSION_FILE           Session file (default ~/.edu-client/session.json)
  RUST_LOG                   Log filter (default warn)";

/// Parse command-line arguments and return the command to execute.
///
/// # Examples
///
/// ```
/// use edu_client::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["edu".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if args
        .iter()
        .any(|a| matches!(a.as_str(), "--version" | "-V"))
    {
        return CliCommand::Version;
    }

    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match (command.as_str(), rest) {
        ("--help" | "-h" | "help", _) => CliCommand::Help,
        ("login", [email, password]) => CliCommand::Login {
            email: email.clone(),
            password: password.clone(),
        },
        ("logout", []) => CliCommand::Logout,
        ("whoami", []) => CliCommand::Whoami,
        ("role", [role]) => CliCommand::Role { role: role.clone() },
        ("get", [path]) => CliCommand::Get { path: path.clone() },
        ("stream", [path]) => CliCommand::Stream {
            path: path.clone(),
            body: None,
        },
        ("stream", [path, body]) => CliCommand::Stream {
            path: path.clone(),
            body: Some(body.clone()),
        },
        ("guard", [path]) => CliCommand::Guard { path: path.clone() },
        ("login" | "logout" | "whoami" | "role" | "get" | "stream" | "guard", _) => {
            CliCommand::Invalid(format!("wrong number of arguments for '{}'", command))
        }
        (other, _) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}
