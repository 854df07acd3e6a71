use casteradm_client::parse_field;

/// A console input line, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { user: String, password: String },
    Logout,
    Whoami,
    Go(String),
    Refresh,
    Get(String),
    Post { endpoint: String, fields: Vec<(String, String)> },
    Endpoints,
    Clear,
    Help,
    Exit,
}

pub const HELP: &[&str] = &[
    "Available commands:",
    "  login <user> <password>          - Store credentials for this session",
    "  logout                           - Forget the stored credentials",
    "  whoami                           - Show the logged in user",
    "  go <page>                        - Navigate to a page",
    "  refresh                          - Reload the data of the current page",
    "  get <endpoint>                   - GET an admin API endpoint",
    "  post <endpoint> [key=value ...]  - POST to an admin API endpoint",
    "  endpoints                        - List the known endpoints",
    "  clear                            - Clear the output",
    "  help                             - Show this help message",
    "  exit, quit                       - Exit the console",
];

pub fn parse_command(input: &str) -> Result<Option<Command>, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(name) = parts.first() else {
        return Ok(None);
    };

    let command = match *name {
        "login" => match parts.as_slice() {
            [_, user, password] => Command::Login {
                user: user.to_string(),
                password: password.to_string(),
            },
            _ => return Err("login requires a user and a password".to_string()),
        },
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "go" => match parts.get(1) {
            Some(page) => Command::Go(page.to_string()),
            None => return Err("go requires a page name".to_string()),
        },
        "refresh" => Command::Refresh,
        "get" => match parts.get(1) {
            Some(endpoint) => Command::Get(endpoint.to_string()),
            None => return Err("get requires an endpoint".to_string()),
        },
        "post" => {
            let Some(endpoint) = parts.get(1) else {
                return Err("post requires an endpoint".to_string());
            };
            let fields = parts[2..]
                .iter()
                .map(|field| parse_field(field).ok_or_else(|| format!("invalid field '{}', expected key=value", field)))
                .collect::<Result<Vec<_>, _>>()?;
            Command::Post {
                endpoint: endpoint.to_string(),
                fields,
            }
        }
        "endpoints" => Command::Endpoints,
        "clear" => Command::Clear,
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        other => return Err(format!("Unknown command: {}", other)),
    };

    Ok(Some(command))
}
