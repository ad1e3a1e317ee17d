//! Command-line client for the CodeVault API.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use codevault_core::models::paste::NO_VIEW_ACTION;
use codevault_core::DEFAULT_CLI_SERVER_URL;
use serde_json::{json, Value};
use std::io::{self, Read, Write};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "vault", about = "CodeVault CLI", version)]
struct Cli {
    /// Server URL (can also be set via VAULT_SERVER env var)
    #[arg(short, long, env = "VAULT_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Create a paste from a file or stdin
    New {
        #[arg(short, long)]
        file: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
        /// Lifetime in seconds; omitted means the paste never expires
        #[arg(short, long)]
        expires: Option<String>,
        /// List the paste in the public recent feed
        #[arg(long)]
        public: bool,
    },
    /// Print a paste (counts a view unless --no-view)
    Get {
        id: String,
        #[arg(long)]
        no_view: bool,
    },
    /// Print only the content of a paste
    Raw {
        id: String,
    },
    /// Replace a paste's content from a file or stdin
    Update {
        id: String,
        #[arg(short, long)]
        file: Option<String>,
    },
    /// List recent public pastes
    Recent {
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

fn exit_with(action: &str, message: impl std::fmt::Display) -> ! {
    eprintln!("{} failed: {}", action, message);
    std::process::exit(1);
}

async fn ensure_success_or_exit(res: reqwest::Response, action: &str) -> reqwest::Response {
    let status = res.status();
    if status.is_success() {
        return res;
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_response(status, &body);
    eprintln!("{} failed ({}): {}", action, status, message);
    std::process::exit(1);
}

fn create_body(
    content: String,
    title: Option<String>,
    language: Option<String>,
    expires: Option<String>,
    public: bool,
) -> Value {
    let mut body = json!({ "content": content, "isPrivate": !public });
    if let Some(title) = title {
        body["title"] = title.into();
    }
    if let Some(language) = language {
        body["language"] = language.into();
    }
    if let Some(expires) = expires {
        body["expiresIn"] = expires.into();
    }
    body
}

fn pretty(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn format_created_output(created: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(created);
    }
    let id = created
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| "response missing 'id' field".to_string())?;
    match created.get("link").and_then(Value::as_str) {
        Some(link) => Ok(format!("Created: {}\n{}", id, link)),
        None => Ok(format!("Created: {}", id)),
    }
}

fn format_get_output(paste: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(paste);
    }

    paste
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "response missing 'content' field".to_string())
}

fn format_updated_output(id: &str, response: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(response);
    }
    let updated_at = response
        .get("updatedAt")
        .and_then(Value::as_str)
        .ok_or_else(|| "response missing 'updatedAt' field".to_string())?;
    Ok(format!("Updated: {} at {}", id, updated_at))
}

fn format_recent_output(pastes: &[Value], json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(pastes)
            .map_err(|err| format!("response encoding error: {}", err));
    }

    let mut rows = Vec::with_capacity(pastes.len());
    for (index, p) in pastes.iter().enumerate() {
        let field = |name: &str| p.get(name).and_then(Value::as_str);
        let (Some(id), Some(title)) = (field("id"), field("title")) else {
            return Err(format!(
                "response item {} missing 'id' or 'title' field",
                index
            ));
        };
        let language = field("language").unwrap_or("text");
        let views = p.get("views").and_then(Value::as_u64).unwrap_or(0);
        rows.push(format!("{:<12} {:<30} {:<12} {:>6}", id, title, language, views));
    }

    Ok(rows.join("\n"))
}

fn api_url(server: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(server)
        .map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn api_url_or_exit(server: &str, action: &str, segments: &[&str]) -> reqwest::Url {
    api_url(server, segments).unwrap_or_else(|message| exit_with(action, message))
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn resolve_server(server: Option<String>) -> String {
    server
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn read_content(file: Option<String>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn print_output(action: &str, output: Result<String, String>) {
    match output {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(message) => exit_with(action, message),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;
    let server = normalize_server(resolve_server(server));

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::New {
            file,
            title,
            language,
            expires,
            public,
        } => {
            let endpoint = api_url_or_exit(&server, "New", &["api", "paste"]);
            let content = read_content(file)?;
            let body = create_body(content, title, language, expires, public);

            let res = client.post(endpoint).json(&body).send().await?;
            let res = ensure_success_or_exit(res, "New").await;
            let created: Value = res.json().await?;
            print_output("New", format_created_output(&created, json));
        }
        Commands::Get { id, no_view } => {
            let endpoint = api_url_or_exit(&server, "Get", &["api", "paste", id.as_str()]);
            let mut request = client.get(endpoint);
            if no_view {
                request = request.query(&[("action", NO_VIEW_ACTION)]);
            }
            let res = ensure_success_or_exit(request.send().await?, "Get").await;
            let paste: Value = res.json().await?;
            print_output("Get", format_get_output(&paste, json));
        }
        Commands::Raw { id } => {
            let endpoint = api_url_or_exit(&server, "Raw", &["api", "paste", id.as_str(), "raw"]);
            let res = ensure_success_or_exit(client.get(endpoint).send().await?, "Raw").await;
            let content = res.text().await?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
        Commands::Update { id, file } => {
            let endpoint = api_url_or_exit(&server, "Update", &["api", "paste", id.as_str()]);
            let content = read_content(file)?;
            let res = client
                .put(endpoint)
                .json(&json!({ "content": content }))
                .send()
                .await?;
            let res = ensure_success_or_exit(res, "Update").await;
            let response: Value = res.json().await?;
            print_output("Update", format_updated_output(&id, &response, json));
        }
        Commands::Recent { limit } => {
            let endpoint = api_url_or_exit(&server, "Recent", &["api", "recent"]);
            let mut request = client.get(endpoint);
            if let Some(limit) = limit {
                request = request.query(&[("limit", limit)]);
            }
            let res = ensure_success_or_exit(request.send().await?, "Recent").await;
            let pastes: Vec<Value> = res.json().await?;
            print_output("Recent", format_recent_output(&pastes, json));
        }
    }

    Ok(())
}
