use std::env;
use std::process::ExitCode;

use serde::Serialize;

use minecraft_api_lib::core::platforms::ReleaseType;
use minecraft_api_lib::core::server::DEFAULT_PORT;
use minecraft_api_lib::{commands, init_tracing, ApiError, ApiResult, ApiSettings, AppState};

const USAGE: &str = "usage: minecraft-api <command> [args]

commands:
  status <host> [port]
  search <query> [type] [loader] [game-version] [limit] [offset]
  project <id>
  icon <id>
  versions <id> [game-version] [loader] [release|beta|alpha]
  version <id> <version-id>
  loader-versions <fabric|forge> [game-version]
  loader-installers <fabric|forge> [game-version]
  minecraft-versions [major] [--snapshots]
  jars <version-id>
  java [platform]
  java-platforms";

fn print<T: Serialize>(value: &T) -> ApiResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn arg(args: &[String], index: usize) -> Option<&str> {
    args.get(index).map(String::as_str).filter(|a| !a.is_empty())
}

fn required<'a>(args: &'a [String], index: usize, name: &str) -> ApiResult<&'a str> {
    arg(args, index).ok_or_else(|| ApiError::InvalidArgument(format!("missing <{name}>")))
}

fn number<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> ApiResult<T> {
    match arg(args, index) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::InvalidArgument(format!("not a number: {raw}"))),
        None => Ok(default),
    }
}

fn list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

async fn run(state: &AppState, args: &[String]) -> ApiResult<()> {
    let Some(command) = arg(args, 1) else {
        return Err(ApiError::InvalidArgument(USAGE.to_string()));
    };

    match command {
        "status" => {
            let host = required(args, 2, "host")?;
            let port = number(args, 3, i64::from(DEFAULT_PORT))?;
            print(&commands::probe_server_status(state, host, port).await?)
        }
        "search" => {
            let query = required(args, 2, "query")?;
            let results = commands::search_projects(
                state,
                query,
                arg(args, 3).unwrap_or("mod"),
                arg(args, 4),
                arg(args, 5),
                number(args, 6, 10)?,
                number(args, 7, 0)?,
            )
            .await?;
            print(&results)
        }
        "project" => {
            let id = required(args, 2, "id")?;
            print(&commands::get_project(state, id, "").await?)
        }
        "icon" => {
            let id = required(args, 2, "id")?;
            print(&commands::get_project_icon(state, id).await?)
        }
        "versions" => {
            let id = required(args, 2, "id")?;
            let release_types: Vec<ReleaseType> = list(arg(args, 5))
                .iter()
                .map(|r| ReleaseType::parse(r))
                .collect();
            let versions = commands::get_project_versions(
                state,
                id,
                &list(arg(args, 3)),
                &list(arg(args, 4)),
                &release_types,
                0,
                0,
            )
            .await?;
            print(&versions)
        }
        "version" => {
            let id = required(args, 2, "id")?;
            let version_id = required(args, 3, "version-id")?;
            print(&commands::get_project_version(state, id, version_id).await?)
        }
        "loader-versions" => {
            let loader = required(args, 2, "loader")?;
            print(&commands::get_loader_versions(state, loader, arg(args, 3)).await?)
        }
        "loader-installers" => {
            let loader = required(args, 2, "loader")?;
            print(&commands::get_loader_installers(state, loader, arg(args, 3)).await?)
        }
        "minecraft-versions" => {
            let snapshots = args.iter().any(|a| a == "--snapshots");
            let major = arg(args, 2).filter(|a| !a.starts_with("--"));
            print(&commands::get_minecraft_versions(state, major, snapshots).await?)
        }
        "jars" => {
            let id = required(args, 2, "version-id")?;
            print(&commands::get_version_jars(state, id).await?)
        }
        "java" => print(&commands::get_java_runtimes(state, arg(args, 2).unwrap_or("")).await?),
        "java-platforms" => print(&commands::get_java_platforms(state).await?),
        other => Err(ApiError::InvalidArgument(format!(
            "unknown command '{other}'\n\n{USAGE}"
        ))),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let state = match AppState::new(ApiSettings::load()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&state, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
