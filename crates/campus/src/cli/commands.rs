use super::logging;
use super::render;
use super::setup::{Cli, Commands, RecordCommand};
use anyhow::{Context, Result};
use campusapp::api::CampusApi;
use campusapp::init::initialize;
use campusapp::store::StorageBackend;
use campusapp::validation::parse_body;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = initialize(cli.data)?;
    let output = dispatch(&ctx.api, cli.command)?;
    println!("{}", render::json(&output)?);
    Ok(())
}

fn dispatch<B: StorageBackend>(api: &CampusApi<B>, command: Commands) -> Result<Value> {
    match command {
        Commands::Course(cmd) => match cmd {
            RecordCommand::List => to_value(api.list_courses()?),
            RecordCommand::Get { id } => to_value(api.get_course(&id)?),
            RecordCommand::Create { body } => to_value(api.create_course(&read_body(&body)?)?),
            RecordCommand::Update { body } => to_value(api.update_course(&read_body(&body)?)?),
            RecordCommand::Delete { id } => to_value(api.delete_course(&id)?),
        },
        Commands::User(cmd) => match cmd {
            RecordCommand::List => to_value(api.list_users()?),
            RecordCommand::Get { id } => to_value(api.get_user(&id)?),
            RecordCommand::Create { body } => to_value(api.create_user(&read_body(&body)?)?),
            RecordCommand::Update { body } => to_value(api.update_user(&read_body(&body)?)?),
            RecordCommand::Delete { id } => to_value(api.delete_user(&id)?),
        },
    }
}

fn read_body(arg: &str) -> Result<Value> {
    if arg == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read body from stdin")?;
        Ok(parse_body(&raw)?)
    } else {
        Ok(parse_body(arg)?)
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusapp::api::CampusPaths;
    use campusapp::error::{CampusError, ErrorKind};
    use campusapp::store::MemBackend;

    fn api(backend: &MemBackend) -> CampusApi<&MemBackend> {
        CampusApi::open(backend, &CampusPaths::in_dir("mem")).unwrap()
    }

    fn exec(api: &CampusApi<&MemBackend>, args: &[&str]) -> Result<Value> {
        let mut argv = vec!["campus"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        dispatch(api, cli.command)
    }

    fn kind(err: &anyhow::Error) -> ErrorKind {
        err.downcast_ref::<CampusError>().unwrap().kind()
    }

    #[test]
    fn test_create_then_get_course() {
        let backend = MemBackend::new();
        let api = api(&backend);

        let ack = exec(
            &api,
            &[
                "course",
                "create",
                r#"{"name":"Intro","description":"d","price":2,"tags":["x"],"author":"A"}"#,
            ],
        )
        .unwrap();
        assert_eq!(ack["msg"], "ok");

        let id = ack["id"].as_str().unwrap();
        let course = exec(&api, &["course", "get", id]).unwrap();
        assert_eq!(course["name"], "Intro");
        assert_eq!(course["createdAt"], course["updateAt"]);
    }

    #[test]
    fn test_list_renders_collection_document() {
        let backend = MemBackend::new();
        let api = api(&backend);

        let listed = exec(&api, &["user", "list"]).unwrap();
        assert_eq!(listed, serde_json::json!({"users": []}));
    }

    #[test]
    fn test_malformed_body_is_validation_failure() {
        let backend = MemBackend::new();
        let api = api(&backend);

        let err = exec(&api, &["user", "create", "{oops"]).unwrap_err();
        assert_eq!(kind(&err), ErrorKind::ValidationFailure);
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn test_update_and_delete_user() {
        let backend = MemBackend::new();
        let api = api(&backend);

        let ack = exec(
            &api,
            &["user", "create", r#"{"name":"Ada","email":"ada@example.com","role":"member"}"#],
        )
        .unwrap();
        let id = ack["id"].as_str().unwrap().to_string();

        let body = format!(r#"{{"id":"{}","role":"admin"}}"#, id);
        let updated = exec(&api, &["user", "update", &body]).unwrap();
        assert_eq!(updated["role"], "admin");
        assert_eq!(updated["email"], "ada@example.com");

        let deleted = exec(&api, &["user", "delete", &id]).unwrap();
        assert_eq!(deleted["id"], id.as_str());

        let err = exec(&api, &["user", "get", &id]).unwrap_err();
        assert_eq!(kind(&err), ErrorKind::NotFound);
    }
}
