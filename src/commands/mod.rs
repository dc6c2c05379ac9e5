pub mod add;
pub mod add_if_min;
pub mod clear;
pub mod executable;
pub mod filter_starts_with_name;
pub mod group_counting_by_house;
pub mod help;
pub mod info;
pub mod remove_by_id;
pub mod remove_greater;
pub mod remove_lower;
pub mod save;
pub mod show;
pub mod sum_of_height;
pub mod update;

use std::collections::BTreeMap;
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use crate::commands::executable::Executable;
use crate::db::Database;
use crate::flat::Flat;
use crate::frame::{Payload, Request, Response};
use crate::persistence::PersistenceError;
use crate::store::StoreError;

use add::Add;
use add_if_min::AddIfMin;
use clear::Clear;
use filter_starts_with_name::FilterStartsWithName;
use group_counting_by_house::GroupCountingByHouse;
use help::Help;
use info::Info;
use remove_by_id::RemoveById;
use remove_greater::RemoveGreater;
use remove_lower::RemoveLower;
use save::Save;
use show::Show;
use sum_of_height::SumOfHeight;
use update::Update;

/// Everything a handler may touch while executing.
pub struct Context<'a> {
    pub db: &'a mut Database,
    pub registry: &'a Registry,
}

pub struct CommandDescriptor {
    pub name: String,
    pub usage: &'static str,
    pub description: &'static str,
    handler: Box<dyn Executable>,
}

/// Maps command names to their handlers. Filled once at startup and only read afterwards.
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<String, CommandDescriptor>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// A registry with every command the server supports.
    pub fn with_defaults() -> Registry {
        let mut registry = Registry::new();

        registry.register("help", Help);
        registry.register("info", Info);
        registry.register("show", Show);
        registry.register("add", Add);
        registry.register("update", Update);
        registry.register("remove_by_id", RemoveById);
        registry.register("clear", Clear);
        registry.register("save", Save);
        registry.register("remove_greater", RemoveGreater);
        registry.register("remove_lower", RemoveLower);
        registry.register("add_if_min", AddIfMin);
        registry.register("sum_of_height", SumOfHeight);
        registry.register("group_counting_by_house", GroupCountingByHouse);
        registry.register("filter_starts_with_name", FilterStartsWithName);

        registry
    }

    /// Binds `handler` to `name`. Registering the same name again replaces the previous handler.
    pub fn register<E>(&mut self, name: impl Into<String>, handler: E)
    where
        E: Executable + 'static,
    {
        let name = name.into();
        let descriptor = CommandDescriptor {
            name: name.clone(),
            usage: handler.usage(),
            description: handler.description(),
            handler: Box::new(handler),
        };
        self.commands.insert(name, descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// Registered commands in name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }

    /// Routes `request` to its handler. Any failure, including an unknown command, comes back as
    /// an unsuccessful response; nothing is propagated to the caller.
    pub fn dispatch(&self, request: Request, db: &mut Database) -> Response {
        let Some(descriptor) = self.commands.get(&request.command) else {
            let err = CommandError::UnknownCommand {
                command: request.command,
            };
            warn!("{}", err);
            return Response::failure(err.to_string());
        };

        debug!(command = %descriptor.name, "Executing command");

        let mut ctx = Context { db, registry: self };
        match descriptor.handler.exec(request, &mut ctx) {
            Ok(response) => response,
            Err(e) => {
                debug!(command = %descriptor.name, error = %e, "Command failed");
                Response::failure(e.to_string())
            }
        }
    }
}

#[derive(Debug, ThisError)]
pub enum CommandError {
    #[error("wrong arguments; usage: {usage}")]
    WrongArguments { usage: &'static str },
    #[error("unknown command {command}")]
    UnknownCommand { command: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Pulls the expected payload shape out of a request. Anything else is `WrongArguments`.
pub(crate) struct Arguments {
    payload: Option<Payload>,
    usage: &'static str,
}

impl Arguments {
    pub(crate) fn new(request: Request, usage: &'static str) -> Arguments {
        Arguments {
            payload: request.payload,
            usage,
        }
    }

    pub(crate) fn none(self) -> Result<(), CommandError> {
        match self.payload {
            None => Ok(()),
            Some(_) => Err(wrong(self.usage)),
        }
    }

    pub(crate) fn record(self) -> Result<Flat, CommandError> {
        match self.payload {
            Some(Payload::Record(flat)) => Ok(flat),
            _ => Err(wrong(self.usage)),
        }
    }

    pub(crate) fn update(self) -> Result<(u64, Flat), CommandError> {
        match self.payload {
            Some(Payload::Update { id, record }) => Ok((id, record)),
            _ => Err(wrong(self.usage)),
        }
    }

    pub(crate) fn id(self) -> Result<u64, CommandError> {
        match self.payload {
            Some(Payload::Id(id)) => Ok(id),
            _ => Err(wrong(self.usage)),
        }
    }

    pub(crate) fn text(self) -> Result<String, CommandError> {
        match self.payload {
            Some(Payload::Text(text)) => Ok(text),
            _ => Err(wrong(self.usage)),
        }
    }
}

fn wrong(usage: &'static str) -> CommandError {
    CommandError::WrongArguments { usage }
}
