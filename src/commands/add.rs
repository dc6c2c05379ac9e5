use crate::commands::executable::Executable;
use crate::commands::{Arguments, CommandError, Context};
use crate::frame::{Payload, Request, Response};
use crate::Error;

/// Adds a new flat. The store assigns its identity, which is returned as the payload.
#[derive(Debug, PartialEq)]
pub struct Add;

impl Executable for Add {
    fn usage(&self) -> &'static str {
        "add {element}"
    }

    fn description(&self) -> &'static str {
        "add a new element to the collection"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        let flat = Arguments::new(request, self.usage()).record()?;

        let id = ctx.db.store.add(flat).map_err(CommandError::from)?;

        Ok(Response::success(format!("Element added with id {}", id)).with_payload(Payload::Id(id)))
    }
}
