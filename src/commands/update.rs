use crate::commands::executable::Executable;
use crate::commands::{Arguments, CommandError, Context};
use crate::frame::{Request, Response};
use crate::Error;

/// Replaces the flat with the given id. The identity is preserved and the collection re-sorted.
#[derive(Debug, PartialEq)]
pub struct Update;

impl Executable for Update {
    fn usage(&self) -> &'static str {
        "update <id> {element}"
    }

    fn description(&self) -> &'static str {
        "update the element with the given id"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        let (id, flat) = Arguments::new(request, self.usage()).update()?;

        ctx.db.store.update(id, flat).map_err(CommandError::from)?;

        Ok(Response::success(format!("Element {} updated", id)))
    }
}
