use crate::commands::executable::Executable;
use crate::commands::{Arguments, CommandError, Context};
use crate::frame::{Payload, Request, Response};
use crate::record::Record;
use crate::Error;

/// Adds the flat only when its key is lower than every key in the collection.
#[derive(Debug, PartialEq)]
pub struct AddIfMin;

impl Executable for AddIfMin {
    fn usage(&self) -> &'static str {
        "add_if_min {element}"
    }

    fn description(&self) -> &'static str {
        "add a new element if it is lower than the lowest element of the collection"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        let flat = Arguments::new(request, self.usage()).record()?;

        // The store is sorted, so its first element holds the lowest key.
        let is_min = ctx
            .db
            .store
            .first()
            .map_or(true, |first| flat.key() < first.key());

        if !is_min {
            return Ok(Response::success(
                "Element is not lower than the lowest element, not added",
            ));
        }

        let id = ctx.db.store.add(flat).map_err(CommandError::from)?;

        Ok(Response::success(format!("Element added with id {}", id)).with_payload(Payload::Id(id)))
    }
}
