use itertools::Itertools;

use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Request, Response};
use crate::Error;

pub const EMPTY_COLLECTION: &str = "Collection is empty";

/// Lists every flat, one per line, in collection order.
#[derive(Debug, PartialEq)]
pub struct Show;

impl Executable for Show {
    fn usage(&self) -> &'static str {
        "show"
    }

    fn description(&self) -> &'static str {
        "print every element of the collection"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        Arguments::new(request, self.usage()).none()?;

        if ctx.db.store.is_empty() {
            return Ok(Response::success(EMPTY_COLLECTION));
        }

        Ok(Response::success(ctx.db.store.iter().join("\n")))
    }
}
