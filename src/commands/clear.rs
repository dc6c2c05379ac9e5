use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Request, Response};
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct Clear;

impl Executable for Clear {
    fn usage(&self) -> &'static str {
        "clear"
    }

    fn description(&self) -> &'static str {
        "remove every element from the collection"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        Arguments::new(request, self.usage()).none()?;

        ctx.db.store.clear();

        Ok(Response::success("Collection cleared"))
    }
}
