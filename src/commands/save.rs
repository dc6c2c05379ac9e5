use crate::commands::executable::Executable;
use crate::commands::{Arguments, CommandError, Context};
use crate::frame::{Request, Response};
use crate::Error;

/// Writes the collection to its backing file.
#[derive(Debug, PartialEq)]
pub struct Save;

impl Executable for Save {
    fn usage(&self) -> &'static str {
        "save"
    }

    fn description(&self) -> &'static str {
        "save the collection to its file"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        Arguments::new(request, self.usage()).none()?;

        ctx.db.save().map_err(CommandError::from)?;

        Ok(Response::success("Collection saved"))
    }
}
