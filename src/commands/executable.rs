use crate::commands::Context;
use crate::frame::{Request, Response};
use crate::Error;

pub trait Executable: Send {
    /// How the command is invoked, e.g. `update <id> {element}`.
    fn usage(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error>;
}
