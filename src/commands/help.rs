use itertools::Itertools;

use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Request, Response};
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct Help;

impl Executable for Help {
    fn usage(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "print help for the available commands"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        Arguments::new(request, self.usage()).none()?;

        let help = ctx
            .registry
            .descriptors()
            .map(|descriptor| format!("{} : {}", descriptor.usage, descriptor.description))
            .join("\n");

        Ok(Response::success(help))
    }
}
