use itertools::Itertools;

use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Payload, Request, Response};
use crate::Error;

/// Lists the flats whose name starts with the given prefix.
#[derive(Debug, PartialEq)]
pub struct FilterStartsWithName;

impl Executable for FilterStartsWithName {
    fn usage(&self) -> &'static str {
        "filter_starts_with_name <name>"
    }

    fn description(&self) -> &'static str {
        "print the elements whose name starts with the given substring"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        let prefix = Arguments::new(request, self.usage()).text()?;

        let matches: Vec<_> = ctx
            .db
            .store
            .iter()
            .filter(|flat| flat.name.starts_with(&prefix))
            .collect();

        let count = matches.len();
        let message = if matches.is_empty() {
            format!("No elements with a name starting with \"{}\"", prefix)
        } else {
            matches.into_iter().join("\n")
        };

        Ok(Response::success(message).with_payload(Payload::Count(count)))
    }
}
