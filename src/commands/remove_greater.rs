use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Payload, Request, Response};
use crate::record::Record;
use crate::Error;

/// Removes every flat whose key is strictly greater than the given one.
#[derive(Debug, PartialEq)]
pub struct RemoveGreater;

impl Executable for RemoveGreater {
    fn usage(&self) -> &'static str {
        "remove_greater {element}"
    }

    fn description(&self) -> &'static str {
        "remove all elements greater than the given one"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        let pivot = Arguments::new(request, self.usage()).record()?;

        let count = ctx
            .db
            .store
            .remove_where(|flat| flat.key() > pivot.key());

        Ok(
            Response::success(format!("Removed {} elements greater than the given one", count))
                .with_payload(Payload::Count(count)),
        )
    }
}
