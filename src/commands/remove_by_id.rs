use crate::commands::executable::Executable;
use crate::commands::{Arguments, CommandError, Context};
use crate::frame::{Request, Response};
use crate::store::StoreError;
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct RemoveById;

impl Executable for RemoveById {
    fn usage(&self) -> &'static str {
        "remove_by_id <id>"
    }

    fn description(&self) -> &'static str {
        "remove the element with the given id"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        let id = Arguments::new(request, self.usage()).id()?;

        if ctx.db.store.remove_by_id(id).is_none() {
            return Err(CommandError::from(StoreError::NotFound { id }).into());
        }

        Ok(Response::success(format!("Element {} removed", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{names, seeded};
    use crate::commands::Registry;
    use crate::frame::Payload;

    #[test]
    fn removes_existing() {
        let (_dir, mut db) = seeded(&["A", "B"]);
        let registry = Registry::with_defaults();

        let response = registry.dispatch(
            Request::with_payload("remove_by_id", Payload::Id(1)),
            &mut db,
        );

        assert_eq!(response, Response::success("Element 1 removed"));
        assert_eq!(names(&db), vec!["B"]);
    }

    #[test]
    fn missing_id() {
        let (_dir, mut db) = seeded(&["A"]);
        let registry = Registry::with_defaults();

        let response = registry.dispatch(
            Request::with_payload("remove_by_id", Payload::Id(5)),
            &mut db,
        );

        assert_eq!(response, Response::failure("no record with id 5"));
        assert_eq!(names(&db), vec!["A"]);
    }
}
