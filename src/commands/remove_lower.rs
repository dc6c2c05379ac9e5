use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Payload, Request, Response};
use crate::record::Record;
use crate::Error;

/// Removes every flat whose key is strictly lower than the given one.
#[derive(Debug, PartialEq)]
pub struct RemoveLower;

impl Executable for RemoveLower {
    fn usage(&self) -> &'static str {
        "remove_lower {element}"
    }

    fn description(&self) -> &'static str {
        "remove all elements lower than the given one"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        let pivot = Arguments::new(request, self.usage()).record()?;

        let count = ctx
            .db
            .store
            .remove_where(|flat| flat.key() < pivot.key());

        Ok(
            Response::success(format!("Removed {} elements lower than the given one", count))
                .with_payload(Payload::Count(count)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{flat, names, seeded};
    use crate::commands::Registry;

    #[test]
    fn removes_strictly_lower() {
        let (_dir, mut db) = seeded(&["C", "A", "B", "B"]);
        let registry = Registry::with_defaults();

        let response = registry.dispatch(
            Request::with_payload("remove_lower", Payload::Record(flat("B"))),
            &mut db,
        );

        assert_eq!(response.payload, Some(Payload::Count(1)));
        assert_eq!(names(&db), vec!["B", "B", "C"]);
    }

    #[test]
    fn pivot_below_everything() {
        let (_dir, mut db) = seeded(&["B", "C"]);
        let registry = Registry::with_defaults();

        let response = registry.dispatch(
            Request::with_payload("remove_lower", Payload::Record(flat("A"))),
            &mut db,
        );

        assert_eq!(response.payload, Some(Payload::Count(0)));
        assert_eq!(names(&db), vec!["B", "C"]);
    }
}
