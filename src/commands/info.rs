use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Request, Response};
use crate::Error;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Describes the collection: where it lives, how big it is and when it was loaded and saved.
#[derive(Debug, PartialEq)]
pub struct Info;

impl Executable for Info {
    fn usage(&self) -> &'static str {
        "info"
    }

    fn description(&self) -> &'static str {
        "print information about the collection"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        Arguments::new(request, self.usage()).none()?;

        let db = &ctx.db;
        let saved_at = db
            .saved_at()
            .map(|time| time.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| "never".to_string());

        let info = format!(
            "type: sorted collection of flats\n\
             file: {}\n\
             elements: {}\n\
             next id: {}\n\
             initialized: {}\n\
             last saved: {}",
            db.location(),
            db.store.len(),
            db.store.next_id(),
            db.initialized_at().format(TIME_FORMAT),
            saved_at,
        );

        Ok(Response::success(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::seeded;
    use crate::commands::Registry;

    #[test]
    fn describes_collection() {
        let (_dir, mut db) = seeded(&["A", "B"]);
        let registry = Registry::with_defaults();

        let response = registry.dispatch(Request::new("info"), &mut db);

        assert!(response.success);
        assert!(response.message.contains("elements: 2"));
        assert!(response.message.contains("next id: 3"));
        assert!(response.message.contains("last saved: never"));

        registry.dispatch(Request::new("save"), &mut db);
        let response = registry.dispatch(Request::new("info"), &mut db);
        assert!(!response.message.contains("last saved: never"));
    }
}
