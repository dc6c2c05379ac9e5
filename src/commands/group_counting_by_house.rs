use itertools::Itertools;

use crate::commands::executable::Executable;
use crate::commands::show::EMPTY_COLLECTION;
use crate::commands::{Arguments, Context};
use crate::frame::{Request, Response};
use crate::Error;

const NO_HOUSE: &str = "<none>";

/// Counts flats per house name. Flats without a house, or with an unnamed one, are grouped
/// under `<none>`.
#[derive(Debug, PartialEq)]
pub struct GroupCountingByHouse;

impl Executable for GroupCountingByHouse {
    fn usage(&self) -> &'static str {
        "group_counting_by_house"
    }

    fn description(&self) -> &'static str {
        "group elements by house and print the size of every group"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        Arguments::new(request, self.usage()).none()?;

        if ctx.db.store.is_empty() {
            return Ok(Response::success(EMPTY_COLLECTION));
        }

        let groups = ctx
            .db
            .store
            .iter()
            .map(|flat| {
                flat.house
                    .as_ref()
                    .and_then(|house| house.name.as_deref())
                    .unwrap_or(NO_HOUSE)
            })
            .counts()
            .into_iter()
            .sorted()
            .map(|(house, count)| format!("{}: {}", house, count))
            .join("\n");

        Ok(Response::success(groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{database, flat};
    use crate::commands::Registry;
    use crate::flat::House;

    fn house(name: Option<&str>) -> Option<House> {
        Some(House {
            name: name.map(str::to_string),
            year: 2001,
            number_of_floors: 5,
        })
    }

    #[test]
    fn counts_per_house() {
        let (_dir, mut db) = database();
        let registry = Registry::with_defaults();
        for (name, h) in [
            ("A", house(Some("Tower"))),
            ("B", None),
            ("C", house(Some("Tower"))),
            ("D", house(Some("Annex"))),
            ("E", house(None)),
        ] {
            let mut f = flat(name);
            f.house = h;
            db.store.add(f).unwrap();
        }

        let response = registry.dispatch(Request::new("group_counting_by_house"), &mut db);

        assert_eq!(response.message, "<none>: 2\nAnnex: 1\nTower: 2");
    }
}
