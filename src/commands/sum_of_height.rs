use crate::commands::executable::Executable;
use crate::commands::{Arguments, Context};
use crate::frame::{Payload, Request, Response};
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct SumOfHeight;

impl Executable for SumOfHeight {
    fn usage(&self) -> &'static str {
        "sum_of_height"
    }

    fn description(&self) -> &'static str {
        "print the sum of the height field of every element"
    }

    fn exec(&self, request: Request, ctx: &mut Context<'_>) -> Result<Response, Error> {
        Arguments::new(request, self.usage()).none()?;

        let sum = ctx
            .db
            .store
            .iter()
            .filter_map(|flat| flat.height)
            .fold(0i64, i64::saturating_add);

        Ok(Response::success(format!("Sum of heights: {}", sum)).with_payload(Payload::Number(sum)))
    }
}
