//! Renting and releasing cells.
//!
//! ```text
//! POST /cell/17/build/3                 -> 303 /?new_building=17
//! POST /cell/17/toggle  from_profile=1  -> 303 /profile
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;

use crate::domain::{BuildingType, CellId, Error, ReleaseOutcome, RentRequest};

use super::ApiResult;
use super::flash::{Flash, recover, redirect_with};
use super::session::SessionContext;
use super::state::HttpState;

/// Form sent with a release; `from_profile=1` returns to the profile page.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub from_profile: String,
}

impl ToggleForm {
    fn from_profile(&self) -> bool {
        self.from_profile == "1"
    }
}

/// Accept only the five known codes; anything else is a malformed request.
fn parse_building(raw: &str) -> Result<BuildingType, Error> {
    raw.trim()
        .parse::<i16>()
        .ok()
        .and_then(|code| BuildingType::try_from(code).ok())
        .ok_or_else(|| Error::invalid_request("Unknown building type."))
}

/// Rent a cell for one of the five building types.
#[post("/cell/{id}/build/{building}")]
pub async fn build(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i32, String)>,
) -> ApiResult<HttpResponse> {
    let (cell_id, building) = path.into_inner();
    let user = match session.require_user() {
        Ok(user) => user,
        Err(err) => return recover(&session, err, "/login"),
    };
    let building = match parse_building(&building) {
        Ok(building) => building,
        Err(err) => return recover(&session, err, "/"),
    };

    let request = RentRequest::new(user, CellId::new(cell_id), building);
    match state.bookings.rent(&request).await {
        Ok(receipt) => {
            session.set_balance(receipt.balance)?;
            redirect_with(
                &session,
                Flash::success(format!(
                    "Cell {} rented as a {} for {} credits. Remaining balance: {}.",
                    receipt.cell,
                    receipt.building.label(),
                    receipt.price,
                    receipt.balance
                )),
                &format!("/?new_building={cell_id}"),
            )
        }
        Err(err) => recover(&session, err, "/"),
    }
}

/// Release an owned cell, or report who holds it.
#[post("/cell/{id}/toggle")]
pub async fn toggle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: Option<web::Form<ToggleForm>>,
) -> ApiResult<HttpResponse> {
    let cell = CellId::new(path.into_inner());
    let from_profile = form.is_some_and(|form| form.from_profile());
    let user = match session.require_user() {
        Ok(user) => user,
        Err(err) => return recover(&session, err, "/login"),
    };

    match state.bookings.release(user, cell).await {
        Ok(ReleaseOutcome::Released { cell, .. }) => {
            let target = if from_profile {
                "/profile".to_owned()
            } else {
                format!("/?removed_cell={cell}")
            };
            redirect_with(
                &session,
                Flash::success(format!("Cell {cell} released.")),
                &target,
            )
        }
        Ok(ReleaseOutcome::OwnedByOther { owner, .. }) => redirect_with(
            &session,
            Flash::error(format!("This cell is already rented by {owner}.")),
            "/",
        ),
        Ok(ReleaseOutcome::AlreadyFree { cell }) => redirect_with(
            &session,
            Flash::error(format!("Cell {cell} is already free.")),
            "/",
        ),
        Err(err) => recover(&session, err, "/"),
    }
}
