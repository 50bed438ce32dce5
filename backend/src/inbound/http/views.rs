//! JSON view models for the grid, profile and pricing pages.
//!
//! Rendering is left to the client; each view carries everything its page
//! shows, including the flash messages queued by the previous request.

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    ACCOUNT_GONE, BuildingType, Cell, Error, GRID_COLUMNS, GRID_ROWS, Occupancy, OwnedCell, User,
};

use super::ApiResult;
use super::flash::{Flash, recover, redirect_with};
use super::session::{SIGN_IN_FIRST, SessionContext};
use super::state::HttpState;

/// Cell ids echoed back after a rental or release so the page can highlight
/// them.
#[derive(Debug, Default, Deserialize)]
pub struct Highlight {
    pub new_building: Option<i32>,
    pub removed_cell: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub id: i32,
    pub occupied: bool,
    pub building_type: Option<i16>,
    pub building_label: Option<&'static str>,
    pub owner_name: Option<String>,
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        match cell.occupancy {
            Occupancy::Free => Self {
                id: cell.id.get(),
                occupied: false,
                building_type: None,
                building_label: None,
                owner_name: None,
            },
            Occupancy::Occupied { owner, building } => Self {
                id: cell.id.get(),
                occupied: true,
                building_type: Some(building.code()),
                building_label: Some(building.label()),
                owner_name: Some(owner.name.as_str().to_owned()),
            },
        }
    }
}

/// Data behind `GET /`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub rows: u16,
    pub columns: u16,
    pub cells: Vec<CellView>,
    pub current_user: Option<String>,
    pub balance: Option<i64>,
    pub new_building: Option<i32>,
    pub removed_cell: Option<i32>,
    pub flashes: Vec<Flash>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCellView {
    pub id: i32,
    pub building_type: i16,
    pub building_label: &'static str,
}

impl From<OwnedCell> for OwnedCellView {
    fn from(cell: OwnedCell) -> Self {
        Self {
            id: cell.id.get(),
            building_type: cell.building.code(),
            building_label: cell.building.label(),
        }
    }
}

/// Data behind `GET /profile`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub name: String,
    pub login: String,
    pub balance: i64,
    pub cells: Vec<OwnedCellView>,
    pub flashes: Vec<Flash>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceView {
    pub code: i16,
    pub label: &'static str,
    pub price: i64,
    pub description: &'static str,
}

/// Data behind `GET /pricing`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingView {
    pub buildings: Vec<PriceView>,
    pub current_user: Option<String>,
    pub flashes: Vec<Flash>,
}

/// Load the signed-in account, refreshing the cached balance. A session whose
/// account has vanished is cleared and read as anonymous.
async fn current_account(state: &HttpState, session: &SessionContext) -> ApiResult<Option<User>> {
    let Some(id) = session.user_id()? else {
        return Ok(None);
    };
    match state.account_query.find_user(id).await? {
        Some(user) => {
            session.set_balance(user.balance())?;
            Ok(Some(user))
        }
        None => {
            info!(user_id = %id, "clearing session of missing account");
            session.clear();
            Ok(None)
        }
    }
}

#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
    highlight: web::Query<Highlight>,
) -> ApiResult<web::Json<GridView>> {
    let account = current_account(&state, &session).await?;
    let cells = state.grid.cells().await?;
    let Highlight {
        new_building,
        removed_cell,
    } = highlight.into_inner();

    Ok(web::Json(GridView {
        rows: GRID_ROWS,
        columns: GRID_COLUMNS,
        cells: cells.into_iter().map(CellView::from).collect(),
        current_user: account.as_ref().map(|user| user.name().as_str().to_owned()),
        balance: account.as_ref().map(|user| user.balance().get()),
        new_building,
        removed_cell,
        flashes: session.take_flashes(),
    }))
}

/// Account details and held cells. Anonymous visitors are sent to sign in.
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let Some(id) = session.user_id()? else {
        return redirect_with(&session, Flash::error(SIGN_IN_FIRST), "/login");
    };
    let Some(profile) = state.profiles.profile(id).await? else {
        info!(user_id = %id, "clearing session of missing account");
        return recover(&session, Error::unauthorized(ACCOUNT_GONE), "/");
    };
    session.set_balance(profile.user.balance())?;

    Ok(HttpResponse::Ok().json(ProfileView {
        name: profile.user.name().as_str().to_owned(),
        login: profile.user.login().as_str().to_owned(),
        balance: profile.user.balance().get(),
        cells: profile.cells.into_iter().map(OwnedCellView::from).collect(),
        flashes: session.take_flashes(),
    }))
}

/// Static price table; no sign-in required.
#[get("/pricing")]
pub async fn pricing(session: SessionContext) -> ApiResult<web::Json<PricingView>> {
    let buildings = BuildingType::ALL
        .iter()
        .map(|building| PriceView {
            code: building.code(),
            label: building.label(),
            price: building.price().get(),
            description: building.description(),
        })
        .collect();

    Ok(web::Json(PricingView {
        buildings,
        current_user: session.user_name()?,
        flashes: session.take_flashes(),
    }))
}

#[cfg(test)]
mod tests;
