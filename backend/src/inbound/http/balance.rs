//! Balance top-up.

use actix_web::{HttpResponse, post, web};

use crate::domain::TOP_UP_AMOUNT;

use super::ApiResult;
use super::flash::{Flash, recover, redirect_with};
use super::session::SessionContext;
use super::state::HttpState;

/// Add the fixed top-up amount and return to the profile page.
#[post("/topup")]
pub async fn top_up(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let user = match session.require_user() {
        Ok(user) => user,
        Err(err) => return recover(&session, err, "/login"),
    };

    match state.balance.top_up(user).await {
        Ok(balance) => {
            session.set_balance(balance)?;
            redirect_with(
                &session,
                Flash::success(format!(
                    "Balance topped up by {TOP_UP_AMOUNT} credits. Current balance: {balance}."
                )),
                "/profile",
            )
        }
        Err(err) => recover(&session, err, "/profile"),
    }
}
