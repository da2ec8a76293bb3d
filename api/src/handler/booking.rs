use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::booking::{
    event::{CancelBooking, CreateBooking},
    BookingNumber,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::booking::{
        BookingResponse, BookingsResponse, CancelBookingRequest, CreateBookingRequest,
    },
};

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    req.validate(&())?;

    let create_booking = CreateBooking::new(req.slot_id, user.id(), req.party_size, req.notes);
    let booking_number = registry
        .booking_repository()
        .create(create_booking)
        .await?;

    // 採番済みの予約番号・確定金額を含めて返す
    let booking = registry
        .booking_repository()
        .find_by_number(&booking_number, user.id())
        .await?
        .ok_or_else(|| AppError::EntityNotFound("booking not found".into()))?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

pub async fn show_booking_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_all_by_user(user.id())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_number): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let booking_number = BookingNumber::from(booking_number);
    registry
        .booking_repository()
        .find_by_number(&booking_number, user.id())
        .await
        .and_then(|booking| match booking {
            Some(booking) => Ok(Json(booking.into())),
            None => Err(AppError::EntityNotFound("booking not found".into())),
        })
}

pub async fn cancel_booking(
    user: AuthorizedUser,
    Path(booking_number): Path<String>,
    State(registry): State<AppRegistry>,
    req: Option<Json<CancelBookingRequest>>,
) -> AppResult<StatusCode> {
    // 理由は任意。本文が無ければ既定の理由で取り消す
    let reason = req.and_then(|Json(req)| req.reason);

    let cancel_booking =
        CancelBooking::new(BookingNumber::from(booking_number), user.id(), reason);
    registry
        .booking_repository()
        .cancel(cancel_booking)
        .await
        .map(|_| StatusCode::OK)
}
