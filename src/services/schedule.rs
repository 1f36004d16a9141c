//! Worklist toggling clamped to the archive's coverage window.

use chrono::NaiveDate;

use crate::repository::{DbContext, DieselError};
use crate::utils::dates::{available_months, check_availability, Availability};

/// Mark a month (or a whole year with `month == 0`) for download.
///
/// Requests outside the coverage window are logged and ignored. For a
/// whole year only the months inside the window are touched. Returns the
/// months that were written.
pub async fn toggle(
    db: &DbContext,
    year: i32,
    month: u32,
    will_download: bool,
    today: NaiveDate,
) -> Result<Vec<u32>, DieselError> {
    if check_availability(year, month, today) != Availability::Available {
        return Ok(Vec::new());
    }

    let months = if month == 0 {
        available_months(year, today)
    } else {
        vec![month]
    };
    let as_i32: Vec<i32> = months.iter().map(|&m| m as i32).collect();
    db.worklist()
        .set_months(year, &as_i32, will_download)
        .await?;

    Ok(months)
}
