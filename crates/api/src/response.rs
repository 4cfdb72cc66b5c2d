//! The `{ "data": ... }` envelope wrapped around every successful payload.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
