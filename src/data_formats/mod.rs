mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    #[serde(default)]
    pub search: Option<String>,
}
