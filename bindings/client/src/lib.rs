mod client;
mod error;
mod todo;

#[cfg(feature = "test_utils")]
pub mod fake;

pub mod prelude {
    pub use crate::client::{TodoApi, TodoClient};
    pub use crate::error::{ClientError, ClientResult};
    pub use crate::todo::{Todo, FILLER_FIELD_LEN};
}
