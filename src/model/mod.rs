mod entities;
mod error;
mod paging;
mod request;
mod response;
mod view;

pub use entities::*;
pub use error::*;
pub use paging::*;
pub use request::*;
pub use response::*;
pub use view::*;
