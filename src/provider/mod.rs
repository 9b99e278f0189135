pub use self::{
    database::DatabasePool,
    http::{FetchResponse, HTTP},
};

mod database;
mod http;
