pub use self::{
    path::get_path,
    types::{DataBase, PoolOption, PoolType, QueryResult},
};

mod path;
mod stock_mover;
mod types;
