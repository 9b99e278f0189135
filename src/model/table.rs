use std::marker::PhantomData;

use crate::dao::PoolType;

/// Handle to one physical table holding rows of type `T`.
#[derive(Debug)]
pub struct Table<T> {
    pub pool: PoolType,
    pub name: String,
    _type: PhantomData<T>,
}

impl<T> Table<T> {
    pub fn new(pool: PoolType, name: &str) -> Table<T> {
        Table {
            pool,
            name: name.to_owned(),
            _type: PhantomData,
        }
    }
}
