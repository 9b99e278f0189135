pub use self::stock_movers_response::{
    Instrument, MoverInstruments, StockMoversBody, StockMoversQueryId,
};

mod stock_movers_response;
