pub mod stock_movers;
