pub mod codec;
pub mod commands;
pub mod connection;
pub mod modbus;
pub mod output;
pub mod read_plan;
pub mod registers;
pub mod scan;
pub mod setpoint;

#[cfg(test)]
mod testing;
