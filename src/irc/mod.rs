//! Protocol side: server connection, inbound event parsing and the command
//! line parser.

pub mod commands;
pub mod connection;
pub mod event;
pub mod manager;
