#![no_std]
extern crate alloc;

#[macro_use]
pub mod utils;

pub mod autonomous;
pub mod constants;
pub mod controllers;
pub mod devices;
pub mod differential;
pub mod logger;
pub mod opcontrol;
pub mod robot;
pub mod subsystems;
pub mod tracking;
