#![allow(dead_code)]

pub mod commander_env;
pub mod fakes;
pub mod http;
