#![allow(dead_code)]

pub mod mock_device;
pub mod scripted;
