// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod airtable;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod models;
pub mod receipt;
pub mod report;
pub mod sample;
pub mod server;
pub mod store;
pub mod sync;
pub mod utils;
