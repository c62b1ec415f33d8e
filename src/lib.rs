// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cards;
pub mod categories;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod matcher;
pub mod models;
pub mod money;
pub mod session;
pub mod sheet;
pub mod utils;
