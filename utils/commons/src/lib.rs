//! Types, errors and host helpers shared by the auction contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{constants::*, errors::*, structs::*, token::*, types::*};
use concordium_cis2::*;
use concordium_std::*;

pub mod test;

mod constants;
mod errors;
mod structs;
mod token;
mod types;
