//! A Dutch auction selling a lot of CIS-2 fungible tokens for CCD.
//!
//! The seller deploys the contract bound to a token, funds it with tokens and
//! launches it with a bidding window and a start and reservation price. The
//! price of the whole lot decays linearly over the window and the first bid
//! that covers the current price buys the entire lot. Unsold tokens and stray
//! CCD can be recovered by the seller.
#![cfg_attr(not(feature = "std"), no_std)]
use crate::{events::*, external::*, state::*};
use commons::*;
use concordium_std::*;
use core::marker::PhantomData;

mod contract;
mod events;
mod external;
mod state;
