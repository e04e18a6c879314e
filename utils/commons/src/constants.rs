/// Tag for the Launch event.
pub const LAUNCH_TAG: u8 = u8::MAX - 1;

/// Tag for the Buy event.
pub const BUY_TAG: u8 = u8::MAX - 2;

/// Tag for the Deposit event.
pub const DEPOSIT_TAG: u8 = u8::MAX - 3;

/// Tag for the Retrieve Tokens event.
pub const RETRIEVE_TOKENS_TAG: u8 = u8::MAX - 4;

/// Tag for the Retrieve Funds event.
pub const RETRIEVE_FUNDS_TAG: u8 = u8::MAX - 5;

/// CIS-2 entrypoint used to query token balances.
pub const BALANCE_OF_ENTRYPOINT: &str = "balanceOf";

/// CIS-2 entrypoint used to move tokens.
pub const TRANSFER_ENTRYPOINT: &str = "transfer";
