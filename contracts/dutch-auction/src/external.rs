use super::*;

/// Type of the parameter to the `init` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Token the auction sells.
    pub token: Token,
}

/// Type of the parameter to the `launchAuction` function.
#[derive(Debug, Serialize, SchemaType, Clone)]
pub struct LaunchParams {
    /// Bidding window opens at this time. Must be in the future.
    pub start: Timestamp,
    /// Bidding window closes at this time. Must be after `start`.
    pub end: Timestamp,
    /// Price of the whole lot when bidding opens.
    pub start_price: Amount,
    /// Price of the whole lot approached when bidding closes.
    pub reservation_price: Amount,
}

/// Auction details returned by the `view` function.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct AuctionView {
    pub seller: AccountAddress,
    pub token: Token,
    /// Phase at the time of the query.
    pub phase: AuctionPhase,
    /// Terms, once launched.
    pub terms: Option<AuctionTerms>,
    /// Accepted bid, once sold.
    pub sale: Option<Sale>,
}
